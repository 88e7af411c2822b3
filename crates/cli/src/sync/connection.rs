// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background connectivity watching.
//!
//! The watcher probes the REST endpoint on an interval, publishes the result
//! through lock-free shared state, and sends an event to the main loop each
//! time connectivity flips.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::remote::Transport;

/// Connection state values for atomic state field.
pub const STATE_UNKNOWN: u8 = 0;
pub const STATE_OFFLINE: u8 = 1;
pub const STATE_ONLINE: u8 = 2;

/// Connectivity visible to both the watcher and the controller.
pub struct SharedConnectionState {
    state: AtomicU8,
    /// Probes completed since start (for status reporting).
    probes: AtomicU32,
}

impl SharedConnectionState {
    /// Create a new shared state; connectivity is unknown until the first
    /// probe completes.
    pub fn new() -> Self {
        Self::with_state(STATE_UNKNOWN)
    }

    pub fn with_state(state: u8) -> Self {
        Self { state: AtomicU8::new(state), probes: AtomicU32::new(0) }
    }

    pub fn get(&self) -> u8 {
        self.state.load(Ordering::Acquire)
    }

    pub fn set(&self, state: u8) {
        self.state.store(state, Ordering::Release);
    }

    /// Stores `state` and returns the previous one.
    pub fn replace(&self, state: u8) -> u8 {
        self.state.swap(state, Ordering::AcqRel)
    }

    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::Acquire)
    }

    fn record_probe(&self) {
        self.probes.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_online(&self) -> bool {
        self.get() == STATE_ONLINE
    }

    pub fn is_known(&self) -> bool {
        self.get() != STATE_UNKNOWN
    }

    pub fn status_string(&self) -> String {
        match self.get() {
            STATE_OFFLINE => "offline".to_string(),
            STATE_ONLINE => "online".to_string(),
            _ => "unknown".to_string(),
        }
    }
}

impl Default for SharedConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedConnectionState")
            .field("state", &self.status_string())
            .field("probes", &self.probes())
            .finish()
    }
}

/// Events sent from the watcher to the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    Online,
    Offline,
}

/// Configuration for the connection watcher.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// URL to probe.
    pub url: String,
    /// Delay between probes.
    pub probe_interval: Duration,
}

/// Owns the background watch task.
pub struct ConnectionManager {
    config: ConnectionConfig,
    shared_state: Arc<SharedConnectionState>,
    transport: Arc<dyn Transport>,
    event_tx: mpsc::Sender<ConnectionEvent>,
    cancel_token: CancellationToken,
}

impl ConnectionManager {
    /// Create a new connection manager.
    ///
    /// Returns the manager and a receiver for connection events.
    pub fn new(
        config: ConnectionConfig,
        shared_state: Arc<SharedConnectionState>,
        transport: Arc<dyn Transport>,
    ) -> (Self, mpsc::Receiver<ConnectionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(16);
        let manager = Self {
            config,
            shared_state,
            transport,
            event_tx,
            cancel_token: CancellationToken::new(),
        };
        (manager, event_rx)
    }

    /// Starts probing in the background until cancelled.
    pub fn spawn_watch_task(&self) {
        let config = self.config.clone();
        let shared_state = Arc::clone(&self.shared_state);
        let transport = Arc::clone(&self.transport);
        let event_tx = self.event_tx.clone();
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            watch(config, shared_state, transport, event_tx, cancel_token).await;
        });
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn watch(
    config: ConnectionConfig,
    shared_state: Arc<SharedConnectionState>,
    transport: Arc<dyn Transport>,
    event_tx: mpsc::Sender<ConnectionEvent>,
    cancel_token: CancellationToken,
) {
    loop {
        let online = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => return,
            online = transport.probe(&config.url) => online,
        };
        shared_state.record_probe();

        let new = if online { STATE_ONLINE } else { STATE_OFFLINE };
        let old = shared_state.replace(new);
        if old != new {
            let event = if online { ConnectionEvent::Online } else { ConnectionEvent::Offline };
            tracing::info!(?event, "connectivity changed");
            if event_tx.send(event).await.is_err() {
                return;
            }
        }

        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => return,
            _ = tokio::time::sleep(config.probe_interval) => {}
        }
    }
}
