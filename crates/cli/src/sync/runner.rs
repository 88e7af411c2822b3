// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync runner: the loop that drives the controller.
//!
//! The runner owns the collections and is the only place completions,
//! merge chunks and ticks are processed, so none of them ever interleave.
//!
//! - Daemon mode ticks on a timer, on every connectivity change and when a
//!   completion unblocks work, until ctrl-c.
//! - Once mode waits for the first connectivity reading, then ticks and
//!   drains until a tick issues nothing.

use std::time::Duration;

use tokio::sync::mpsc::{Receiver, UnboundedReceiver};
use tokio::time::MissedTickBehavior;

use super::connection::ConnectionEvent;
use super::controller::{Models, RetryController};
use crate::error::Result;
use crate::remote::Completion;

/// Round cap for once mode: bootstrap, timeline and pulls, pushes, then a
/// quiet tick.
const MAX_ONCE_ROUNDS: usize = 5;

/// Summary of a once-mode run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnceReport {
    pub rounds: usize,
    pub calls: usize,
    pub online: bool,
}

async fn next_event(events: &mut Option<Receiver<ConnectionEvent>>) -> Option<ConnectionEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Runs until interrupted.
pub async fn run_daemon(
    controller: &mut RetryController,
    completions: &mut UnboundedReceiver<Completion>,
    models: &mut Models,
    tick_interval: Duration,
) -> Result<()> {
    let mut events = controller.take_connection_events();
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(?tick_interval, "sync daemon started");
    loop {
        let merging = controller.is_merging();
        tokio::select! {
            _ = interval.tick() => {
                controller.tick(models);
            }
            event = next_event(&mut events) => match event {
                Some(event) => {
                    tracing::info!(?event, "connectivity event");
                    controller.tick(models);
                }
                None => events = None,
            },
            completion = completions.recv() => match completion {
                Some(completion) => {
                    if controller.handle(completion, models) {
                        controller.tick(models);
                    }
                }
                None => break,
            },
            _ = std::future::ready(()), if merging => {
                controller.advance_merge(models);
                tokio::task::yield_now().await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, shutting down");
                break;
            }
        }
    }

    controller.shutdown();
    tracing::info!("sync daemon stopped");
    Ok(())
}

/// Handles completions and merge chunks until the controller is idle.
async fn drain(
    controller: &mut RetryController,
    completions: &mut UnboundedReceiver<Completion>,
    models: &mut Models,
) {
    while !controller.is_idle() {
        if controller.is_merging() {
            controller.advance_merge(models);
            tokio::task::yield_now().await;
            continue;
        }
        match completions.recv().await {
            Some(completion) => {
                controller.handle(completion, models);
            }
            None => return,
        }
    }
}

/// Syncs until quiescent, then returns.
///
/// Gives up waiting for connectivity after `connect_timeout` and reports
/// `online: false`.
pub async fn run_once(
    controller: &mut RetryController,
    completions: &mut UnboundedReceiver<Completion>,
    models: &mut Models,
    connect_timeout: Duration,
) -> Result<OnceReport> {
    let mut report = OnceReport::default();
    let mut events = controller.take_connection_events();

    // The first tick bootstraps the watcher; wait for its first reading.
    let first = controller.tick(models);
    report.rounds = 1;
    report.calls = first.calls();
    if !controller.client().connectivity().is_known() {
        match tokio::time::timeout(connect_timeout, next_event(&mut events)).await {
            Ok(Some(event)) => tracing::debug!(?event, "first connectivity reading"),
            Ok(None) => {}
            Err(_) => tracing::warn!(?connect_timeout, "no connectivity reading, giving up"),
        }
    }
    report.online = controller.client().is_online();
    if !report.online {
        controller.shutdown();
        return Ok(report);
    }
    drain(controller, completions, models).await;

    while report.rounds < MAX_ONCE_ROUNDS {
        let tick = controller.tick(models);
        report.rounds += 1;
        report.calls += tick.calls();
        drain(controller, completions, models).await;
        if tick.calls() == 0 {
            break;
        }
    }

    controller.shutdown();
    tracing::info!(rounds = report.rounds, calls = report.calls, "sync pass complete");
    Ok(report)
}
