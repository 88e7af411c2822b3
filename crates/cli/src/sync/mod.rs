// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first synchronization.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ tick  ┌──────────────────┐ dispatch ┌──────────────┐
//! │    Runner    │──────►│ RetryController  │─────────►│ RemoteClient │
//! │ (event loop) │◄──────│ (4 sequences)    │◄─────────│  (spawned    │
//! └──────────────┘       └──────────────────┘completion│   requests)  │
//!        ▲                        │                    └──────────────┘
//!        │ online/offline         ▼
//! ┌──────────────┐       ┌──────────────────┐
//! │  Connection  │       │ TaskListModel +  │
//! │   watcher    │       │ ListListModel    │
//! └──────────────┘       └──────────────────┘
//! ```
//!
//! Every tick re-evaluates each sequence's preconditions from scratch, so
//! the next tick is the only retry mechanism. Completions and merge chunks
//! are processed on the runner's task, which owns the collections.

mod connection;
mod controller;
mod runner;

pub use connection::{
    ConnectionConfig, ConnectionEvent, ConnectionManager, SharedConnectionState, STATE_OFFLINE,
    STATE_ONLINE, STATE_UNKNOWN,
};
pub use controller::{Models, Outcome, RetryController, Skip, TickReport};
pub use runner::{run_daemon, run_once, OnceReport};
