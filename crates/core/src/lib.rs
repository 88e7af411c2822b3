// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! milk-core: offline task collections for the milk sync client
//!
//! This crate provides the task and list data model, local change
//! tracking, collection merge rules, rate limiting and the SQLite store
//! shared by the sync controller and the CLI.

pub mod clock;
pub mod collection;
pub mod db;
pub mod due;
pub mod error;
pub mod field;
pub mod list;
pub mod rate_limit;
pub mod store;
pub mod task;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use collection::{
    pending_pushes, ListListModel, MergeJob, MergeMode, MergeSummary, TaskListModel,
    ALL_TASKS_LIST_NAME, DEFAULT_MERGE_CHUNK,
};
pub use db::Database;
pub use due::{format_due, parse_due, DueFlags};
pub use error::{Error, Result};
pub use field::{PendingChanges, TaskEdit, TaskField};
pub use list::List;
pub use rate_limit::RateLimiter;
pub use store::Store;
pub use task::{Task, TaskKey};
