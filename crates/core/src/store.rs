// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable collection store contract.
//!
//! The collections load from and replace into a [`Store`]; they never
//! write partial updates. [`Database`](crate::db::Database) is the SQLite
//! implementation.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::list::List;
use crate::task::Task;

pub trait Store {
    fn load_all_tasks(&self) -> Result<Vec<Task>>;

    /// Replaces the stored task set with `tasks`, atomically.
    fn replace_all_tasks(&self, tasks: &[Task]) -> Result<()>;

    /// Reads the stored tasks, hands them to `f` and stores the set it
    /// returns. No other writer runs between the read and the write; an
    /// error from `f` leaves the store untouched.
    fn update_tasks(&self, f: &mut dyn FnMut(Vec<Task>) -> Result<Vec<Task>>) -> Result<()>;

    fn load_all_lists(&self) -> Result<Vec<List>>;

    /// Replaces the stored list set with `lists`, atomically.
    fn replace_all_lists(&self, lists: &[List]) -> Result<()>;

    /// Watermark of the last successful task pull.
    fn latest_modified(&self) -> Result<Option<DateTime<Utc>>>;

    fn set_latest_modified(&self, at: DateTime<Utc>) -> Result<()>;
}
