// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pushable task fields and the per-task pending-change set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A task field whose local edits are pushed to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    Name,
    Due,
    Completed,
    Deleted,
}

impl TaskField {
    pub const ALL: [TaskField; 4] =
        [TaskField::Name, TaskField::Due, TaskField::Completed, TaskField::Deleted];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskField::Name => "name",
            TaskField::Due => "due",
            TaskField::Completed => "completed",
            TaskField::Deleted => "deleted",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(TaskField::Name),
            "due" => Ok(TaskField::Due),
            "completed" => Ok(TaskField::Completed),
            "deleted" => Ok(TaskField::Deleted),
            _ => Err(Error::InvalidField(s.to_string())),
        }
    }
}

/// A local edit: a field together with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    Name(String),
    Due(Option<DateTime<Utc>>),
    Completed(bool),
    Deleted(bool),
}

impl TaskEdit {
    pub fn field(&self) -> TaskField {
        match self {
            TaskEdit::Name(_) => TaskField::Name,
            TaskEdit::Due(_) => TaskField::Due,
            TaskEdit::Completed(_) => TaskField::Completed,
            TaskEdit::Deleted(_) => TaskField::Deleted,
        }
    }
}

/// Set of fields with unsynced local edits.
///
/// Each field appears at most once; order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingChanges(Vec<TaskField>);

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field`. Returns false if it was already pending.
    pub fn insert(&mut self, field: TaskField) -> bool {
        if self.contains(field) {
            return false;
        }
        self.0.push(field);
        true
    }

    /// Removes `field`. Returns false if it was not pending.
    pub fn remove(&mut self, field: TaskField) -> bool {
        let before = self.0.len();
        self.0.retain(|f| *f != field);
        self.0.len() != before
    }

    pub fn contains(&self, field: TaskField) -> bool {
        self.0.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskField> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<TaskField> for PendingChanges {
    fn from_iter<I: IntoIterator<Item = TaskField>>(iter: I) -> Self {
        let mut set = PendingChanges::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
