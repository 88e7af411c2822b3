// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Task entity with local change tracking.
//!
//! A task is identified by the triple the remote service assigns it
//! (list, task series, task). Every user edit goes through
//! [`Task::set_for_push`], which records the field in the task's
//! [`PendingChanges`] until a push of that field is confirmed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::due::{serde_due, DueFlags};
use crate::field::{PendingChanges, TaskEdit, TaskField};

/// Composite key assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskKey {
    pub list_id: String,
    pub taskseries_id: String,
    pub task_id: String,
}

impl TaskKey {
    pub fn new(
        list_id: impl Into<String>,
        taskseries_id: impl Into<String>,
        task_id: impl Into<String>,
    ) -> Self {
        TaskKey {
            list_id: list_id.into(),
            taskseries_id: taskseries_id.into(),
            task_id: task_id.into(),
        }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.list_id, self.taskseries_id, self.task_id)
    }
}

/// A single task as held by the local collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    pub key: TaskKey,
    pub name: String,
    #[serde(with = "serde_due", default)]
    pub due: Option<DateTime<Utc>>,
    /// Server-side last modification time of the task series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub deleted: bool,
    /// Fields edited locally and not yet confirmed pushed.
    #[serde(default)]
    pub local_changes: PendingChanges,
    #[serde(skip)]
    flags: DueFlags,
}

impl Task {
    pub fn new(key: TaskKey, name: impl Into<String>) -> Self {
        Task {
            key,
            name: name.into(),
            due: None,
            modified: None,
            completed: false,
            deleted: false,
            local_changes: PendingChanges::new(),
            flags: DueFlags::default(),
        }
    }

    pub fn with_due(mut self, due: Option<DateTime<Utc>>) -> Self {
        self.due = due;
        self
    }

    pub fn with_modified(mut self, modified: Option<DateTime<Utc>>) -> Self {
        self.modified = modified;
        self
    }

    /// Applies a local edit and flags its field for push.
    ///
    /// Repeated edits of one field before a push leave a single pending entry.
    pub fn set_for_push(&mut self, edit: TaskEdit) {
        let field = edit.field();
        self.apply(edit);
        self.local_changes.insert(field);
    }

    /// Clears the pending flag for `field`. Absent fields are ignored.
    pub fn mark_not_for_push(&mut self, field: TaskField) {
        self.local_changes.remove(field);
    }

    pub fn has_local_changes(&self) -> bool {
        !self.local_changes.is_empty()
    }

    pub fn is_pending(&self, field: TaskField) -> bool {
        self.local_changes.contains(field)
    }

    /// Current value of `field`, in edit form.
    pub fn value_of(&self, field: TaskField) -> TaskEdit {
        match field {
            TaskField::Name => TaskEdit::Name(self.name.clone()),
            TaskField::Due => TaskEdit::Due(self.due),
            TaskField::Completed => TaskEdit::Completed(self.completed),
            TaskField::Deleted => TaskEdit::Deleted(self.deleted),
        }
    }

    fn apply(&mut self, edit: TaskEdit) {
        match edit {
            TaskEdit::Name(name) => self.name = name,
            TaskEdit::Due(due) => self.due = due,
            TaskEdit::Completed(completed) => self.completed = completed,
            TaskEdit::Deleted(deleted) => self.deleted = deleted,
        }
    }

    /// Takes the pulled version of every field that has no pending local edit.
    ///
    /// The key and pending set stay as they are.
    pub fn absorb(&mut self, pulled: Task) {
        for field in TaskField::ALL {
            if !self.is_pending(field) {
                self.apply(pulled.value_of(field));
            }
        }
        self.modified = pulled.modified;
    }

    /// Recomputes due flags against `today`.
    pub fn update(&mut self, today: NaiveDate) {
        self.flags = DueFlags::compute(self.due, today);
    }

    pub fn is_due(&self) -> bool {
        self.flags.is_due
    }

    pub fn is_overdue(&self) -> bool {
        self.flags.is_overdue
    }

    pub fn flags(&self) -> DueFlags {
        self.flags
    }

    /// Orders by due date, then by name (case-sensitive, ordinal).
    ///
    /// A task without a due date sorts as if it were due at `now`.
    pub fn cmp_due_then_name(a: &Task, b: &Task, now: DateTime<Utc>) -> Ordering {
        let a_due = a.due.unwrap_or(now);
        let b_due = b.due.unwrap_or(now);
        a_due.cmp(&b_due).then_with(|| a.name.cmp(&b.name))
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
