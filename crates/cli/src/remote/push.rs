// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mapping from a pending task field to the remote call that pushes it.

use milk_core::{format_due, Task, TaskEdit, TaskField};

use super::sign::Params;

/// A resolved push: the call to make and the value it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCall {
    pub method: &'static str,
    pub params: Params,
    /// The field value being pushed, for confirming the push later.
    pub edit: TaskEdit,
}

/// Resolves the push of `field` on `task` within `timeline`.
///
/// Returns `None` when the value has no remote counterpart (a task
/// un-deleted before its deletion was pushed); the caller drops the flag.
pub fn push_call(task: &Task, field: TaskField, timeline: &str) -> Option<PushCall> {
    let edit = task.value_of(field);
    let mut params = Params::new();
    params.insert("list_id".to_string(), task.key.list_id.clone());
    params.insert("taskseries_id".to_string(), task.key.taskseries_id.clone());
    params.insert("task_id".to_string(), task.key.task_id.clone());
    params.insert("timeline".to_string(), timeline.to_string());

    let method = match &edit {
        TaskEdit::Name(name) => {
            params.insert("name".to_string(), name.clone());
            "rtm.tasks.setName"
        }
        TaskEdit::Due(due) => {
            // An absent `due` clears the date.
            if due.is_some() {
                params.insert("due".to_string(), format_due(*due));
            }
            "rtm.tasks.setDueDate"
        }
        TaskEdit::Completed(true) => "rtm.tasks.complete",
        TaskEdit::Completed(false) => "rtm.tasks.uncomplete",
        TaskEdit::Deleted(true) => "rtm.tasks.delete",
        TaskEdit::Deleted(false) => return None,
    };

    Some(PushCall { method, params, edit })
}
