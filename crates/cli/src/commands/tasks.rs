// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local task commands. Edits are stored as pending changes and pushed by
//! the next sync.

use chrono::{NaiveDate, Utc};
use milk_core::{
    format_due, parse_due, Database, ListListModel, Store, Task, TaskEdit, TaskKey, TaskListModel,
};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::{Error, Result};

use super::{open_store, resolve_task};

/// JSON representation of a task for list output.
#[derive(Debug, Serialize)]
pub(crate) struct TaskJson {
    pub id: String,
    pub key: String,
    pub list: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    pub completed: bool,
    pub is_due: bool,
    pub is_overdue: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<String>,
}

impl TaskJson {
    fn new(task: &Task, lists: &ListListModel) -> Self {
        let flags = task.flags();
        TaskJson {
            id: task.key.task_id.clone(),
            key: task.key.to_string(),
            list: lists.list_name(&task.key.list_id).to_string(),
            name: task.name.clone(),
            due: task.due.map(|d| format_due(Some(d))),
            completed: task.completed,
            is_due: flags.is_due,
            is_overdue: flags.is_overdue,
            pending: task.local_changes.iter().map(|f| f.to_string()).collect(),
        }
    }
}

fn format_task_line(task: &TaskJson) -> String {
    let due = task.due.as_deref().and_then(|d| d.get(..10)).unwrap_or("-");
    let mut line = format!("{:<10} {:<10} {}", task.id, due, task.name);
    if task.completed {
        line.push_str(" [done]");
    } else if task.is_overdue {
        line.push_str(" (overdue)");
    }
    if !task.pending.is_empty() {
        line.push_str(&format!("  * {}", task.pending.join(",")));
    }
    line
}

pub fn list(list: Option<&str>, all: bool, output: OutputFormat) -> Result<()> {
    let (db, _) = open_store()?;
    let rows = list_impl(&db, list, all, Utc::now().date_naive())?;
    match output {
        OutputFormat::Text => {
            for row in &rows {
                println!("{}", format_task_line(row));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn list_impl(
    db: &Database,
    list: Option<&str>,
    all: bool,
    today: NaiveDate,
) -> Result<Vec<TaskJson>> {
    let lists = ListListModel::load(db)?;
    let list_id = match list {
        Some(name) => Some(
            lists
                .find_by_name(name)
                .map(|l| l.list_id.clone())
                .ok_or_else(|| Error::ListNotFound(name.to_string()))?,
        ),
        None => None,
    };

    let mut tasks = TaskListModel::load(db)?;
    tasks.update(today);
    Ok(tasks
        .tasks()
        .iter()
        .filter(|t| !t.deleted && (all || !t.completed))
        .filter(|t| list_id.as_ref().map_or(true, |id| &t.key.list_id == id))
        .map(|t| TaskJson::new(t, &lists))
        .collect())
}

/// Applies `edits` to the task named by `id` and stores them as pending.
///
/// The edit is a single store transaction, so a running `milk sync`
/// either sees it before its next write or waits for it.
fn apply(db: &Database, id: &str, edits: Vec<TaskEdit>) -> Result<TaskKey> {
    let key = resolve_task(&TaskListModel::load(db)?, id)?;
    let mut pending = 0;
    db.update_tasks(&mut |stored| {
        let mut model = TaskListModel::from_tasks(stored);
        for edit in edits.iter().cloned() {
            model.edit(&key, edit)?;
        }
        pending = model.pending_count();
        Ok(model.into_tasks())
    })?;
    tracing::debug!(task = %key, pending, "stored local edit");
    Ok(key)
}

pub fn edit(id: &str, name: Option<&str>, due: Option<&str>, clear_due: bool) -> Result<()> {
    let (db, _) = open_store()?;
    let key = edit_impl(&db, id, name, due, clear_due)?;
    println!("Updated {} (pending sync)", key);
    Ok(())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn edit_impl(
    db: &Database,
    id: &str,
    name: Option<&str>,
    due: Option<&str>,
    clear_due: bool,
) -> Result<TaskKey> {
    let mut edits = Vec::new();
    if let Some(name) = name {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::NothingToEdit);
        }
        edits.push(TaskEdit::Name(name.to_string()));
    }
    if let Some(due) = due {
        edits.push(TaskEdit::Due(parse_due(due)?));
    } else if clear_due {
        edits.push(TaskEdit::Due(None));
    }
    if edits.is_empty() {
        return Err(Error::NothingToEdit);
    }
    apply(db, id, edits)
}

pub fn complete(id: &str, undo: bool) -> Result<()> {
    let (db, _) = open_store()?;
    let key = complete_impl(&db, id, undo)?;
    let state = if undo { "incomplete" } else { "complete" };
    println!("Marked {} {} (pending sync)", key, state);
    Ok(())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn complete_impl(db: &Database, id: &str, undo: bool) -> Result<TaskKey> {
    apply(db, id, vec![TaskEdit::Completed(!undo)])
}

pub fn delete(id: &str) -> Result<()> {
    let (db, _) = open_store()?;
    let key = delete_impl(&db, id)?;
    println!("Deleted {} (pending sync)", key);
    Ok(())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn delete_impl(db: &Database, id: &str) -> Result<TaskKey> {
    apply(db, id, vec![TaskEdit::Deleted(true)])
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
