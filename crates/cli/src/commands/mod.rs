// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod auth;
pub mod lists;
pub mod status;
pub mod sync;
pub mod tasks;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use milk_core::{Database, TaskKey, TaskListModel};

use crate::config::Config;
use crate::error::{Error, Result};

/// Helper to open the local store from the resolved configuration.
pub fn open_store() -> Result<(Database, Config)> {
    let config = Config::resolve()?;
    let db = Database::open(&config.db_path())?;
    Ok((db, config))
}

/// Builds a single-threaded runtime for commands that talk to the service.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
}

/// Resolves a task ID or a full `list/series/task` key.
///
/// A bare task ID must match exactly one task.
pub(crate) fn resolve_task(model: &TaskListModel, id: &str) -> Result<TaskKey> {
    let id = id.trim();
    let parts: Vec<&str> = id.split('/').collect();
    if let [list_id, taskseries_id, task_id] = parts.as_slice() {
        let key = TaskKey::new(*list_id, *taskseries_id, *task_id);
        return match model.get(&key) {
            Some(_) => Ok(key),
            None => Err(Error::TaskNotFound(id.to_string())),
        };
    }

    let matches: Vec<&TaskKey> =
        model.tasks().iter().filter(|t| t.key.task_id == id).map(|t| &t.key).collect();
    match matches.as_slice() {
        [] => Err(Error::TaskNotFound(id.to_string())),
        [key] => Ok((*key).clone()),
        keys => Err(Error::AmbiguousId {
            id: id.to_string(),
            matches: keys.iter().map(|k| k.to_string()).collect(),
        }),
    }
}
