// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Decoding of pull payloads into domain types.
//!
//! The service renders a one-element array as a bare object, so every
//! repeated element is read through [`OneOrMany`].

use chrono::{DateTime, Utc};
use milk_core::{parse_due, List, Task, TaskKey};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::envelope::RemoteError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct TasksRsp {
    #[serde(default)]
    tasks: TasksBody,
}

#[derive(Debug, Default, Deserialize)]
struct TasksBody {
    #[serde(default)]
    list: OneOrMany<TaskListEntry>,
}

#[derive(Debug, Deserialize)]
struct TaskListEntry {
    id: String,
    #[serde(default)]
    taskseries: OneOrMany<TaskSeriesEntry>,
    #[serde(default)]
    deleted: Option<DeletedEntry>,
}

#[derive(Debug, Deserialize)]
struct TaskSeriesEntry {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    modified: String,
    #[serde(default)]
    task: OneOrMany<TaskEntry>,
}

#[derive(Debug, Deserialize)]
struct TaskEntry {
    id: String,
    #[serde(default)]
    due: String,
    #[serde(default)]
    completed: String,
    #[serde(default)]
    deleted: String,
}

#[derive(Debug, Deserialize)]
struct DeletedEntry {
    #[serde(default)]
    taskseries: OneOrMany<DeletedSeriesEntry>,
}

#[derive(Debug, Deserialize)]
struct DeletedSeriesEntry {
    id: String,
    #[serde(default)]
    task: OneOrMany<DeletedTaskEntry>,
}

#[derive(Debug, Deserialize)]
struct DeletedTaskEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ListsRsp {
    #[serde(default)]
    lists: ListsBody,
}

#[derive(Debug, Default, Deserialize)]
struct ListsBody {
    #[serde(default)]
    list: OneOrMany<ListEntry>,
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    id: String,
    name: String,
    #[serde(default)]
    deleted: String,
    #[serde(default)]
    locked: String,
    #[serde(default)]
    archived: String,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    smart: String,
    #[serde(default)]
    filter: Option<String>,
}

/// Tasks decoded from an `rtm.tasks.getList` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedTasks {
    pub tasks: Vec<Task>,
    /// Tasks the response reports as deleted since the last sync.
    pub deleted: Vec<TaskKey>,
    /// Highest `modified` seen across `tasks`.
    pub latest_modified: Option<DateTime<Utc>>,
}

fn from_rsp<T: DeserializeOwned>(rsp: &Value) -> Result<T, RemoteError> {
    T::deserialize(rsp).map_err(|e| RemoteError::exception("decode", e))
}

fn timestamp(value: &str) -> Result<Option<DateTime<Utc>>, RemoteError> {
    parse_due(value).map_err(|e| RemoteError::exception("decode", e))
}

/// "0"/"1" flags; anything but "1" is false.
fn flag(value: &str) -> bool {
    value == "1"
}

pub fn decode_tasks(rsp: &Value) -> Result<DecodedTasks, RemoteError> {
    let body: TasksRsp = from_rsp(rsp)?;
    let mut decoded = DecodedTasks::default();

    for list in body.tasks.list.into_vec() {
        for series in list.taskseries.into_vec() {
            let modified = timestamp(&series.modified)?;
            for entry in series.task.into_vec() {
                let mut task = Task::new(TaskKey::new(&list.id, &series.id, entry.id), &series.name)
                    .with_due(timestamp(&entry.due)?)
                    .with_modified(modified);
                task.completed = !entry.completed.is_empty();
                task.deleted = !entry.deleted.is_empty();
                decoded.tasks.push(task);
            }
            decoded.latest_modified = decoded.latest_modified.max(modified);
        }
        if let Some(deleted) = list.deleted {
            for series in deleted.taskseries.into_vec() {
                for entry in series.task.into_vec() {
                    decoded.deleted.push(TaskKey::new(&list.id, &series.id, entry.id));
                }
            }
        }
    }
    Ok(decoded)
}

pub fn decode_lists(rsp: &Value) -> Result<Vec<List>, RemoteError> {
    let body: ListsRsp = from_rsp(rsp)?;
    Ok(body
        .lists
        .list
        .into_vec()
        .into_iter()
        .map(|entry| {
            let smart = flag(&entry.smart);
            let mut list = List::new(entry.id, entry.name)
                .with_smart_filter(if smart { Some(entry.filter.unwrap_or_default()) } else { None });
            list.deleted = flag(&entry.deleted);
            list.locked = flag(&entry.locked);
            list.archived = flag(&entry.archived);
            list.position = entry.position.and_then(|p| p.parse().ok());
            list
        })
        .collect())
}
