// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory task and list collections.
//!
//! Merge rules for pulled tasks:
//! - Present locally and remotely: take the pulled values, except for fields
//!   with a pending local edit, which keep their local value.
//! - Present only in the pull: added.
//! - Present only locally: kept on an incremental pull. On a full pull it is
//!   dropped unless it has pending changes.
//!
//! Merges of large pulls run through [`MergeJob`] in bounded chunks so the
//! caller can yield between them. Merging the same pulled set twice leaves
//! the collection as one merge would.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::field::{PendingChanges, TaskEdit, TaskField};
use crate::list::List;
use crate::store::Store;
use crate::task::{Task, TaskKey};

/// Default number of pulled tasks merged per chunk.
pub const DEFAULT_MERGE_CHUNK: usize = 10;

/// Name reported for tasks whose list is unknown.
pub const ALL_TASKS_LIST_NAME: &str = "All Tasks";

/// Scope of a pull, which decides whether absent tasks survive a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// The pull reported every live task.
    Full,
    /// The pull reported only tasks changed since the watermark.
    Incremental,
}

/// Counts reported when a merge completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
    pub dropped: usize,
}

/// The process-owned, ordered task collection.
#[derive(Debug, Clone, Default)]
pub struct TaskListModel {
    tasks: Vec<Task>,
    /// The stored set as of the last load, refresh or reconciled save.
    /// Pending edits in the store that differ from it were made by another
    /// process.
    last_stored: HashMap<TaskKey, Task>,
}

impl TaskListModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection, collapsing duplicate keys (last one wins).
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut model = TaskListModel::new();
        for task in tasks {
            match model.position(&task.key) {
                Some(i) => model.tasks[i] = task,
                None => model.tasks.push(task),
            }
        }
        model
    }

    pub fn load(store: &dyn Store) -> Result<Self> {
        let mut model = Self::from_tasks(store.load_all_tasks()?);
        model.remember_stored();
        Ok(model)
    }

    /// Overwrites the stored set with this collection.
    ///
    /// Only safe when no other process edits the store; a long-lived owner
    /// uses [`TaskListModel::save_reconciled`].
    pub fn save(&self, store: &dyn Store) -> Result<()> {
        store.replace_all_tasks(&self.tasks)
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Adopts edits another process stored since this collection last looked.
    ///
    /// Returns the number of pending fields adopted.
    pub fn refresh(&mut self, store: &dyn Store) -> Result<usize> {
        let stored = store.load_all_tasks()?;
        let adopted = self.adopt_external_edits(&stored);
        self.last_stored = stored.into_iter().map(|t| (t.key.clone(), t)).collect();
        Ok(adopted)
    }

    /// Adopts external edits and writes the collection back, in one store
    /// transaction so no edit lands between the read and the write.
    ///
    /// Returns the number of pending fields adopted.
    pub fn save_reconciled(&mut self, store: &dyn Store) -> Result<usize> {
        let mut adopted = 0;
        store.update_tasks(&mut |stored| {
            adopted = self.adopt_external_edits(&stored);
            Ok(self.tasks.clone())
        })?;
        self.remember_stored();
        Ok(adopted)
    }

    fn remember_stored(&mut self) {
        self.last_stored = self.tasks.iter().map(|t| (t.key.clone(), t.clone())).collect();
    }

    /// True if the stored pending `field` of `stored` was not there, or held
    /// another value, when this collection last saw the store.
    fn is_external_edit(&self, stored: &Task, field: TaskField) -> bool {
        match self.last_stored.get(&stored.key) {
            Some(seen) => !seen.is_pending(field) || seen.value_of(field) != stored.value_of(field),
            None => true,
        }
    }

    fn adopt_external_edits(&mut self, stored: &[Task]) -> usize {
        let mut adopted = 0;
        for task in stored {
            let fields: Vec<TaskField> =
                task.local_changes.iter().filter(|&f| self.is_external_edit(task, f)).collect();
            if fields.is_empty() {
                continue;
            }
            adopted += fields.len();
            tracing::info!(task = %task.key, count = fields.len(), "adopting stored edits");
            match self.position(&task.key) {
                Some(i) => {
                    for field in fields {
                        self.tasks[i].set_for_push(task.value_of(field));
                    }
                }
                None => {
                    let mut restored = task.clone();
                    restored.local_changes = PendingChanges::new();
                    for field in fields {
                        restored.local_changes.insert(field);
                    }
                    self.tasks.push(restored);
                }
            }
        }
        adopted
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, key: &TaskKey) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.key == key)
    }

    /// Finds a task by its task ID alone.
    pub fn find_by_task_id(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.key.task_id == task_id)
    }

    fn position(&self, key: &TaskKey) -> Option<usize> {
        self.tasks.iter().position(|t| &t.key == key)
    }

    /// Applies a user edit to the task with `key` and flags it for push.
    pub fn edit(&mut self, key: &TaskKey, edit: TaskEdit) -> Result<()> {
        let i = self.position(key).ok_or_else(|| Error::TaskNotFound(key.to_string()))?;
        self.tasks[i].set_for_push(edit);
        Ok(())
    }

    /// Tasks with at least one pending field.
    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.has_local_changes())
    }

    /// Total number of pending fields across the collection.
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().map(|t| t.local_changes.len()).sum()
    }

    /// Confirms a push of `pushed` for the task with `key`.
    ///
    /// The pending flag is cleared only when the field still holds the pushed
    /// value; an edit made while the push was in flight stays pending.
    /// Returns true if the flag was cleared.
    pub fn mark_pushed(&mut self, key: &TaskKey, pushed: &TaskEdit) -> bool {
        let Some(i) = self.position(key) else {
            return false;
        };
        let task = &mut self.tasks[i];
        let field = pushed.field();
        if !task.is_pending(field) || task.value_of(field) != *pushed {
            return false;
        }
        task.mark_not_for_push(field);
        true
    }

    /// Starts a chunked merge of `pulled`.
    pub fn merge_job(&self, pulled: Vec<Task>, mode: MergeMode, chunk_size: usize) -> MergeJob {
        MergeJob::new(pulled, mode, chunk_size)
    }

    /// Merges `pulled` in one go.
    pub fn merge(&mut self, pulled: Vec<Task>, mode: MergeMode) -> MergeSummary {
        let mut job = MergeJob::new(pulled, mode, DEFAULT_MERGE_CHUNK);
        while job.step(self) {}
        job.finish(self)
    }

    /// Flags tasks the server reported deleted.
    ///
    /// The service cannot apply an edit to a deleted task, so the remote
    /// deletion wins: pending edits on such a task are dropped (with a
    /// warning) and the next purge removes it.
    /// Returns the number of tasks flagged.
    pub fn absorb_remote_deletions(&mut self, keys: &[TaskKey]) -> usize {
        if keys.is_empty() {
            return 0;
        }
        let keys: HashSet<&TaskKey> = keys.iter().collect();
        let mut flagged = 0;
        for task in &mut self.tasks {
            if !keys.contains(&task.key) {
                continue;
            }
            if task.has_local_changes() {
                let discarded: Vec<&str> = task.local_changes.iter().map(|f| f.as_str()).collect();
                tracing::warn!(
                    task = %task.key,
                    ?discarded,
                    "task was deleted remotely, dropping its local edits"
                );
                task.local_changes = PendingChanges::new();
            }
            task.deleted = true;
            flagged += 1;
        }
        flagged
    }

    /// Removes fully synchronized tasks that are completed or deleted.
    ///
    /// Returns the number of tasks removed.
    pub fn purge(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.has_local_changes() || !(t.completed || t.deleted));
        before - self.tasks.len()
    }

    /// Restores display order (due date, then name) relative to `now`.
    pub fn sort_at(&mut self, now: DateTime<Utc>) {
        self.tasks.sort_by(|a, b| Task::cmp_due_then_name(a, b, now));
    }

    /// Recomputes due flags of every task.
    pub fn update(&mut self, today: NaiveDate) {
        for task in &mut self.tasks {
            task.update(today);
        }
    }

    /// Highest server modification time across the collection.
    pub fn latest_modified(&self) -> Option<DateTime<Utc>> {
        self.tasks.iter().filter_map(|t| t.modified).max()
    }
}

/// A merge in progress, advanced one chunk per [`MergeJob::step`].
///
/// Abandoning a job part-way leaves the collection holding the chunks
/// merged so far.
#[derive(Debug)]
pub struct MergeJob {
    remaining: std::vec::IntoIter<Task>,
    mode: MergeMode,
    chunk_size: usize,
    seen: HashSet<TaskKey>,
    index: HashMap<TaskKey, usize>,
    summary: MergeSummary,
}

impl MergeJob {
    fn new(pulled: Vec<Task>, mode: MergeMode, chunk_size: usize) -> Self {
        MergeJob {
            remaining: pulled.into_iter(),
            mode,
            chunk_size: chunk_size.max(1),
            seen: HashSet::new(),
            index: HashMap::new(),
            summary: MergeSummary::default(),
        }
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    /// Tasks not yet merged.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Merges the next chunk. Returns true while more chunks remain.
    pub fn step(&mut self, model: &mut TaskListModel) -> bool {
        for pulled in self.remaining.by_ref().take(self.chunk_size) {
            self.seen.insert(pulled.key.clone());
            match Self::locate(&mut self.index, model, &pulled.key) {
                Some(i) => {
                    model.tasks[i].absorb(pulled);
                    self.summary.updated += 1;
                }
                None => {
                    self.index.insert(pulled.key.clone(), model.tasks.len());
                    model.tasks.push(pulled);
                    self.summary.added += 1;
                }
            }
        }
        self.remaining.len() > 0
    }

    /// Looks up `key`, rebuilding the index if the collection moved under it.
    fn locate(
        index: &mut HashMap<TaskKey, usize>,
        model: &TaskListModel,
        key: &TaskKey,
    ) -> Option<usize> {
        if let Some(&i) = index.get(key) {
            if model.tasks.get(i).is_some_and(|t| &t.key == key) {
                return Some(i);
            }
        }
        index.clear();
        index.extend(model.tasks.iter().enumerate().map(|(i, t)| (t.key.clone(), i)));
        index.get(key).copied()
    }

    /// Completes the merge, dropping absent tasks on a full pull.
    pub fn finish(mut self, model: &mut TaskListModel) -> MergeSummary {
        while self.step(model) {}
        if self.mode == MergeMode::Full {
            let before = model.tasks.len();
            let seen = &self.seen;
            model.tasks.retain(|t| seen.contains(&t.key) || t.has_local_changes());
            self.summary.dropped = before - model.tasks.len();
        }
        self.summary
    }
}

/// The process-owned list collection, replaced wholesale on each pull.
#[derive(Debug, Clone, Default)]
pub struct ListListModel {
    lists: Vec<List>,
}

impl ListListModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists(lists: Vec<List>) -> Self {
        ListListModel { lists }
    }

    pub fn load(store: &dyn Store) -> Result<Self> {
        Ok(Self::from_lists(store.load_all_lists()?))
    }

    /// Persists `lists`, then adopts them. On a store failure the in-memory
    /// set is left untouched.
    pub fn replace(&mut self, lists: Vec<List>, store: &dyn Store) -> Result<()> {
        store.replace_all_lists(&lists)?;
        self.lists = lists;
        Ok(())
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    /// Lists that are not smart searches.
    pub fn regular_lists(&self) -> Vec<&List> {
        self.lists.iter().filter(|l| !l.smart).collect()
    }

    pub fn list_name(&self, list_id: &str) -> &str {
        self.lists
            .iter()
            .find(|l| l.list_id == list_id)
            .map(|l| l.name.as_str())
            .unwrap_or(ALL_TASKS_LIST_NAME)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.name == name)
    }
}

/// Pending fields of `model`, as (key, field) pairs in collection order.
pub fn pending_pushes(model: &TaskListModel) -> Vec<(TaskKey, TaskField)> {
    model
        .pending()
        .flat_map(|t| t.local_changes.iter().map(move |f| (t.key.clone(), f)))
        .collect()
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
