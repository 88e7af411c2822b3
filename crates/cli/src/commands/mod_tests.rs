// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Test infrastructure for command testing without filesystem setup.
//!
//! `TestContext` wraps an in-memory store so commands can be exercised
//! through their `*_impl` functions.

use chrono::{DateTime, Utc};
use milk_core::{parse_due, Database, List, Store, Task, TaskKey, TaskListModel};

pub struct TestContext {
    pub db: Database,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        TestContext { db: Database::open_in_memory().expect("Failed to create in-memory database") }
    }

    fn due(value: &str) -> Option<DateTime<Utc>> {
        parse_due(value).expect("valid due")
    }

    /// Adds a synchronized task to the store.
    pub fn add_task(&self, key: &str, name: &str, due: &str) -> &Self {
        let parts: Vec<&str> = key.split('/').collect();
        let task = Task::new(TaskKey::new(parts[0], parts[1], parts[2]), name).with_due(Self::due(due));
        let mut tasks = self.db.load_all_tasks().unwrap();
        tasks.push(task);
        TaskListModel::from_tasks(tasks).save(&self.db).unwrap();
        self
    }

    pub fn add_list(&self, list_id: &str, name: &str) -> &Self {
        let mut lists = self.db.load_all_lists().unwrap();
        lists.push(List::new(list_id, name));
        self.db.replace_all_lists(&lists).unwrap();
        self
    }

    pub fn task(&self, key: &str) -> Task {
        let parts: Vec<&str> = key.split('/').collect();
        let key = TaskKey::new(parts[0], parts[1], parts[2]);
        TaskListModel::load(&self.db).unwrap().get(&key).cloned().expect("task exists")
    }
}

#[test]
fn resolve_by_task_id_and_full_key() {
    let ctx = TestContext::new();
    ctx.add_task("1/2/3", "Buy milk", "").add_task("1/5/6", "Call mum", "");
    let model = TaskListModel::load(&ctx.db).unwrap();

    assert_eq!(super::resolve_task(&model, "6").unwrap(), TaskKey::new("1", "5", "6"));
    assert_eq!(super::resolve_task(&model, "1/2/3").unwrap(), TaskKey::new("1", "2", "3"));
}

#[test]
fn resolve_reports_ambiguity() {
    let ctx = TestContext::new();
    ctx.add_task("1/2/3", "Buy milk", "").add_task("9/8/3", "Other", "");
    let model = TaskListModel::load(&ctx.db).unwrap();

    let err = super::resolve_task(&model, "3").unwrap_err();
    assert_eq!(err.to_string(), "ambiguous task ID '3' matches: 1/2/3, 9/8/3");
}

#[test]
fn resolve_unknown_fails() {
    let ctx = TestContext::new();
    let model = TaskListModel::load(&ctx.db).unwrap();
    assert!(matches!(super::resolve_task(&model, "42"), Err(crate::error::Error::TaskNotFound(_))));
    assert!(super::resolve_task(&model, "1/2/42").is_err());
}
