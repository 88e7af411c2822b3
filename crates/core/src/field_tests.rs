// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    name = { "name", TaskField::Name },
    due = { "due", TaskField::Due },
    completed = { "completed", TaskField::Completed },
    deleted = { "deleted", TaskField::Deleted },
)]
fn field_from_str_valid(input: &str, expected: TaskField) {
    assert_eq!(input.parse::<TaskField>().unwrap(), expected);
    assert_eq!(expected.as_str(), input);
}

#[parameterized(
    unknown = { "mistakenproperty" },
    upper = { "NAME" },
    empty = { "" },
)]
fn field_from_str_invalid(input: &str) {
    assert!(input.parse::<TaskField>().is_err());
}

#[test]
fn edit_reports_its_field() {
    assert_eq!(TaskEdit::Name("x".into()).field(), TaskField::Name);
    assert_eq!(TaskEdit::Due(None).field(), TaskField::Due);
    assert_eq!(TaskEdit::Completed(true).field(), TaskField::Completed);
    assert_eq!(TaskEdit::Deleted(true).field(), TaskField::Deleted);
}

#[test]
fn pending_insert_is_idempotent() {
    let mut pending = PendingChanges::new();
    assert!(pending.insert(TaskField::Name));
    assert!(!pending.insert(TaskField::Name));
    assert_eq!(pending.len(), 1);
}

#[test]
fn pending_remove_absent_is_noop() {
    let mut pending: PendingChanges = [TaskField::Due].into_iter().collect();
    assert!(!pending.remove(TaskField::Name));
    assert_eq!(pending.len(), 1);
    assert!(pending.remove(TaskField::Due));
    assert!(pending.is_empty());
}

#[test]
fn pending_collect_dedups() {
    let pending: PendingChanges =
        [TaskField::Name, TaskField::Due, TaskField::Name].into_iter().collect();
    assert_eq!(pending.len(), 2);
    assert!(pending.contains(TaskField::Name));
    assert!(pending.contains(TaskField::Due));
}

#[test]
fn pending_serializes_as_field_names() {
    let pending: PendingChanges = [TaskField::Name, TaskField::Deleted].into_iter().collect();
    let json = serde_json::to_string(&pending).unwrap();
    assert_eq!(json, r#"["name","deleted"]"#);

    let back: PendingChanges = serde_json::from_str(&json).unwrap();
    assert_eq!(back, pending);
}
