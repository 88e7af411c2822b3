// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use milk_core::{parse_due, TaskField};

use super::{complete_impl, delete_impl, edit_impl, list_impl};
use crate::commands::testing::TestContext;
use crate::error::Error;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2009, 12, 1).unwrap()
}

#[test]
fn edit_name_marks_pending() {
    let ctx = TestContext::new();
    ctx.add_task("1/2/3", "Buy milk", "2009-12-02");

    edit_impl(&ctx.db, "3", Some("Buy oat milk"), None, false).unwrap();

    let task = ctx.task("1/2/3");
    assert_eq!(task.name, "Buy oat milk");
    assert!(task.is_pending(TaskField::Name));
    assert!(!task.is_pending(TaskField::Due));
}

#[test]
fn edit_due_and_clear_due() {
    let ctx = TestContext::new();
    ctx.add_task("1/2/3", "Buy milk", "2009-12-02");

    edit_impl(&ctx.db, "3", None, Some("2009-12-05"), false).unwrap();
    assert_eq!(ctx.task("1/2/3").due, parse_due("2009-12-05").unwrap());

    edit_impl(&ctx.db, "3", None, None, true).unwrap();
    let task = ctx.task("1/2/3");
    assert_eq!(task.due, None);
    assert_eq!(task.local_changes.len(), 1);
}

#[test]
fn edit_requires_a_change() {
    let ctx = TestContext::new();
    ctx.add_task("1/2/3", "Buy milk", "");

    assert!(matches!(edit_impl(&ctx.db, "3", None, None, false), Err(Error::NothingToEdit)));
    assert!(matches!(edit_impl(&ctx.db, "3", Some("  "), None, false), Err(Error::NothingToEdit)));
}

#[test]
fn edit_rejects_bad_due() {
    let ctx = TestContext::new();
    ctx.add_task("1/2/3", "Buy milk", "");

    let err = edit_impl(&ctx.db, "3", None, Some("next week"), false).unwrap_err();
    assert!(err.to_string().starts_with("invalid due date: 'next week'"));
    assert!(!ctx.task("1/2/3").has_local_changes());
}

#[test]
fn complete_and_undo() {
    let ctx = TestContext::new();
    ctx.add_task("1/2/3", "Buy milk", "");

    complete_impl(&ctx.db, "3", false).unwrap();
    assert!(ctx.task("1/2/3").completed);

    complete_impl(&ctx.db, "3", true).unwrap();
    let task = ctx.task("1/2/3");
    assert!(!task.completed);
    assert!(task.is_pending(TaskField::Completed));
}

#[test]
fn delete_hides_task_from_list() {
    let ctx = TestContext::new();
    ctx.add_task("1/2/3", "Buy milk", "").add_task("1/2/4", "Call mum", "");

    delete_impl(&ctx.db, "3").unwrap();

    assert!(ctx.task("1/2/3").is_pending(TaskField::Deleted));
    let rows = list_impl(&ctx.db, None, false, today()).unwrap();
    assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["4"]);
}

#[test]
fn list_reports_flags_and_list_names() {
    let ctx = TestContext::new();
    ctx.add_list("1", "Inbox")
        .add_task("1/2/3", "Buy milk", "2009-11-30")
        .add_task("7/8/9", "Mystery", "2009-12-02");

    let rows = list_impl(&ctx.db, None, false, today()).unwrap();

    let milk = rows.iter().find(|r| r.id == "3").unwrap();
    assert_eq!(milk.list, "Inbox");
    assert!(milk.is_overdue);
    let mystery = rows.iter().find(|r| r.id == "9").unwrap();
    assert_eq!(mystery.list, "All Tasks");
    assert!(!mystery.is_due);
}

#[test]
fn list_filters_by_list_name() {
    let ctx = TestContext::new();
    ctx.add_list("1", "Inbox").add_list("7", "Work");
    ctx.add_task("1/2/3", "Buy milk", "").add_task("7/8/9", "Report", "");

    let rows = list_impl(&ctx.db, Some("Work"), false, today()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Report");

    assert!(matches!(list_impl(&ctx.db, Some("Nope"), false, today()), Err(Error::ListNotFound(_))));
}

#[test]
fn completed_tasks_need_all() {
    let ctx = TestContext::new();
    ctx.add_task("1/2/3", "Buy milk", "");
    complete_impl(&ctx.db, "3", false).unwrap();

    assert!(list_impl(&ctx.db, None, false, today()).unwrap().is_empty());
    let rows = list_impl(&ctx.db, None, true, today()).unwrap();
    assert!(rows[0].completed);
    assert_eq!(rows[0].pending, vec!["completed".to_string()]);
}
