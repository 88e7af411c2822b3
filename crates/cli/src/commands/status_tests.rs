// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use milk_core::Store;

use super::{run_impl, StatusReport};
use crate::commands::tasks::edit_impl;
use crate::commands::testing::TestContext;
use crate::credentials::MemoryCredentialStore;

#[test]
fn fresh_install_is_empty_and_unauthorized() {
    let ctx = TestContext::new();
    let report = run_impl(&ctx.db, &MemoryCredentialStore::new()).unwrap();
    assert_eq!(
        report,
        StatusReport { authorized: false, tasks: 0, pending: 0, lists: 0, last_sync: None }
    );
}

#[test]
fn counts_pending_edits_and_watermark() {
    let ctx = TestContext::new();
    ctx.add_list("1", "Inbox").add_task("1/2/3", "Buy milk", "").add_task("1/2/4", "Call mum", "");
    edit_impl(&ctx.db, "4", Some("Call dad"), None, false).unwrap();
    ctx.db.set_latest_modified(Utc.with_ymd_and_hms(2009, 12, 1, 10, 0, 0).unwrap()).unwrap();

    let report = run_impl(&ctx.db, &MemoryCredentialStore::with_token("tok")).unwrap();

    assert!(report.authorized);
    assert_eq!(report.tasks, 2);
    assert_eq!(report.pending, 1);
    assert_eq!(report.lists, 1);
    assert_eq!(report.last_sync.as_deref(), Some("2009-12-01T10:00:00Z"));
}
