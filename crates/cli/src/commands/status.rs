// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use milk_core::{format_due, Database, ListListModel, Store, TaskListModel};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::error::Result;

use super::open_store;

/// Local sync state at a glance.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct StatusReport {
    pub authorized: bool,
    pub tasks: usize,
    pub pending: usize,
    pub lists: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

pub fn run(output: OutputFormat) -> Result<()> {
    let (db, config) = open_store()?;
    let credentials = FileCredentialStore::new(config.token_path());
    let report = run_impl(&db, &credentials)?;
    match output {
        OutputFormat::Text => {
            let auth = if report.authorized { "authorized" } else { "not authorized (run 'milk auth')" };
            println!("Account:  {}", auth);
            println!("Tasks:    {} ({} with pending changes)", report.tasks, report.pending);
            println!("Lists:    {}", report.lists);
            println!("Last pull: {}", report.last_sync.as_deref().unwrap_or("never"));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(db: &Database, credentials: &dyn CredentialStore) -> Result<StatusReport> {
    let tasks = TaskListModel::load(db)?;
    let lists = ListListModel::load(db)?;
    Ok(StatusReport {
        authorized: credentials.get()?.is_some(),
        tasks: tasks.len(),
        pending: tasks.pending_count(),
        lists: lists.lists().len(),
        last_sync: db.latest_modified()?.map(|at| format_due(Some(at))),
    })
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
