// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use milk_core::{Database, ListListModel};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

use super::open_store;

/// JSON representation of a list.
#[derive(Debug, Serialize)]
pub(crate) struct ListJson {
    pub id: String,
    pub name: String,
    pub smart: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter: String,
    pub locked: bool,
    pub archived: bool,
}

pub fn run(output: OutputFormat) -> Result<()> {
    let (db, _) = open_store()?;
    let rows = run_impl(&db)?;
    match output {
        OutputFormat::Text => {
            for row in &rows {
                let mut line = format!("{:<10} {}", row.id, row.name);
                if row.smart {
                    line.push_str(&format!(" (smart: {})", row.filter));
                }
                if row.archived {
                    line.push_str(" [archived]");
                }
                println!("{}", line);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

/// Regular lists first (by position), then smart lists; deleted lists are
/// hidden.
pub(crate) fn run_impl(db: &Database) -> Result<Vec<ListJson>> {
    let model = ListListModel::load(db)?;
    let mut lists: Vec<_> = model.lists().iter().filter(|l| !l.deleted).collect();
    lists.sort_by_key(|l| (l.smart, l.position.unwrap_or(i64::MAX)));
    Ok(lists
        .into_iter()
        .map(|l| ListJson {
            id: l.list_id.clone(),
            name: l.name.clone(),
            smart: l.smart,
            filter: l.filter.clone(),
            locked: l.locked,
            archived: l.archived,
        })
        .collect())
}

#[cfg(test)]
#[path = "lists_tests.rs"]
mod tests;
