// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Task lists as reported by the remote service.
//!
//! Lists carry no local edits; the whole set is replaced on every pull.

use serde::{Deserialize, Serialize};

/// A remote list. `smart` lists are saved searches computed server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub list_id: String,
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default)]
    pub smart: bool,
    /// Search expression; empty unless `smart`.
    #[serde(default)]
    pub filter: String,
}

impl List {
    pub fn new(list_id: impl Into<String>, name: impl Into<String>) -> Self {
        List {
            list_id: list_id.into(),
            name: name.into(),
            deleted: false,
            locked: false,
            archived: false,
            position: None,
            smart: false,
            filter: String::new(),
        }
    }

    /// Marks the list smart with the given search. A non-smart list never
    /// keeps a filter.
    pub fn with_smart_filter(mut self, filter: Option<String>) -> Self {
        match filter {
            Some(filter) => {
                self.smart = true;
                self.filter = filter;
            }
            None => {
                self.smart = false;
                self.filter.clear();
            }
        }
        self
    }
}
