// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::remote::RemoteError;

/// All possible errors that can occur in the milkrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is not configured\n  hint: set it in {1} or export {2}")]
    NotConfigured(&'static str, String, &'static str),

    #[error("not authorized\n  hint: run 'milk auth' first")]
    NotAuthorized,

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("ambiguous task ID '{id}' matches: {}", matches.join(", "))]
    AmbiguousId { id: String, matches: Vec<String> },

    #[error("nothing to edit\n  hint: pass --name, --due or --clear-due")]
    NothingToEdit,

    #[error("list not found: {0}")]
    ListNotFound(String),

    #[error("another 'milk sync' is already running\n  hint: it holds {0}")]
    SyncRunning(String),

    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Core(#[from] milk_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("credential store error: {0}")]
    Credentials(String),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// A specialized Result type for milkrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
