// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! milkrs - the offline-first sync engine behind the `milk` CLI.
//!
//! Tasks and lists live in a local SQLite store; edits are recorded as
//! pending changes and pushed to the service by the sync runner, which
//! also pulls remote changes and merges them without clobbering edits that
//! have not been confirmed yet.
//!
//! # Main Components
//!
//! - [`remote`] - request signing, the [`Transport`](remote::Transport)
//!   seam, response decoding and the asynchronous [`RemoteClient`]
//! - [`sync`] - the [`RetryController`](sync::RetryController), the
//!   connectivity watcher and the runner loops
//! - [`credentials`] - durable home of the authorization token
//! - [`Config`] - `config.toml` plus environment overrides
//!
//! ```rust,ignore
//! use milkrs::{Config, RemoteClient, RemoteSettings};
//!
//! let config = Config::resolve()?;
//! let settings = RemoteSettings::from_config(&config)?;
//! ```

mod cli;
mod commands;
pub mod logging;

pub mod config;
pub mod credentials;
pub mod env;
pub mod error;
pub mod remote;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};
pub use remote::{RemoteClient, RemoteSettings};

/// Runs one CLI command.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Auth => commands::auth::auth(),
        Command::Logout => commands::auth::logout(),
        Command::Status { output } => commands::status::run(output),
        Command::List { list, all, output } => commands::tasks::list(list.as_deref(), all, output),
        Command::Lists { output } => commands::lists::run(output),
        Command::Edit { id, name, due, clear_due } => {
            commands::tasks::edit(&id, name.as_deref(), due.as_deref(), clear_due)
        }
        Command::Complete { id, undo } => commands::tasks::complete(&id, undo),
        Command::Delete { id } => commands::tasks::delete(&id),
        Command::Sync { once } => commands::sync::run(once),
    }
}
