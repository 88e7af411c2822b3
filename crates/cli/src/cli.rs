// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  milk auth                        Authorize this client
  milk sync --once                 Pull tasks and lists
  milk list                        Show tasks
  milk edit 301 --due 2009-12-05   Reschedule a task
  milk sync --once                 Push the change";

#[derive(Parser)]
#[command(name = "milk")]
#[command(about = "An offline-first Remember The Milk client")]
#[command(
    long_about = "An offline-first Remember The Milk client.\n\n\
    Edits are stored locally and pushed by 'milk sync', which retries until\n\
    the service confirms them."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Account
    // ─────────────────────────────────────────────────────────────────────────
    /// Authorize this client with your account
    Auth,

    /// Forget the stored authorization token
    Logout,

    /// Show authorization, pending changes and last sync
    Status {
        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Tasks
    // ─────────────────────────────────────────────────────────────────────────
    /// List tasks
    #[command(after_help = "Examples:\n  \
        milk list                  All tasks, by due date then name\n  \
        milk list --list Work      Tasks in the Work list\n  \
        milk list -o json          Machine-readable output")]
    List {
        /// Only tasks in the list with this name
        #[arg(long, short)]
        list: Option<String>,

        /// Include completed tasks
        #[arg(long, short)]
        all: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// List task lists
    Lists {
        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Edit a task's name or due date
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
            milk edit 301 --name \"Buy oat milk\"    Rename\n  \
            milk edit 301 --due 2009-12-05         Reschedule\n  \
            milk edit 10/20/301 --clear-due        Clear the due date"
    )]
    Edit {
        /// Task ID, or list/series/task key
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Mark a task complete
    #[command(arg_required_else_help = true)]
    Complete {
        /// Task ID, or list/series/task key
        id: String,

        /// Mark incomplete instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete a task
    #[command(arg_required_else_help = true)]
    Delete {
        /// Task ID, or list/series/task key
        id: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Sync
    // ─────────────────────────────────────────────────────────────────────────
    /// Synchronize with the service
    #[command(after_help = "Examples:\n  \
        milk sync           Keep syncing until interrupted (logs to sync.log)\n  \
        milk sync --once    Sync until nothing is left to do, then exit")]
    Sync {
        /// Exit once nothing is left to do
        #[arg(long)]
        once: bool,
    },
}

impl Command {
    /// True for the long-running sync loop.
    pub fn is_daemon(&self) -> bool {
        matches!(self, Command::Sync { once: false })
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
