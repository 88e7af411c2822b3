// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use milkrs::logging::{default_level, setup_logging};
use milkrs::{Cli, Config};

fn main() {
    let cli = Cli::parse();

    let daemon = cli.command.is_daemon();
    let log_path = if daemon { Config::resolve().ok().map(|c| c.log_path()) } else { None };
    setup_logging(log_path.as_deref(), default_level(daemon));

    if let Err(e) = milkrs::run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
