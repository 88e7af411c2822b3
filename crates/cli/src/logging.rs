// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Default level when `RUST_LOG` is unset; interactive commands stay quiet.
pub fn default_level(daemon: bool) -> &'static str {
    if daemon {
        "info"
    } else {
        "warn"
    }
}

/// Installs the global subscriber.
///
/// With `log_path` set, logs append to that file without ANSI colors,
/// falling back to stderr when the file cannot be opened.
pub fn setup_logging(log_path: Option<&Path>, default_level: &str) {
    let filter = if crate::env::log_filter_set() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    } else {
        EnvFilter::new(default_level)
    };

    let file = log_path.and_then(|path| {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        fs::OpenOptions::new().create(true).append(true).open(path).ok()
    });

    // try_init: a second call (e.g. from tests) keeps the first subscriber.
    let _ = match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}
