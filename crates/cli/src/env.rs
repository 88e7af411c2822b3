// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns the value of `MILK_API_KEY` if set and non-empty.
pub fn api_key() -> Option<String> {
    non_empty(vars::MILK_API_KEY)
}

/// Returns the value of `MILK_SHARED_SECRET` if set and non-empty.
pub fn shared_secret() -> Option<String> {
    non_empty(vars::MILK_SHARED_SECRET)
}

/// Returns the value of `MILK_CONFIG_DIR` if set.
pub fn config_dir() -> Option<PathBuf> {
    non_empty(vars::MILK_CONFIG_DIR).map(PathBuf::from)
}

/// Returns the value of `MILK_DATA_DIR` if set.
pub fn data_dir() -> Option<PathBuf> {
    non_empty(vars::MILK_DATA_DIR).map(PathBuf::from)
}

/// Returns `true` if `RUST_LOG` is set (any value).
pub fn log_filter_set() -> bool {
    std::env::var(vars::RUST_LOG).is_ok()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
