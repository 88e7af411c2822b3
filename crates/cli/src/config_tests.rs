// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load(temp.path()).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.rest_url, DEFAULT_REST_URL);
    assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
    assert_eq!(config.sync.tick_interval_secs, 60);
    assert_eq!(config.sync.pull_interval_secs, 3600);
    assert_eq!(config.sync.list_pull_interval_secs, 3600);
    assert_eq!(config.sync.merge_chunk_size, 10);
    assert_eq!(config.sync.probe_interval_secs, 30);
}

#[test]
fn test_partial_file_fills_defaults() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.toml"),
        "api_key = \"key\"\nshared_secret = \"secret\"\n\n[sync]\npull_interval_secs = 120\n",
    )
    .unwrap();

    let config = Config::load(temp.path()).unwrap();
    assert_eq!(config.api_key, "key");
    assert_eq!(config.sync.pull_interval_secs, 120);
    assert_eq!(config.sync.list_pull_interval_secs, 3600);
    assert_eq!(config.rest_url, DEFAULT_REST_URL);
}

#[test]
fn test_save_and_load_round_trip() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.api_key = "key".into();
    config.data_dir = Some(temp.path().join("data"));
    config.sync.merge_chunk_size = 25;

    config.save(temp.path()).unwrap();
    assert_eq!(Config::load(temp.path()).unwrap(), config);
}

#[test]
fn test_invalid_toml_is_config_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "api_key = [").unwrap();

    let err = Config::load(temp.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn test_require_credentials() {
    let mut config = Config::default();
    let err = config.require_credentials().unwrap_err();
    assert!(err.to_string().contains("api_key is not configured"));

    config.api_key = "key".into();
    let err = config.require_credentials().unwrap_err();
    assert!(err.to_string().contains("shared_secret is not configured"));

    config.shared_secret = "secret".into();
    assert_eq!(config.require_credentials().unwrap(), ("key", "secret"));
}

#[test]
fn test_paths_live_under_data_dir() {
    let mut config = Config::default();
    config.data_dir = Some(PathBuf::from("/var/milk"));

    assert_eq!(config.db_path(), PathBuf::from("/var/milk/milk.db"));
    assert_eq!(config.token_path(), PathBuf::from("/var/milk/token"));
    assert_eq!(config.log_path(), PathBuf::from("/var/milk/sync.log"));
    assert_eq!(config.lock_path(), PathBuf::from("/var/milk/sync.lock"));
}

#[test]
fn test_intervals_never_zero() {
    let sync = SyncConfig { tick_interval_secs: 0, probe_interval_secs: 0, ..SyncConfig::default() };
    assert_eq!(sync.tick_interval(), Duration::from_secs(1));
    assert_eq!(sync.probe_interval(), Duration::from_secs(1));
    assert_eq!(sync.pull_interval(), chrono::Duration::hours(1));
}
