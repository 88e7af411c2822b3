// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is stored in `config.toml` under the config directory
//! (`$MILK_CONFIG_DIR`, or the platform config dir joined with `milk`) and
//! includes:
//! - `api_key` / `shared_secret`: the application credentials used to sign calls
//! - `rest_url` / `auth_url`: service endpoints
//! - `data_dir`: where the task store, token and sync log live
//! - `[sync]`: retry cadence and merge tuning

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "milk";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "milk.db";
const TOKEN_FILE_NAME: &str = "token";
const LOG_FILE_NAME: &str = "sync.log";
const LOCK_FILE_NAME: &str = "sync.lock";

pub const DEFAULT_REST_URL: &str = "https://api.rememberthemilk.com/services/rest/";
pub const DEFAULT_AUTH_URL: &str = "https://www.rememberthemilk.com/services/auth/";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application API key issued by the service.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Shared secret that prefixes every request signature.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shared_secret: String,
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Directory for the local store (defaults to the platform data dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Retry cadence and merge tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between timer-driven ticks of the retry controller (default: 60).
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
    /// Minimum seconds between task pulls (default: 3600).
    #[serde(default = "default_pull_interval_secs")]
    pub pull_interval_secs: u64,
    /// Minimum seconds between list pulls (default: 3600).
    #[serde(default = "default_pull_interval_secs")]
    pub list_pull_interval_secs: u64,
    /// Pulled tasks merged per chunk before yielding (default: 10).
    #[serde(default = "default_merge_chunk_size")]
    pub merge_chunk_size: usize,
    /// Seconds between connectivity probes (default: 30).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

fn default_rest_url() -> String {
    DEFAULT_REST_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_tick_interval_secs() -> u64 {
    60
}

fn default_pull_interval_secs() -> u64 {
    60 * 60
}

fn default_merge_chunk_size() -> usize {
    milk_core::DEFAULT_MERGE_CHUNK
}

fn default_probe_interval_secs() -> u64 {
    30
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            tick_interval_secs: default_tick_interval_secs(),
            pull_interval_secs: default_pull_interval_secs(),
            list_pull_interval_secs: default_pull_interval_secs(),
            merge_chunk_size: default_merge_chunk_size(),
            probe_interval_secs: default_probe_interval_secs(),
        }
    }
}

impl SyncConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.max(1))
    }

    pub fn pull_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.pull_interval_secs as i64)
    }

    pub fn list_pull_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.list_pull_interval_secs as i64)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            shared_secret: String::new(),
            rest_url: default_rest_url(),
            auth_url: default_auth_url(),
            data_dir: None,
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `config.toml` in `config_dir`.
    ///
    /// A missing file yields the defaults.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Loads configuration from the default location and applies
    /// environment overrides.
    pub fn resolve() -> Result<Self> {
        let mut config = Config::load(&config_dir())?;
        config.apply_env();
        Ok(config)
    }

    /// Overrides file values with `MILK_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Some(key) = env::api_key() {
            self.api_key = key;
        }
        if let Some(secret) = env::shared_secret() {
            self.shared_secret = secret;
        }
        if let Some(dir) = env::data_dir() {
            self.data_dir = Some(dir);
        }
    }

    /// Saves configuration to `config.toml` in `config_dir`.
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        fs::create_dir_all(config_dir)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Returns the application credentials, or the first missing one.
    pub fn require_credentials(&self) -> Result<(&str, &str)> {
        let location = config_dir().join(CONFIG_FILE_NAME).display().to_string();
        if self.api_key.trim().is_empty() {
            return Err(Error::NotConfigured("api_key", location, env::vars::MILK_API_KEY));
        }
        if self.shared_secret.trim().is_empty() {
            return Err(Error::NotConfigured(
                "shared_secret",
                location,
                env::vars::MILK_SHARED_SECRET,
            ));
        }
        Ok((&self.api_key, &self.shared_secret))
    }

    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join(DB_FILE_NAME)
    }

    pub fn token_path(&self) -> PathBuf {
        self.data_dir().join(TOKEN_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join(LOG_FILE_NAME)
    }

    /// Held by the one `milk sync` process allowed to push.
    pub fn lock_path(&self) -> PathBuf {
        self.data_dir().join(LOCK_FILE_NAME)
    }
}

/// Directory holding `config.toml`.
pub fn config_dir() -> PathBuf {
    env::config_dir().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
