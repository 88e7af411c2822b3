// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use milk_core::{Database, Task, TaskEdit, TaskKey, TaskListModel};

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Isolated config and data directories for one test.
pub struct Env {
    temp: TempDir,
}

impl Env {
    pub fn new() -> Self {
        Env { temp: TempDir::new().unwrap() }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp.path().join("data")
    }

    /// The `milk` binary pointed at this environment.
    pub fn milk(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("milk");
        cmd.env("MILK_CONFIG_DIR", self.config_dir())
            .env("MILK_DATA_DIR", self.data_dir())
            .env_remove("MILK_API_KEY")
            .env_remove("MILK_SHARED_SECRET")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Writes `config.toml` with credentials and the given REST endpoint.
    pub fn configure(&self, rest_url: &str) {
        fs::create_dir_all(self.config_dir()).unwrap();
        let content = format!(
            "api_key = \"key\"\nshared_secret = \"secret\"\nrest_url = \"{}\"\n",
            rest_url
        );
        fs::write(self.config_dir().join("config.toml"), content).unwrap();
    }

    pub fn authorize(&self, token: &str) {
        fs::create_dir_all(self.data_dir()).unwrap();
        fs::write(self.data_dir().join("token"), token).unwrap();
    }

    pub fn open_db(&self) -> Database {
        Database::open(&self.data_dir().join("milk.db")).unwrap()
    }

    /// Stores `tasks` as the local collection.
    pub fn seed(&self, tasks: Vec<Task>) {
        let db = self.open_db();
        TaskListModel::from_tasks(tasks).save(&db).unwrap();
    }

    pub fn tasks(&self) -> TaskListModel {
        TaskListModel::load(&self.open_db()).unwrap()
    }
}

pub fn task(key: &str, name: &str) -> Task {
    let parts: Vec<&str> = key.split('/').collect();
    Task::new(TaskKey::new(parts[0], parts[1], parts[2]), name)
}

/// A task carrying an unpushed rename.
pub fn renamed(key: &str, from: &str, to: &str) -> Task {
    let mut task = task(key, from);
    task.set_for_push(TaskEdit::Name(to.to_string()));
    task
}
