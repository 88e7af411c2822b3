// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use milk_core::Database;

use crate::config::Config;
use crate::credentials::FileCredentialStore;
use crate::error::{Error, Result};
use crate::remote::{RemoteClient, RemoteError, RemoteSettings, ReqwestTransport};
use crate::sync::{run_daemon, run_once, Models, RetryController, SharedConnectionState};

use super::runtime;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// How long `--once` waits for the first connectivity probe.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

pub fn run(once: bool) -> Result<()> {
    let config = Config::resolve()?;
    runtime()?.block_on(run_async(config, once))
}

async fn run_async(config: Config, once: bool) -> Result<()> {
    let settings = RemoteSettings::from_config(&config)?;
    let transport = Arc::new(ReqwestTransport::new(HTTP_TIMEOUT).map_err(RemoteError::from)?);
    let credentials = Arc::new(FileCredentialStore::new(config.token_path()));
    let (client, mut completions) =
        RemoteClient::new(settings, transport, credentials, Arc::new(SharedConnectionState::new()))?;
    if client.token().is_none() {
        return Err(Error::NotAuthorized);
    }
    // Released when the process exits.
    let _lock = acquire_lock(&config.lock_path())?;

    let store = Database::open(&config.db_path())?;
    let mut models = Models::load(&store)?;
    let mut controller = RetryController::new(client, Box::new(store), config.sync.clone())?
        .on_error(|operation, message| eprintln!("warning: {}: {}", operation, message));

    if !once {
        return run_daemon(&mut controller, &mut completions, &mut models, config.sync.tick_interval()).await;
    }

    let report = run_once(&mut controller, &mut completions, &mut models, CONNECT_TIMEOUT).await?;
    if !report.online {
        println!("Offline: nothing synced ({} changes pending)", models.tasks.pending_count());
        return Ok(());
    }
    println!(
        "Synced: {} requests, {} tasks, {} lists, {} changes pending",
        report.calls,
        models.tasks.len(),
        models.lists.lists().len(),
        models.tasks.pending_count()
    );
    Ok(())
}

/// Takes the exclusive sync lock so only one process pushes and pulls.
pub(crate) fn acquire_lock(lock_path: &Path) -> Result<File> {
    use fs2::FileExt;

    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| Error::SyncRunning(lock_path.display().to_string()))?;
    Ok(file)
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
