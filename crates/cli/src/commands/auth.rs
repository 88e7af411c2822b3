// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authorization: frob, browser approval, token exchange.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::error::Result;
use crate::remote::{RemoteClient, RemoteError, RemoteSettings, ReqwestTransport};
use crate::sync::SharedConnectionState;

use super::runtime;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub fn auth() -> Result<()> {
    let config = Config::resolve()?;
    let settings = RemoteSettings::from_config(&config)?;
    let transport = Arc::new(ReqwestTransport::new(HTTP_TIMEOUT).map_err(RemoteError::from)?);
    let credentials = Arc::new(FileCredentialStore::new(config.token_path()));
    let (mut client, _completions) =
        RemoteClient::new(settings, transport, credentials, Arc::new(SharedConnectionState::new()))?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    runtime()?.block_on(authorize(&mut client, &mut input, &mut out))
}

/// Walks the user through approval and stores the resulting token.
pub(crate) async fn authorize(
    client: &mut RemoteClient,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let frob = client.fetch_frob().await?;
    writeln!(out, "Open this URL in a browser and allow access:\n\n  {}\n", client.auth_url(&frob))?;
    write!(out, "Press Enter once access is granted... ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;

    let token = client.fetch_token(&frob).await?;
    client.set_token(token)?;
    tracing::info!("authorization token stored");
    writeln!(out, "Authorized.")?;
    Ok(())
}

pub fn logout() -> Result<()> {
    let config = Config::resolve()?;
    let credentials = FileCredentialStore::new(config.token_path());
    logout_impl(&credentials)?;
    println!("Logged out.");
    Ok(())
}

pub(crate) fn logout_impl(credentials: &dyn CredentialStore) -> Result<()> {
    credentials.remove()
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
