// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The remote client.
//!
//! Calls used by the sync sequences are fire-and-forget: the client bumps
//! the matching in-flight gauge, spawns the request, and the result comes
//! back as a [`Completion`] on the channel returned by
//! [`RemoteClient::new`]. The receiver's owner settles the gauge. The
//! authorization calls are plain `async` methods.

use std::sync::Arc;

use milk_core::{
    format_due, pending_pushes, List, MergeMode, Task, TaskEdit, TaskField, TaskKey, TaskListModel,
};
use serde_json::Value;
use tokio::sync::mpsc;
use url::Url;

use super::decode::{decode_lists, decode_tasks, DecodedTasks};
use super::envelope::{interpret, string_at, RemoteError};
use super::push::push_call;
use super::requests::{RequestCounts, RequestKind, RequestsChange};
use super::session::Session;
use super::sign::{Params, Signer};
use super::transport::Transport;
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::sync::SharedConnectionState;

/// First-pull filter: everything still open.
const INITIAL_PULL_FILTER: &str = "status:incomplete";

/// Endpoints and application credentials.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub rest_url: String,
    pub auth_url: String,
    pub api_key: String,
    pub shared_secret: String,
}

impl RemoteSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let (api_key, shared_secret) = config.require_credentials()?;
        Ok(RemoteSettings {
            rest_url: config.rest_url.clone(),
            auth_url: config.auth_url.clone(),
            api_key: api_key.to_string(),
            shared_secret: shared_secret.to_string(),
        })
    }
}

/// A decoded task pull.
#[derive(Debug, Clone, PartialEq)]
pub struct PulledTasks {
    pub decoded: DecodedTasks,
    pub mode: MergeMode,
}

/// Result of a dispatched call.
#[derive(Debug)]
pub enum Completion {
    Timeline(std::result::Result<String, RemoteError>),
    Pushed {
        key: TaskKey,
        edit: TaskEdit,
        result: std::result::Result<(), RemoteError>,
    },
    TasksPulled(std::result::Result<PulledTasks, RemoteError>),
    ListsPulled(std::result::Result<Vec<List>, RemoteError>),
}

impl Completion {
    /// The gauge this completion settles.
    pub fn kind(&self) -> RequestKind {
        match self {
            Completion::Timeline(_) | Completion::Pushed { .. } => RequestKind::PushingChanges,
            Completion::TasksPulled(_) => RequestKind::PullingTasks,
            Completion::ListsPulled(_) => RequestKind::PullingLists,
        }
    }
}

/// What a push attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The call is in flight.
    Dispatched,
    /// No auth token; nothing was sent.
    NoToken,
    /// No timeline; a timeline fetch was sent instead.
    TimelineRequested,
    /// The value has no remote call; the flag can be dropped.
    NothingToSend { key: TaskKey, edit: TaskEdit },
}

pub struct RemoteClient {
    rest_url: Url,
    auth_url: Url,
    api_key: String,
    signer: Signer,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    connectivity: Arc<SharedConnectionState>,
    session: Session,
    completions: mpsc::UnboundedSender<Completion>,
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::InvalidUrl { url: url.to_string(), reason: e.to_string() })
}

impl RemoteClient {
    /// Creates a client, reading the auth token from `credentials`.
    ///
    /// Returns the client and the receiver for its completions.
    pub fn new(
        settings: RemoteSettings,
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        connectivity: Arc<SharedConnectionState>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Completion>)> {
        let (completions, completion_rx) = mpsc::unbounded_channel();
        let token = credentials.get()?;
        let client = RemoteClient {
            rest_url: parse_url(&settings.rest_url)?,
            auth_url: parse_url(&settings.auth_url)?,
            api_key: settings.api_key,
            signer: Signer::new(settings.shared_secret),
            transport,
            credentials,
            connectivity,
            session: Session::new(token),
            completions,
        };
        Ok((client, completion_rx))
    }

    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn connectivity(&self) -> &Arc<SharedConnectionState> {
        &self.connectivity
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    /// Stores `token` durably and uses it for all later calls.
    pub fn set_token(&mut self, token: String) -> Result<()> {
        self.credentials.put(&token)?;
        self.session.set_token(Some(token));
        Ok(())
    }

    /// Forgets the token, durably.
    pub fn remove_token(&mut self) -> Result<()> {
        self.credentials.remove()?;
        self.session.set_token(None);
        self.session.set_timeline(None);
        Ok(())
    }

    pub fn timeline(&self) -> Option<&str> {
        self.session.timeline()
    }

    pub fn set_timeline(&mut self, timeline: String) {
        tracing::info!(%timeline, "got timeline");
        self.session.set_timeline(Some(timeline));
    }

    pub fn latest_modified(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.session.latest_modified()
    }

    pub fn set_latest_modified(&mut self, at: Option<chrono::DateTime<chrono::Utc>>) {
        self.session.set_latest_modified(at);
    }

    pub fn requests(&self) -> RequestCounts {
        self.session.requests()
    }

    pub fn in_flight(&self, kind: RequestKind) -> u32 {
        self.session.in_flight(kind)
    }

    pub fn add_requests_listener(
        &mut self,
        listener: impl Fn(&RequestsChange) + Send + Sync + 'static,
    ) {
        self.session.tracker_mut().add_listener(listener);
    }

    /// Settles one outstanding request of `kind`.
    pub fn finish_request(&mut self, kind: RequestKind) -> RequestsChange {
        self.session.finish_request(kind)
    }

    /// Adds `format`, `api_key`, the token if held, and finally `api_sig`.
    pub fn standard_params(&self, mut params: Params) -> Params {
        params.insert("format".to_string(), "json".to_string());
        params.insert("api_key".to_string(), self.api_key.clone());
        if let Some(token) = self.session.token() {
            params.insert("auth_token".to_string(), token.to_string());
        }
        params.remove("api_sig");
        let sig = self.signer.sign(&params);
        params.insert("api_sig".to_string(), sig);
        params
    }

    fn signed_url(&self, base: &Url, params: Params) -> String {
        let params = self.standard_params(params);
        let mut url = base.clone();
        url.query_pairs_mut().clear().extend_pairs(params.iter());
        url.to_string()
    }

    /// Fully signed REST URL for `method`.
    pub fn method_url(&self, method: &str, mut params: Params) -> String {
        params.insert("method".to_string(), method.to_string());
        self.signed_url(&self.rest_url, params)
    }

    /// Browser URL where the user approves `frob` with delete permission.
    pub fn auth_url(&self, frob: &str) -> String {
        let mut params = Params::new();
        params.insert("frob".to_string(), frob.to_string());
        params.insert("perms".to_string(), "delete".to_string());
        self.signed_url(&self.auth_url, params)
    }

    /// Calls `method` and waits for the validated `rsp` object.
    pub async fn call(&self, method: &str, params: Params) -> std::result::Result<Value, RemoteError> {
        let url = self.method_url(method, params);
        tracing::debug!(method, "calling");
        interpret(self.transport.get(&url).await)
    }

    pub async fn fetch_frob(&self) -> std::result::Result<String, RemoteError> {
        let rsp = self.call("rtm.auth.getFrob", Params::new()).await?;
        string_at(&rsp, &["frob"])
    }

    pub async fn fetch_token(&self, frob: &str) -> std::result::Result<String, RemoteError> {
        let mut params = Params::new();
        params.insert("frob".to_string(), frob.to_string());
        let rsp = self.call("rtm.auth.getToken", params).await?;
        string_at(&rsp, &["auth", "token"])
    }

    /// Spawns a call; `finish` turns its result into a completion.
    fn dispatch<F>(&mut self, kind: RequestKind, method: &'static str, params: Params, finish: F)
    where
        F: FnOnce(std::result::Result<Value, RemoteError>) -> Completion + Send + 'static,
    {
        let url = self.method_url(method, params);
        self.session.start_request(kind);
        tracing::debug!(method, ?kind, "dispatching");

        let transport = Arc::clone(&self.transport);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = interpret(transport.get(&url).await);
            if completions.send(finish(result)).is_err() {
                tracing::debug!(method, "completion dropped, receiver closed");
            }
        });
    }

    /// Requests a new timeline. Counts as a pushing-changes request.
    pub fn create_timeline(&mut self) {
        tracing::info!("requesting timeline");
        self.dispatch(RequestKind::PushingChanges, "rtm.timelines.create", Params::new(), |result| {
            Completion::Timeline(result.and_then(|rsp| string_at(&rsp, &["timeline"])))
        });
    }

    /// Pushes the pending `field` of `task`.
    ///
    /// Without a token nothing happens; without a timeline a timeline fetch
    /// is dispatched and the push is left for a later pass.
    pub fn push_local_change(&mut self, task: &Task, field: TaskField) -> PushOutcome {
        if self.session.token().is_none() {
            tracing::info!("no auth token, won't push");
            return PushOutcome::NoToken;
        }
        let Some(timeline) = self.session.timeline().map(str::to_string) else {
            tracing::info!("no timeline, won't push but will request one");
            self.create_timeline();
            return PushOutcome::TimelineRequested;
        };
        let Some(call) = push_call(task, field, &timeline) else {
            return PushOutcome::NothingToSend { key: task.key.clone(), edit: task.value_of(field) };
        };

        tracing::info!(task = %task.key, field = %field, method = call.method, "pushing local change");
        let key = task.key.clone();
        let edit = call.edit;
        self.dispatch(RequestKind::PushingChanges, call.method, call.params, move |result| {
            Completion::Pushed { key, edit, result: result.map(|_| ()) }
        });
        PushOutcome::Dispatched
    }

    /// Pushes every pending field of every task in `model`.
    pub fn push_local_changes(&mut self, model: &TaskListModel) -> Vec<PushOutcome> {
        let mut outcomes = Vec::new();
        for (key, field) in pending_pushes(model) {
            let Some(task) = model.get(&key) else { continue };
            let outcome = self.push_local_change(task, field);
            let stop = matches!(outcome, PushOutcome::NoToken | PushOutcome::TimelineRequested);
            outcomes.push(outcome);
            if stop {
                break;
            }
        }
        outcomes
    }

    /// Pulls tasks changed since the watermark, or all open tasks when
    /// there is none.
    pub fn pull_tasks(&mut self) {
        let mut params = Params::new();
        let mode = match self.session.latest_modified() {
            Some(since) => {
                params.insert("last_sync".to_string(), format_due(Some(since)));
                MergeMode::Incremental
            }
            None => {
                params.insert("filter".to_string(), INITIAL_PULL_FILTER.to_string());
                MergeMode::Full
            }
        };
        tracing::info!(?mode, "pulling tasks");
        self.dispatch(RequestKind::PullingTasks, "rtm.tasks.getList", params, move |result| {
            Completion::TasksPulled(
                result.and_then(|rsp| decode_tasks(&rsp)).map(|decoded| PulledTasks { decoded, mode }),
            )
        });
    }

    pub fn pull_lists(&mut self) {
        tracing::info!("pulling lists");
        self.dispatch(RequestKind::PullingLists, "rtm.lists.getList", Params::new(), |result| {
            Completion::ListsPulled(result.and_then(|rsp| decode_lists(&rsp)))
        });
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("rest_url", &self.rest_url.as_str())
            .field("has_token", &self.session.token().is_some())
            .field("timeline", &self.session.timeline())
            .field("requests", &self.session.requests())
            .finish()
    }
}
