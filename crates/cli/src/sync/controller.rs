// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The retry controller.
//!
//! Each [`RetryController::tick`] walks four independent sequences:
//! bootstrap the connection watcher, push local changes, pull tasks and
//! pull lists. A sequence whose preconditions do not hold declines for this
//! tick and is simply evaluated again on the next one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use milk_core::{
    ClockSource, ListListModel, MergeJob, RateLimiter, Store, SystemClock, TaskKey, TaskListModel,
};
use tokio::sync::mpsc;

use super::connection::{ConnectionConfig, ConnectionEvent, ConnectionManager};
use crate::config::SyncConfig;
use crate::error::Result;
use crate::remote::{Completion, PulledTasks, PushOutcome, RemoteClient, RemoteError, RequestKind};

type ErrorSink = Box<dyn Fn(&str, &str)>;
type ChangeSink = Box<dyn Fn()>;

/// The process-owned collections.
#[derive(Debug, Default)]
pub struct Models {
    pub tasks: TaskListModel,
    pub lists: ListListModel,
}

impl Models {
    pub fn load(store: &dyn Store) -> Result<Self> {
        Ok(Models { tasks: TaskListModel::load(store)?, lists: ListListModel::load(store)? })
    }
}

/// Why a sequence declined to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Rate limiter not ready.
    TooSoon,
    Offline,
    /// A request of the same category is outstanding.
    InFlight,
    NoToken,
    /// Nothing pending.
    Idle,
}

/// What one sequence did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This many calls were dispatched.
    Issued(usize),
    /// A timeline fetch was dispatched in place of pushes.
    TimelineRequested,
    Skipped(Skip),
}

impl Outcome {
    pub fn calls(&self) -> usize {
        match self {
            Outcome::Issued(n) => *n,
            Outcome::TimelineRequested => 1,
            Outcome::Skipped(_) => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// True on the tick that started the connection watcher.
    pub bootstrapped: bool,
    pub push: Outcome,
    pub pull_tasks: Outcome,
    pub pull_lists: Outcome,
}

impl TickReport {
    /// Calls dispatched across all sequences.
    pub fn calls(&self) -> usize {
        self.push.calls() + self.pull_tasks.calls() + self.pull_lists.calls()
    }
}

/// A pulled task set being merged chunk by chunk.
struct PendingMerge {
    job: MergeJob,
    deleted: Vec<TaskKey>,
    latest_modified: Option<DateTime<Utc>>,
}

pub struct RetryController {
    client: RemoteClient,
    store: Box<dyn Store>,
    config: SyncConfig,
    clock: Arc<dyn ClockSource>,
    task_limiter: RateLimiter,
    list_limiter: RateLimiter,
    connection: ConnectionManager,
    connection_events: Option<mpsc::Receiver<ConnectionEvent>>,
    watching: bool,
    merge: Option<PendingMerge>,
    on_error: Option<ErrorSink>,
    on_change: Option<ChangeSink>,
}

impl RetryController {
    /// Creates a controller, restoring the pull watermark from `store`.
    pub fn new(mut client: RemoteClient, store: Box<dyn Store>, config: SyncConfig) -> Result<Self> {
        client.set_latest_modified(store.latest_modified()?);

        let (connection, connection_events) = ConnectionManager::new(
            ConnectionConfig {
                url: client.rest_url().to_string(),
                probe_interval: config.probe_interval(),
            },
            Arc::clone(client.connectivity()),
            client.transport(),
        );

        let clock: Arc<dyn ClockSource> = Arc::new(SystemClock);
        Ok(RetryController {
            task_limiter: RateLimiter::with_clock(config.pull_interval(), Arc::clone(&clock)),
            list_limiter: RateLimiter::with_clock(config.list_pull_interval(), Arc::clone(&clock)),
            client,
            store,
            config,
            clock,
            connection,
            connection_events: Some(connection_events),
            watching: false,
            merge: None,
            on_error: None,
            on_change: None,
        })
    }

    /// Uses `clock` for rate limiting, sorting and due flags.
    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.task_limiter = RateLimiter::with_clock(self.config.pull_interval(), Arc::clone(&clock));
        self.list_limiter =
            RateLimiter::with_clock(self.config.list_pull_interval(), Arc::clone(&clock));
        self.clock = clock;
        self
    }

    /// Receives `(operation, message)` for every failed call.
    pub fn on_error(mut self, sink: impl Fn(&str, &str) + 'static) -> Self {
        self.on_error = Some(Box::new(sink));
        self
    }

    /// Called whenever a sequence changed the collections.
    pub fn on_change(mut self, sink: impl Fn() + 'static) -> Self {
        self.on_change = Some(Box::new(sink));
        self
    }

    /// Hands out the connectivity event receiver; `None` after the first call.
    pub fn take_connection_events(&mut self) -> Option<mpsc::Receiver<ConnectionEvent>> {
        self.connection_events.take()
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut RemoteClient {
        &mut self.client
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn is_merging(&self) -> bool {
        self.merge.is_some()
    }

    /// No request outstanding and no merge in progress.
    pub fn is_idle(&self) -> bool {
        self.client.requests().is_idle() && !self.is_merging()
    }

    /// Runs every sequence once.
    ///
    /// Edits another process stored since the last look are adopted first,
    /// so they are pushed like any other pending change.
    pub fn tick(&mut self, models: &mut Models) -> TickReport {
        self.refresh(models);
        let bootstrapped = self.bootstrap();
        let push = self.push_sequence(models);
        let pull_tasks = self.pull_tasks_sequence();
        let pull_lists = self.pull_lists_sequence();
        let report = TickReport { bootstrapped, push, pull_tasks, pull_lists };
        tracing::debug!(?report, "tick");
        report
    }

    fn bootstrap(&mut self) -> bool {
        if self.watching {
            return false;
        }
        tracing::info!("starting connection watcher");
        self.connection.spawn_watch_task();
        self.watching = true;
        true
    }

    fn push_sequence(&mut self, models: &mut Models) -> Outcome {
        if !self.client.is_online() {
            return skipped("push", Skip::Offline);
        }
        if self.client.in_flight(RequestKind::PushingChanges) > 0 {
            return skipped("push", Skip::InFlight);
        }
        if self.client.token().is_none() {
            return skipped("push", Skip::NoToken);
        }
        if self.client.timeline().is_none() {
            tracing::info!("push: no timeline, requesting one");
            self.client.create_timeline();
            return Outcome::TimelineRequested;
        }
        if models.tasks.pending_count() == 0 {
            tracing::debug!("push: nothing pending");
            return Outcome::Skipped(Skip::Idle);
        }

        let mut issued = 0;
        let mut dropped = false;
        for outcome in self.client.push_local_changes(&models.tasks) {
            match outcome {
                PushOutcome::Dispatched => issued += 1,
                PushOutcome::NothingToSend { key, edit } => {
                    dropped |= models.tasks.mark_pushed(&key, &edit);
                }
                PushOutcome::NoToken | PushOutcome::TimelineRequested => {}
            }
        }
        if dropped {
            self.save_tasks(models);
            self.notify();
        }
        tracing::info!(issued, "push: dispatched local changes");
        Outcome::Issued(issued)
    }

    fn pull_tasks_sequence(&mut self) -> Outcome {
        if !self.task_limiter.is_ready() {
            return Outcome::Skipped(Skip::TooSoon);
        }
        if !self.client.is_online() {
            return skipped("pull tasks", Skip::Offline);
        }
        if self.client.in_flight(RequestKind::PullingTasks) > 0 || self.is_merging() {
            return skipped("pull tasks", Skip::InFlight);
        }
        if self.client.token().is_none() {
            return skipped("pull tasks", Skip::NoToken);
        }
        self.client.pull_tasks();
        Outcome::Issued(1)
    }

    fn pull_lists_sequence(&mut self) -> Outcome {
        if !self.list_limiter.is_ready() {
            return Outcome::Skipped(Skip::TooSoon);
        }
        if !self.client.is_online() {
            return skipped("pull lists", Skip::Offline);
        }
        if self.client.in_flight(RequestKind::PullingLists) > 0 {
            return skipped("pull lists", Skip::InFlight);
        }
        if self.client.token().is_none() {
            return skipped("pull lists", Skip::NoToken);
        }
        self.client.pull_lists();
        Outcome::Issued(1)
    }

    /// Applies a completion to the collections.
    ///
    /// Returns true when the completion unblocked work that should not wait
    /// for the next timer tick (a fresh timeline).
    pub fn handle(&mut self, completion: Completion, models: &mut Models) -> bool {
        match completion {
            Completion::Timeline(result) => {
                let got_timeline = match result {
                    Ok(timeline) => {
                        self.client.set_timeline(timeline);
                        true
                    }
                    Err(e) => {
                        self.report("timeline", &e);
                        false
                    }
                };
                self.settle_push(models);
                got_timeline
            }
            Completion::Pushed { key, edit, result } => {
                match result {
                    Ok(()) => {
                        tracing::info!(task = %key, field = %edit.field(), "push confirmed");
                        if models.tasks.mark_pushed(&key, &edit) {
                            self.save_tasks(models);
                        }
                        self.notify();
                    }
                    Err(e) => self.report("push", &e),
                }
                self.settle_push(models);
                false
            }
            Completion::TasksPulled(Ok(pulled)) => {
                self.start_merge(pulled, models);
                false
            }
            Completion::TasksPulled(Err(e)) => {
                self.client.finish_request(RequestKind::PullingTasks);
                self.report("pull tasks", &e);
                false
            }
            Completion::ListsPulled(result) => {
                self.client.finish_request(RequestKind::PullingLists);
                match result {
                    Ok(lists) => {
                        tracing::info!(count = lists.len(), "pulled lists");
                        match models.lists.replace(lists, self.store.as_ref()) {
                            Ok(()) => {
                                self.list_limiter.have_fired();
                                self.notify();
                            }
                            Err(e) => self.report_message("store", &e.to_string()),
                        }
                    }
                    Err(e) => self.report("pull lists", &e),
                }
                false
            }
        }
    }

    /// Settles one push and purges once the last one is in.
    fn settle_push(&mut self, models: &mut Models) {
        let change = self.client.finish_request(RequestKind::PushingChanges);
        if !change.drained(RequestKind::PushingChanges) {
            return;
        }
        let purged = models.tasks.purge();
        if purged > 0 {
            tracing::info!(purged, "purged synchronized tasks");
            self.save_tasks(models);
            self.notify();
        }
    }

    fn start_merge(&mut self, pulled: PulledTasks, models: &Models) {
        let PulledTasks { decoded, mode } = pulled;
        tracing::info!(
            count = decoded.tasks.len(),
            deleted = decoded.deleted.len(),
            ?mode,
            "pulled tasks, merging"
        );
        let job = models.tasks.merge_job(decoded.tasks, mode, self.config.merge_chunk_size);
        self.merge = Some(PendingMerge {
            job,
            deleted: decoded.deleted,
            latest_modified: decoded.latest_modified,
        });
    }

    /// Merges one chunk. Returns true when this call finished the merge.
    ///
    /// The pulling-tasks gauge stays raised until the merge completes, so
    /// no second pull starts underneath it.
    pub fn advance_merge(&mut self, models: &mut Models) -> bool {
        let Some(pending) = self.merge.as_mut() else {
            return false;
        };
        if pending.job.step(&mut models.tasks) {
            return false;
        }
        let Some(PendingMerge { job, deleted, latest_modified }) = self.merge.take() else {
            return false;
        };

        let summary = job.finish(&mut models.tasks);
        let flagged = models.tasks.absorb_remote_deletions(&deleted);
        let purged = models.tasks.purge();
        models.tasks.sort_at(self.clock.now());
        models.tasks.update(self.clock.today());
        tracing::info!(
            added = summary.added,
            updated = summary.updated,
            dropped = summary.dropped,
            flagged,
            purged,
            "merge complete"
        );
        self.save_tasks(models);

        let watermark = latest_modified.max(models.tasks.latest_modified()).max(self.client.latest_modified());
        if let Some(at) = watermark {
            if let Err(e) = self.store.set_latest_modified(at) {
                self.report_message("store", &e.to_string());
            }
        }
        self.client.set_latest_modified(watermark);
        self.task_limiter.have_fired();
        self.client.finish_request(RequestKind::PullingTasks);
        self.notify();
        true
    }

    fn refresh(&self, models: &mut Models) {
        match models.tasks.refresh(self.store.as_ref()) {
            Ok(0) => {}
            Ok(adopted) => {
                tracing::info!(adopted, "picked up stored edits");
                self.notify();
            }
            Err(e) => self.report_message("store", &e.to_string()),
        }
    }

    /// Writes the task collection back, keeping edits stored meanwhile.
    fn save_tasks(&self, models: &mut Models) {
        match models.tasks.save_reconciled(self.store.as_ref()) {
            Ok(0) => {}
            Ok(adopted) => {
                tracing::info!(adopted, "kept stored edits while saving");
                self.notify();
            }
            Err(e) => self.report_message("store", &e.to_string()),
        }
    }

    fn notify(&self) {
        if let Some(sink) = &self.on_change {
            sink();
        }
    }

    fn report(&self, operation: &str, error: &RemoteError) {
        self.report_message(operation, &error.to_string());
    }

    fn report_message(&self, operation: &str, message: &str) {
        tracing::warn!(operation, error = message, "sync operation failed");
        if let Some(sink) = &self.on_error {
            sink(operation, message);
        }
    }

    /// Stops the connection watcher.
    pub fn shutdown(&self) {
        self.connection.cancel();
    }
}

fn skipped(sequence: &str, reason: Skip) -> Outcome {
    tracing::info!(sequence, ?reason, "precondition not met");
    Outcome::Skipped(reason)
}

impl std::fmt::Debug for RetryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryController")
            .field("client", &self.client)
            .field("watching", &self.watching)
            .field("merging", &self.is_merging())
            .finish()
    }
}
