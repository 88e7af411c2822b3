// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-process session state of the remote client.

use chrono::{DateTime, Utc};

use super::requests::{RequestCounts, RequestKind, RequestTracker, RequestsChange};

/// Auth token, timeline, watermark and in-flight gauges.
///
/// The token mirrors the credential store; the timeline lives only for
/// the session.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<String>,
    timeline: Option<String>,
    latest_modified: Option<DateTime<Utc>>,
    requests: RequestTracker,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Session { token, ..Session::default() }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn timeline(&self) -> Option<&str> {
        self.timeline.as_deref()
    }

    pub fn set_timeline(&mut self, timeline: Option<String>) {
        self.timeline = timeline;
    }

    pub fn latest_modified(&self) -> Option<DateTime<Utc>> {
        self.latest_modified
    }

    pub fn set_latest_modified(&mut self, at: Option<DateTime<Utc>>) {
        self.latest_modified = at;
    }

    pub fn requests(&self) -> RequestCounts {
        self.requests.counts()
    }

    pub fn in_flight(&self, kind: RequestKind) -> u32 {
        self.requests.counts().get(kind)
    }

    pub fn tracker_mut(&mut self) -> &mut RequestTracker {
        &mut self.requests
    }

    pub fn start_request(&mut self, kind: RequestKind) -> RequestsChange {
        self.requests.start(kind)
    }

    pub fn finish_request(&mut self, kind: RequestKind) -> RequestsChange {
        self.requests.finish(kind)
    }
}
