// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for remote and sync tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::sign::Params;
use super::transport::{HttpResponse, Transport, TransportError, TransportResult};

/// Body returned for any method with nothing queued.
pub const OK_BODY: &str = r#"{"rsp":{"stat":"ok"}}"#;

#[derive(Default)]
struct MockState {
    /// Canned responses by RTM method name, served in order.
    responses: HashMap<String, VecDeque<TransportResult<HttpResponse>>>,
    /// URLs passed to get(), in call order.
    requests: Vec<String>,
}

/// Mock transport for testing without real sockets.
///
/// Clones share state, so a test can keep one handle while the client
/// owns another.
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    online: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            state: Arc::new(Mutex::new(MockState::default())),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Queue a `200 OK` JSON body for the next call of `method`.
    pub fn respond(&self, method: &str, body: &str) {
        self.respond_with(method, Ok(HttpResponse::ok(body)));
    }

    /// Queue an arbitrary result for the next call of `method`.
    pub fn respond_with(&self, method: &str, result: TransportResult<HttpResponse>) {
        let mut state = self.state.lock().unwrap();
        state.responses.entry(method.to_string()).or_default().push_back(result);
    }

    /// Queue a transport failure for the next call of `method`.
    pub fn fail(&self, method: &str) {
        self.respond_with(method, Err(TransportError::ConnectionFailed("mock failure".into())));
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// All requested URLs, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Method names of all requests, in call order.
    pub fn methods(&self) -> Vec<String> {
        self.requests().iter().map(|u| query(u)["method"].clone()).collect()
    }

    /// Query parameters of the most recent call of `method`.
    pub fn last_params(&self, method: &str) -> Option<Params> {
        self.requests().iter().rev().map(|u| query(u)).find(|q| q.get("method").map(String::as_str) == Some(method))
    }
}

/// Parse the query string of `url` into a parameter map.
pub fn query(url: &str) -> Params {
    url::Url::parse(url).unwrap().query_pairs().into_owned().collect()
}

impl Transport for MockTransport {
    fn get(
        &self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<HttpResponse>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            let method = query(&url).get("method").cloned().unwrap_or_default();
            let mut state = self.state.lock().unwrap();
            state.requests.push(url);
            state
                .responses
                .get_mut(&method)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Ok(HttpResponse::ok(OK_BODY)))
        })
    }

    fn probe(&self, _url: &str) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        let online = self.online.load(Ordering::SeqCst);
        Box::pin(async move { online })
    }
}
