// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Response envelope interpretation.
//!
//! A well-formed response is `{"rsp": {"stat": "ok", ...}}`; a service
//! failure is `{"rsp": {"stat": "fail", "err": {"code", "msg"}}}`. Anything
//! else is a transport or protocol error. Every failure is reduced to one
//! message string through [`RemoteError`]'s `Display`.

use serde_json::Value;

use super::transport::{HttpResponse, TransportError};

/// Normalized failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// No response, or an HTTP-level failure.
    #[error("{0}")]
    Transport(String),

    /// Response present but not a usable envelope or payload.
    #[error("{0}")]
    Protocol(String),

    /// Well-formed failure envelope.
    #[error("RTM error {code}: {msg}")]
    Service { code: String, msg: String },
}

impl RemoteError {
    pub fn no_response() -> Self {
        RemoteError::Transport("HTTP error: No response".to_string())
    }

    pub fn http(status: u16, reason: &str) -> Self {
        RemoteError::Transport(format!("HTTP error {status}: {reason}"))
    }

    pub fn no_data() -> Self {
        RemoteError::Protocol("HTTP error: No data".to_string())
    }

    pub fn missing_data() -> Self {
        RemoteError::Protocol("RTM error: Missing data".to_string())
    }

    /// A failure raised while interpreting a response.
    pub fn exception(name: &str, message: impl std::fmt::Display) -> Self {
        RemoteError::Protocol(format!("Exception {name}: {message}"))
    }
}

impl From<TransportError> for RemoteError {
    fn from(err: TransportError) -> Self {
        tracing::warn!(error = %err, "transport failure");
        RemoteError::no_response()
    }
}

/// Render a JSON scalar as the service's string form.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Validates a response and returns the inner `rsp` object.
pub fn interpret(response: Result<HttpResponse, TransportError>) -> Result<Value, RemoteError> {
    let response = response?;
    if !response.is_success() {
        let err = RemoteError::http(response.status, &response.reason);
        tracing::warn!(%err, "request failed");
        return Err(err);
    }
    if response.body.trim().is_empty() {
        return Err(RemoteError::no_data());
    }
    let json: Value = serde_json::from_str(&response.body).map_err(|_| RemoteError::no_data())?;

    let rsp = match json.get("rsp") {
        Some(rsp) if rsp.is_object() => rsp,
        _ => return Err(RemoteError::Protocol("RTM error: No data".to_string())),
    };
    let stat = match rsp.get("stat").and_then(Value::as_str) {
        Some(stat) => stat,
        None => return Err(RemoteError::missing_data()),
    };

    if stat == "fail" {
        return Err(match rsp.get("err") {
            Some(err) if err.is_object() => RemoteError::Service {
                code: err.get("code").map(scalar).unwrap_or_default(),
                msg: err.get("msg").map(scalar).unwrap_or_default(),
            },
            _ => RemoteError::Protocol("Unknown RTM error".to_string()),
        });
    }
    Ok(rsp.clone())
}

/// Reads a string at `path` inside `rsp`, e.g. `["auth", "token"]`.
pub fn string_at(rsp: &Value, path: &[&str]) -> Result<String, RemoteError> {
    path.iter()
        .try_fold(rsp, |node, key| node.get(*key))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(RemoteError::missing_data)
}
