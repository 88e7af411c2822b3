// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for HTTP communication.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP requests for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Request could not be sent or no response arrived.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Response arrived but its body could not be read.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase for `status`, e.g. "Not Found".
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    /// A `200 OK` response with `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        HttpResponse { status: 200, reason: "OK".to_string(), body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for one-shot HTTP requests.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync {
    /// Issue a GET for `url` and return the full response.
    fn get(
        &self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<HttpResponse>> + Send + '_>>;

    /// Returns true if `url` is reachable at all, whatever the status.
    fn probe(&self, url: &str) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("milk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        Ok(ReqwestTransport { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(
        &self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<HttpResponse>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let status = response.status();
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::ReceiveFailed(e.to_string()))?;

            Ok(HttpResponse { status: status.as_u16(), reason, body })
        })
    }

    fn probe(&self, url: &str) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            match self.client.head(&url).send().await {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!(error = %e, "connectivity probe failed");
                    false
                }
            }
        })
    }
}
