// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Signed RPC client for the Remember The Milk REST service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ RemoteClient │────►│  Transport  │────►│  REST API   │
//! │  (+Session)  │◄────│   (trait)   │◄────│             │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//!   Completion channel  (results delivered to the controller)
//! ```
//!
//! Every call carries `format=json`, the API key, the auth token when one
//! is held, and an `api_sig` computed over all of those. Responses are
//! normalized into [`RemoteError`] strings before anything leaves the
//! client.

mod client;
mod decode;
mod envelope;
mod push;
mod requests;
mod session;
mod sign;
mod transport;

pub use client::{Completion, PulledTasks, PushOutcome, RemoteClient, RemoteSettings};
pub use decode::{decode_lists, decode_tasks, DecodedTasks};
pub use envelope::{interpret, RemoteError};
pub use push::{push_call, PushCall};
pub use requests::{RequestCounts, RequestKind, RequestTracker, RequestsChange};
pub use session::Session;
pub use sign::{concatenate, Digester, Md5Digester, Params, Signer};
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError, TransportResult};

#[cfg(test)]
pub(crate) mod test_helpers;



#[cfg(test)]
mod envelope_tests;


#[cfg(test)]
mod requests_tests;

#[cfg(test)]
mod sign_tests;
