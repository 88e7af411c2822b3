// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::io::Cursor;
use std::sync::Arc;

use super::{authorize, logout_impl};
use crate::credentials::{CredentialStore, MemoryCredentialStore};
use crate::remote::test_helpers::MockTransport;
use crate::remote::{RemoteClient, RemoteSettings};
use crate::sync::SharedConnectionState;

fn client(transport: &MockTransport, credentials: Arc<MemoryCredentialStore>) -> RemoteClient {
    let settings = RemoteSettings {
        rest_url: "https://rtm.test/services/rest/".to_string(),
        auth_url: "https://rtm.test/services/auth/".to_string(),
        api_key: "key".to_string(),
        shared_secret: "secret".to_string(),
    };
    RemoteClient::new(settings, Arc::new(transport.clone()), credentials, Arc::new(SharedConnectionState::new()))
        .unwrap()
        .0
}

#[tokio::test]
async fn authorize_prints_url_and_stores_token() {
    let transport = MockTransport::new();
    transport.respond("rtm.auth.getFrob", r#"{"rsp":{"stat":"ok","frob":"f-1"}}"#);
    transport.respond("rtm.auth.getToken", r#"{"rsp":{"stat":"ok","auth":{"token":"t-1"}}}"#);
    let credentials = Arc::new(MemoryCredentialStore::new());
    let mut client = client(&transport, credentials.clone());
    let mut out = Vec::new();

    authorize(&mut client, &mut Cursor::new("\n"), &mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("https://rtm.test/services/auth/?"));
    assert!(out.contains("frob=f-1"));
    assert!(out.contains("perms=delete"));
    assert_eq!(credentials.get().unwrap().as_deref(), Some("t-1"));
}

#[tokio::test]
async fn rejected_frob_stores_nothing() {
    let transport = MockTransport::new();
    transport.respond("rtm.auth.getFrob", r#"{"rsp":{"stat":"ok","frob":"f-1"}}"#);
    transport.respond("rtm.auth.getToken", r#"{"rsp":{"stat":"fail","err":{"code":"101","msg":"Invalid frob - did you authenticate?"}}}"#);
    let credentials = Arc::new(MemoryCredentialStore::new());
    let mut client = client(&transport, credentials.clone());

    let err = authorize(&mut client, &mut Cursor::new("\n"), &mut Vec::new()).await.unwrap_err();

    assert_eq!(err.to_string(), "RTM error 101: Invalid frob - did you authenticate?");
    assert_eq!(credentials.get().unwrap(), None);
}

#[test]
fn logout_removes_token() {
    let credentials = MemoryCredentialStore::with_token("tok");
    logout_impl(&credentials).unwrap();
    assert_eq!(credentials.get().unwrap(), None);
    logout_impl(&credentials).unwrap();
}
