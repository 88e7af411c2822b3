// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::envelope::{interpret, string_at, RemoteError};
use super::transport::{HttpResponse, TransportError};
use serde_json::json;
use yare::parameterized;

fn body(body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::ok(body))
}

#[test]
fn ok_envelope_returns_rsp() {
    let rsp = interpret(body(r#"{"rsp":{"stat":"ok","frob":"abc"}}"#)).unwrap();
    assert_eq!(rsp, json!({"stat": "ok", "frob": "abc"}));
}

#[parameterized(
    empty = { "", "HTTP error: No data" },
    not_json = { "<html>", "HTTP error: No data" },
    no_rsp = { r#"{"other":1}"#, "RTM error: No data" },
    rsp_not_object = { r#"{"rsp":"ok"}"#, "RTM error: No data" },
    no_stat = { r#"{"rsp":{}}"#, "RTM error: Missing data" },
    fail_without_err = { r#"{"rsp":{"stat":"fail"}}"#, "Unknown RTM error" },
    fail_with_err = { r#"{"rsp":{"stat":"fail","err":{"code":"98","msg":"Login failed / Invalid auth token"}}}"#, "RTM error 98: Login failed / Invalid auth token" },
    numeric_code = { r#"{"rsp":{"stat":"fail","err":{"code":112,"msg":"Method not found"}}}"#, "RTM error 112: Method not found" },
)]
fn malformed_bodies_normalize(input: &str, expected: &str) {
    let err = interpret(body(input)).unwrap_err();
    assert_eq!(err.to_string(), expected);
}

#[test]
fn http_failure_is_transport_error() {
    let response = HttpResponse { status: 500, reason: "Internal Server Error".into(), body: String::new() };
    let err = interpret(Ok(response)).unwrap_err();
    assert_eq!(err, RemoteError::http(500, "Internal Server Error"));
    assert_eq!(err.to_string(), "HTTP error 500: Internal Server Error");
}

#[test]
fn no_response_is_transport_error() {
    let err = interpret(Err(TransportError::ConnectionFailed("refused".into()))).unwrap_err();
    assert!(matches!(err, RemoteError::Transport(_)));
    assert_eq!(err.to_string(), "HTTP error: No response");
}

#[test]
fn service_error_kind() {
    let err = interpret(body(r#"{"rsp":{"stat":"fail","err":{"code":"101","msg":"Invalid frob"}}}"#)).unwrap_err();
    assert_eq!(err, RemoteError::Service { code: "101".into(), msg: "Invalid frob".into() });
}

#[test]
fn exception_message_format() {
    assert_eq!(RemoteError::exception("decode", "bad due").to_string(), "Exception decode: bad due");
}

#[test]
fn string_at_walks_path() {
    let rsp = json!({"stat": "ok", "auth": {"token": "t0k"}});
    assert_eq!(string_at(&rsp, &["auth", "token"]).unwrap(), "t0k");
    assert_eq!(string_at(&rsp, &["auth", "perms"]).unwrap_err(), RemoteError::missing_data());
}
