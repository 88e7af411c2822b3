// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

mod common;
use common::*;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TASKS_BODY: &str = r#"{"rsp":{"stat":"ok","tasks":{"list":[{"id":"10","taskseries":[
    {"id":"20","name":"Buy oat milk","modified":"2009-12-01T10:00:00Z",
     "task":{"id":"30","due":"2009-12-04T00:00:00Z","completed":"","deleted":""}},
    {"id":"21","name":"Call mum","modified":"2009-12-01T11:00:00Z",
     "task":{"id":"31","due":"","completed":"","deleted":""}}
]}]}}}"#;

const LISTS_BODY: &str = r#"{"rsp":{"stat":"ok","lists":{"list":[
    {"id":"10","name":"Inbox","deleted":"0","locked":"1","archived":"0","position":"-1","smart":"0"},
    {"id":"11","name":"Work","deleted":"0","locked":"0","archived":"0","position":"0","smart":"0"}
]}}}"#;

async fn respond(server: &MockServer, rtm_method: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/services/rest/"))
        .and(query_param("method", rtm_method))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[test]
fn sync_without_api_key_fails() {
    let env = Env::new();
    env.milk()
        .args(["sync", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_key is not configured"));
}

#[test]
fn sync_without_token_asks_for_auth() {
    let env = Env::new();
    env.configure("https://rtm.test/services/rest/");
    env.milk()
        .args(["sync", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not authorized"));
}

#[test]
fn sync_once_offline_keeps_pending_changes() {
    let env = Env::new();
    env.configure("http://127.0.0.1:1/services/rest/");
    env.authorize("tok");
    env.seed(vec![renamed("10/20/30", "Buy milk", "Buy oat milk")]);

    env.milk()
        .args(["sync", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Offline: nothing synced (1 changes pending)"));

    assert_eq!(env.tasks().pending_count(), 1);
}

#[test]
fn second_sync_is_refused_while_one_runs() {
    use fs2::FileExt;

    let env = Env::new();
    env.configure("http://127.0.0.1:1/services/rest/");
    env.authorize("tok");
    let lock = std::fs::File::create(env.data_dir().join("sync.lock")).unwrap();
    lock.try_lock_exclusive().unwrap();

    env.milk()
        .args(["sync", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("another 'milk sync' is already running"));
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_once_pushes_and_pulls() {
    let server = MockServer::start().await;
    respond(&server, "rtm.timelines.create", r#"{"rsp":{"stat":"ok","timeline":"tl-1"}}"#).await;
    respond(&server, "rtm.tasks.setName", r#"{"rsp":{"stat":"ok"}}"#).await;
    respond(&server, "rtm.tasks.getList", TASKS_BODY).await;
    respond(&server, "rtm.lists.getList", LISTS_BODY).await;

    let env = Env::new();
    env.configure(&format!("{}/services/rest/", server.uri()));
    env.authorize("tok");
    env.seed(vec![renamed("10/20/30", "Buy milk", "Buy oat milk")]);

    let mut cmd = env.milk();
    tokio::task::spawn_blocking(move || {
        cmd.args(["sync", "--once"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 tasks, 2 lists, 0 changes pending"));
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    let set_name = requests
        .iter()
        .find(|r| r.url.query_pairs().any(|(k, v)| k == "method" && v == "rtm.tasks.setName"))
        .unwrap();
    let params: std::collections::HashMap<_, _> = set_name.url.query_pairs().collect();
    assert_eq!(params["name"], "Buy oat milk");
    assert_eq!(params["timeline"], "tl-1");
    assert_eq!(params["auth_token"], "tok");

    let tasks = env.tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks.pending_count(), 0);
    assert_eq!(tasks.find_by_task_id("30").unwrap().name, "Buy oat milk");

    env.milk()
        .args(["lists"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work"));
}
