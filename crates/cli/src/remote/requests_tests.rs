// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::requests::{RequestCounts, RequestKind, RequestTracker, RequestsChange};
use std::sync::{Arc, Mutex};

#[test]
fn start_and_finish_move_one_gauge() {
    let mut tracker = RequestTracker::new();

    let change = tracker.start(RequestKind::PullingTasks);
    assert_eq!(change.old, RequestCounts::default());
    assert_eq!(change.new, RequestCounts { pulling_tasks: 1, ..RequestCounts::default() });

    tracker.start(RequestKind::PushingChanges);
    tracker.finish(RequestKind::PullingTasks);
    assert_eq!(tracker.counts(), RequestCounts { pushing_changes: 1, ..RequestCounts::default() });
}

#[test]
fn finish_never_goes_negative() {
    let mut tracker = RequestTracker::new();
    let change = tracker.finish(RequestKind::PullingLists);
    assert_eq!(change.new.pulling_lists, 0);
}

#[test]
fn listeners_see_every_snapshot() {
    let seen: Arc<Mutex<Vec<RequestsChange>>> = Arc::default();
    let mut tracker = RequestTracker::new();
    let sink = Arc::clone(&seen);
    tracker.add_listener(move |change| sink.lock().unwrap().push(*change));

    tracker.start(RequestKind::PushingChanges);
    tracker.finish(RequestKind::PushingChanges);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].old.pushing_changes, 1);
    assert_eq!(seen[1].new.pushing_changes, 0);
}

#[test]
fn drained_only_on_transition_to_zero() {
    let mut tracker = RequestTracker::new();
    tracker.start(RequestKind::PushingChanges);
    tracker.start(RequestKind::PushingChanges);

    assert!(!tracker.finish(RequestKind::PushingChanges).drained(RequestKind::PushingChanges));
    assert!(tracker.finish(RequestKind::PushingChanges).drained(RequestKind::PushingChanges));
    assert!(!tracker.finish(RequestKind::PushingChanges).drained(RequestKind::PushingChanges));
}

#[test]
fn idle_and_total() {
    let mut tracker = RequestTracker::new();
    assert!(tracker.counts().is_idle());
    tracker.start(RequestKind::PullingLists);
    tracker.start(RequestKind::PullingTasks);
    assert_eq!(tracker.counts().total(), 2);
    assert!(!tracker.counts().is_idle());
}
