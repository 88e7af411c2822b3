// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-flight request gauges.
//!
//! The three gauges form one snapshot: every start or finish produces a
//! single before/after pair, handed to each listener.

/// Category of an outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Pushes and timeline fetches.
    PushingChanges,
    PullingTasks,
    PullingLists,
}

/// Outstanding request counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestCounts {
    pub pushing_changes: u32,
    pub pulling_tasks: u32,
    pub pulling_lists: u32,
}

impl RequestCounts {
    pub fn get(&self, kind: RequestKind) -> u32 {
        match kind {
            RequestKind::PushingChanges => self.pushing_changes,
            RequestKind::PullingTasks => self.pulling_tasks,
            RequestKind::PullingLists => self.pulling_lists,
        }
    }

    fn slot(&mut self, kind: RequestKind) -> &mut u32 {
        match kind {
            RequestKind::PushingChanges => &mut self.pushing_changes,
            RequestKind::PullingTasks => &mut self.pulling_tasks,
            RequestKind::PullingLists => &mut self.pulling_lists,
        }
    }

    pub fn total(&self) -> u32 {
        self.pushing_changes + self.pulling_tasks + self.pulling_lists
    }

    pub fn is_idle(&self) -> bool {
        self.total() == 0
    }
}

/// A gauge transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestsChange {
    pub old: RequestCounts,
    pub new: RequestCounts,
}

impl RequestsChange {
    /// True when `kind` went from outstanding to none.
    pub fn drained(&self, kind: RequestKind) -> bool {
        self.old.get(kind) > 0 && self.new.get(kind) == 0
    }
}

type Listener = Box<dyn Fn(&RequestsChange) + Send + Sync>;

/// Owns the gauges and their listeners.
#[derive(Default)]
pub struct RequestTracker {
    counts: RequestCounts,
    listeners: Vec<Listener>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> RequestCounts {
        self.counts
    }

    pub fn add_listener(&mut self, listener: impl Fn(&RequestsChange) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn start(&mut self, kind: RequestKind) -> RequestsChange {
        self.change(kind, |n| n.saturating_add(1))
    }

    pub fn finish(&mut self, kind: RequestKind) -> RequestsChange {
        self.change(kind, |n| n.saturating_sub(1))
    }

    fn change(&mut self, kind: RequestKind, f: impl FnOnce(u32) -> u32) -> RequestsChange {
        let old = self.counts;
        let slot = self.counts.slot(kind);
        *slot = f(*slot);
        let change = RequestsChange { old, new: self.counts };
        tracing::debug!(?kind, old = ?change.old, new = ?change.new, "network requests changed");
        for listener in &self.listeners {
            listener(&change);
        }
        change
    }
}

impl std::fmt::Debug for RequestTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestTracker")
            .field("counts", &self.counts)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
