// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cooldown gate for periodic remote operations.
//!
//! A [`RateLimiter`] answers one question: has at least the configured
//! interval elapsed since the operation last fired? A retry loop can call it
//! every second without the remote service seeing more than one request per
//! interval.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::clock::{ClockSource, SystemClock};

/// "Not ready again until T" gate.
pub struct RateLimiter {
    interval: Duration,
    last_fired: Option<DateTime<Utc>>,
    clock: Arc<dyn ClockSource>,
}

impl RateLimiter {
    /// Creates a limiter backed by the system clock.
    pub fn new(interval: Duration) -> Self {
        Self::with_clock(interval, Arc::new(SystemClock))
    }

    /// Creates a limiter with a custom clock source.
    pub fn with_clock(interval: Duration, clock: Arc<dyn ClockSource>) -> Self {
        RateLimiter { interval, last_fired: None, clock }
    }

    /// True if it has never fired, or the interval has elapsed since it did.
    pub fn is_ready(&self) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => self.clock.now() - last >= self.interval,
        }
    }

    /// Records "now" as the last firing.
    pub fn have_fired(&mut self) {
        self.last_fired = Some(self.clock.now());
    }

    /// Forgets the last firing so the next check is ready.
    pub fn reset(&mut self) {
        self.last_fired = None;
    }

    pub fn last_fired(&self) -> Option<DateTime<Utc>> {
        self.last_fired
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("interval", &self.interval)
            .field("last_fired", &self.last_fired)
            .finish()
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
