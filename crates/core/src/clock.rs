// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! The trigger evaluator's time gate (`prevent_run_before`, §4.5) needs a
//! notion of "now" that tests can move forward without sleeping.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// A clock that provides the current time.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall-clock time.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(at)),
        }
    }

    /// An arbitrary fixed epoch, for tests that don't care what "now" is,
    /// only that it can be moved forward deterministically.
    // Allow expect here as the literal is a compile-time-verified RFC3339 timestamp
    #[allow(clippy::expect_used)]
    fn default_epoch() -> DateTime<Utc> {
        "2026-01-01T00:00:00Z".parse().expect("valid RFC3339 literal")
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut guard = self.current.lock().unwrap_or_else(|p| p.into_inner());
        *guard += duration;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        let mut guard = self.current.lock().unwrap_or_else(|p| p.into_inner());
        *guard = at;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(Self::default_epoch())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
