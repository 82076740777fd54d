// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Manually driven clock for deterministic time control.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::interval::TimePoint;

use super::Clock;

/// A [`Clock`] whose time only moves when told to.
///
/// Used wherever scheduled (future-effective) versions have to be observed
/// becoming current without waiting on real time: set the clock, issue the
/// mutation, advance past the effective instant, and query again. Also the
/// clock every test in this crate runs against.
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a manual clock starting at the given instant.
    pub fn new(start: TimePoint) -> Self {
        Self {
            now: AtomicU64::new(start.nanos()),
        }
    }

    /// Moves the clock to `at`. Never moves backwards.
    pub fn set(&self, at: TimePoint) {
        self.now.fetch_max(at.nanos(), Ordering::AcqRel);
    }

    /// Advances the clock by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_nanos() as u64, Ordering::AcqRel);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(TimePoint::ZERO)
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> TimePoint {
        TimePoint::from_nanos(self.now.load(Ordering::Acquire))
    }
}
