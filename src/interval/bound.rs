// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Time points and the open-ended upper bound.

use std::ops::{Add, Sub};
use std::time::Duration;

/// An instant in business time, as nanoseconds since the Unix epoch.
///
/// This is application ("valid") time, not wall-clock transaction time:
/// callers choose the instant a change takes effect, which may lie in the
/// past or the future relative to `now()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimePoint(u64);

impl TimePoint {
    /// The Unix epoch itself.
    pub const ZERO: TimePoint = TimePoint(0);

    /// Creates a time point from nanoseconds since the Unix epoch.
    #[inline]
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Returns the nanoseconds since the Unix epoch.
    #[inline]
    pub fn nanos(&self) -> u64 {
        self.0
    }
}

impl Add<Duration> for TimePoint {
    type Output = TimePoint;

    #[inline]
    fn add(self, rhs: Duration) -> TimePoint {
        TimePoint(self.0.saturating_add(rhs.as_nanos() as u64))
    }
}

impl Sub<Duration> for TimePoint {
    type Output = TimePoint;

    #[inline]
    fn sub(self, rhs: Duration) -> TimePoint {
        TimePoint(self.0.saturating_sub(rhs.as_nanos() as u64))
    }
}

impl std::fmt::Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// The exclusive upper bound of a validity interval.
///
/// An open bound means "still current". It is a distinguished variant, not a
/// null: `ValidTo` is totally ordered with `Open` greater than every finite
/// bound, so interval comparisons never branch on a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidTo {
    /// The interval ends (exclusively) at this instant.
    Bounded(TimePoint),
    /// The interval has no end yet.
    Open,
}

impl ValidTo {
    /// Returns true if this is the open bound.
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, ValidTo::Open)
    }

    /// Returns the finite bound, if any.
    #[inline]
    pub fn bound(&self) -> Option<TimePoint> {
        match self {
            ValidTo::Bounded(t) => Some(*t),
            ValidTo::Open => None,
        }
    }

    /// Returns true if this bound lies strictly after `at`, i.e. an interval
    /// ending here still covers `at`.
    #[inline]
    pub fn is_after(&self, at: TimePoint) -> bool {
        match self {
            ValidTo::Bounded(t) => at < *t,
            ValidTo::Open => true,
        }
    }
}

impl From<TimePoint> for ValidTo {
    fn from(t: TimePoint) -> Self {
        ValidTo::Bounded(t)
    }
}

impl std::fmt::Display for ValidTo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidTo::Bounded(t) => write!(f, "{t}"),
            ValidTo::Open => write!(f, "open"),
        }
    }
}
