// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Clock trait definition.

use crate::interval::TimePoint;

/// The clock abstraction every time-dependent decision flows through.
///
/// The store never calls the OS clock directly: "is this version current"
/// and "has this scheduled version started" are answered against an injected
/// `Clock`, so tests drive time deterministically with [`ManualClock`]
/// instead of sleeping.
///
/// [`ManualClock`]: super::ManualClock
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    ///
    /// This is the hot path - implementations must not block or allocate.
    fn now(&self) -> TimePoint;
}
