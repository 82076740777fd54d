// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Half-open validity intervals and their predicates.

use super::error::IntervalError;
use super::{TimePoint, ValidTo};

/// A half-open validity interval `[valid_from, valid_to)`.
///
/// The start is inclusive, the end exclusive. An open end means the interval
/// covers every instant from `valid_from` onward. Both bounds are fixed at
/// construction; a bounded interval with `valid_from >= valid_to` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: TimePoint,
    end: ValidTo,
}

impl Interval {
    /// Creates an interval with the given bounds.
    pub fn new(start: TimePoint, end: ValidTo) -> Result<Self, IntervalError> {
        if let ValidTo::Bounded(bound) = end {
            if start >= bound {
                return Err(IntervalError::InvalidInterval {
                    valid_from: start,
                    valid_to: bound,
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Creates a bounded interval `[start, end)`.
    pub fn bounded(start: TimePoint, end: TimePoint) -> Result<Self, IntervalError> {
        Self::new(start, ValidTo::Bounded(end))
    }

    /// Creates an open-ended interval `[start, open)`.
    #[inline]
    pub fn open_from(start: TimePoint) -> Self {
        Self {
            start,
            end: ValidTo::Open,
        }
    }

    /// Returns the inclusive start.
    #[inline]
    pub fn start(&self) -> TimePoint {
        self.start
    }

    /// Returns the exclusive end.
    #[inline]
    pub fn end(&self) -> ValidTo {
        self.end
    }

    /// Returns true if the interval has no end yet.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.end.is_open()
    }

    /// Returns true if the interval covers `at`.
    #[inline]
    pub fn contains(&self, at: TimePoint) -> bool {
        self.start <= at && self.end.is_after(at)
    }

    /// Returns true if the two intervals share any instant.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.end.is_after(other.start) && other.end.is_after(self.start)
    }

    /// Returns true if one interval ends exactly where the other starts.
    ///
    /// Adjacent intervals tile time with no gap and no overlap; this is the
    /// continuity check between a version and its successor.
    #[inline]
    pub fn adjacent(&self, other: &Interval) -> bool {
        self.end == ValidTo::Bounded(other.start) || other.end == ValidTo::Bounded(self.start)
    }

    /// Returns a copy of this interval closed at `at`.
    ///
    /// Fails if `at` does not lie strictly after the start.
    pub fn closed_at(&self, at: TimePoint) -> Result<Interval, IntervalError> {
        Self::bounded(self.start, at)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
