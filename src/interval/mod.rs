// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Half-open time intervals over business time.
//!
//! The rest of the crate reasons about validity in terms of these types:
//!
//! - [`TimePoint`]: a nanosecond instant.
//! - [`ValidTo`]: the exclusive upper bound of an interval, with a
//!   distinguished [`ValidTo::Open`] variant meaning "still current". The
//!   bound is totally ordered, so interval logic never branches on a null.
//! - [`Interval`]: `[valid_from, valid_to)` with `overlaps`, `adjacent`, and
//!   `contains` predicates.
//!
//! Everything here is a pure function; the only failure mode is constructing
//! a bounded interval whose start does not precede its end.

mod bound;
mod error;
mod half_open;

pub use bound::{TimePoint, ValidTo};
pub use error::IntervalError;
pub use half_open::Interval;
