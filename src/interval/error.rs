// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Interval error types.

use super::TimePoint;

/// Errors that can occur constructing intervals.
#[derive(Debug, thiserror::Error)]
pub enum IntervalError {
    #[error("invalid interval: valid_from {valid_from} >= valid_to {valid_to}")]
    InvalidInterval {
        valid_from: TimePoint,
        valid_to: TimePoint,
    },
}
