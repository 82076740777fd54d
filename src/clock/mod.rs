// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Injectable time sources.
//!
//! All "current time" decisions in the store go through the [`Clock`] trait:
//!
//! - [`SystemClock`]: wall clock with a strict monotonicity guard, for
//!   production use.
//! - [`ManualClock`]: explicitly driven clock, for deterministic tests and
//!   simulations of scheduled mutations.

mod manual;
mod system;
mod traits;

pub use manual::ManualClock;
pub use system::SystemClock;
pub use traits::Clock;
