// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! ChronoLedger: an append-only bitemporal version store with half-open
//! validity intervals and point-in-time queries
//!
//! This crate provides the core components for tracking every value an
//! entity has held over business time: an immutable version ledger, a
//! mutation planner that keeps each entity's intervals non-overlapping, and
//! a lock-free read path for as-of queries.

pub mod clock;
pub mod interval;
pub mod ledger;
pub mod planner;
pub mod query;

pub use clock::{Clock, ManualClock, SystemClock};
pub use interval::{Interval, IntervalError, TimePoint, ValidTo};
pub use ledger::{
    DurabilityMode, EntityId, LedgerError, MemoryVersionStore, Payload, RocksVersionStore,
    Version, VersionId, VersionStore,
};
pub use planner::{Mutation, MutationPlan, RemovalPlan, TemporalStore};
pub use query::{History, QueryEngine};
