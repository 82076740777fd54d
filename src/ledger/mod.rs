// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! The version ledger: append-mostly storage of entity histories.
//!
//! Each entity's history is a sequence of [`Version`] rows whose half-open
//! validity intervals never overlap, with at most one open (current) version
//! at the tail. Rows are written once; the only transitions a row ever
//! undergoes are the single open-to-closed move of its end bound and the
//! payload overwrite of a scheduled version that has not started.
//!
//! Two backends implement the [`VersionStore`] seam:
//!
//! - [`MemoryVersionStore`]: heap-backed, for embedding and tests.
//! - [`RocksVersionStore`]: durable, on RocksDB, with newest-first row
//!   ordering so the open version is one prefix seek away.
//!
//! # Example
//!
//! ```
//! use chronoledger::interval::{Interval, TimePoint};
//! use chronoledger::ledger::{EntityId, MemoryVersionStore, Payload, VersionStore};
//!
//! let store = MemoryVersionStore::new();
//! let t0 = TimePoint::from_nanos(1_000);
//!
//! let first = store
//!     .append(&EntityId::from("product-1"), Payload::from("100"), Interval::open_from(t0), t0)
//!     .unwrap();
//! assert!(first.is_open());
//! ```

mod codec;
mod error;
mod memory;
mod rocks;
mod store;
mod version;

pub use error::LedgerError;
pub use memory::MemoryVersionStore;
pub use rocks::{DurabilityMode, RocksVersionStore};
pub use store::VersionStore;
pub use version::{
    EntityId, Payload, Version, VersionId, MAX_ENTITY_ID_SIZE, MAX_PAYLOAD_SIZE,
};
