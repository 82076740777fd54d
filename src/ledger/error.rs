// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Ledger error types.

use crate::interval::{Interval, IntervalError, TimePoint};

use super::{EntityId, VersionId};

/// Errors that can occur in ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error("entity {entity} already has a live version history")]
    EntityAlreadyExists { entity: EntityId },

    #[error(
        "mutation of {entity} at {effective_at} predates the current version starting at {current_start}"
    )]
    BackdatedBeforeCurrentVersion {
        entity: EntityId,
        effective_at: TimePoint,
        current_start: TimePoint,
    },

    #[error(
        "mutation of {entity} lands exactly on the start of its already-effective version at {at}; \
         amending an effective version requires an explicit correction, not a mutation"
    )]
    CorrectionRequired { entity: EntityId, at: TimePoint },

    #[error("mutation of {entity} at {effective_at} would overlap closed version {conflicting} covering {interval}")]
    WouldOverlap {
        entity: EntityId,
        effective_at: TimePoint,
        conflicting: VersionId,
        interval: Interval,
    },

    #[error("timed out waiting for the write lock on entity {entity}")]
    LockTimeout { entity: EntityId },

    #[error("entity {entity} has no open version")]
    NoOpenVersion { entity: EntityId },

    #[error("version {id} not found for entity {entity}")]
    VersionNotFound { entity: EntityId, id: VersionId },

    #[error("version {id} is already closed at {closed_at}")]
    AlreadyClosed { id: VersionId, closed_at: TimePoint },

    #[error("entity id too large: {size} > {max}")]
    EntityIdTooLarge { size: usize, max: usize },

    #[error("payload too large: {size} > {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("ledger corruption: {0}")]
    Corruption(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<rocksdb::Error> for LedgerError {
    fn from(e: rocksdb::Error) -> Self {
        LedgerError::StorageUnavailable(e.to_string())
    }
}

impl LedgerError {
    /// Returns true if the caller may retry the operation (with backoff).
    ///
    /// Only lock contention is retryable; every other variant is either a
    /// policy violation or a fatal backend failure.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::LockTimeout { .. })
    }
}
