// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Version store trait definition.

use crate::interval::{Interval, TimePoint};

use super::error::LedgerError;
use super::version::{EntityId, Payload, Version, VersionId};

/// The storage backend seam of the ledger.
///
/// Implementations hold, per entity, an append-mostly ordered set of
/// versions and enforce the write-time invariants:
///
/// - **Non-overlap**: no two versions of an entity share an instant.
/// - **At most one open version**, always the latest by `valid_from`.
/// - **Close-once**: an open version's end transitions to a finite bound at
///   most once; a closed version is never reopened or edited.
///
/// Each write appends one or two rows atomically. The only in-place updates
/// a backend ever performs are the single open-to-closed transition of
/// `valid_to` and the payload overwrite of a scheduled version that has not
/// started. Callers serialize writes per entity (see the planner's lock
/// table); backends are free to assume two mutations for the same entity
/// never race.
pub trait VersionStore: Send + Sync {
    /// Inserts a version for an entity with no live history.
    ///
    /// This is the first version of a new entity, or a reopening append after
    /// the previous history was fully closed. Fails with
    /// [`LedgerError::EntityAlreadyExists`] if an open version exists or the
    /// new interval would overlap existing rows.
    fn append(
        &self,
        entity: &EntityId,
        payload: Payload,
        interval: Interval,
        created_at: TimePoint,
    ) -> Result<Version, LedgerError>;

    /// Atomically closes the open version at `effective_at` and inserts the
    /// successor `[effective_at, open)` holding `payload`.
    ///
    /// `close` must name the entity's open (and therefore latest) version.
    /// The closed predecessor and the new open version are returned in that
    /// order; their intervals are exactly adjacent.
    fn close_and_append(
        &self,
        entity: &EntityId,
        close: VersionId,
        payload: Payload,
        effective_at: TimePoint,
        created_at: TimePoint,
    ) -> Result<(Version, Version), LedgerError>;

    /// Closes the open version at `effective_at` with no successor.
    ///
    /// This is the soft-delete path: from `effective_at` on, the entity has
    /// no defined value until a later append reopens it.
    fn close(
        &self,
        entity: &EntityId,
        close: VersionId,
        effective_at: TimePoint,
    ) -> Result<Version, LedgerError>;

    /// Overwrites the payload of a scheduled version.
    ///
    /// `replace` must name the entity's latest version. The caller (the
    /// mutation planner) has already verified the version has not started;
    /// the backend re-verifies only what it can see, that the target is the
    /// latest row.
    fn replace_payload(
        &self,
        entity: &EntityId,
        replace: VersionId,
        payload: Payload,
        created_at: TimePoint,
    ) -> Result<Version, LedgerError>;

    /// Returns the entity's open version, if any.
    fn get_open(&self, entity: &EntityId) -> Result<Option<Version>, LedgerError>;

    /// Returns the entity's latest version by `valid_from`, open or closed.
    fn get_latest(&self, entity: &EntityId) -> Result<Option<Version>, LedgerError>;

    /// Returns the entity's full history, oldest first.
    fn get_all(&self, entity: &EntityId) -> Result<Vec<Version>, LedgerError>;
}
