// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! The temporal store: the write surface tying planner, locks, clock, and
//! ledger together.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::clock::Clock;
use crate::interval::{Interval, TimePoint};
use crate::ledger::{EntityId, LedgerError, Payload, Version, VersionStore};
use crate::query::QueryEngine;

use super::lock::EntityLockTable;
use super::plan::{plan_mutation, plan_removal, MutationPlan};

/// Default bound on waiting for a contended entity lock.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(1);

/// The outcome of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A fresh version was inserted (first version, or reopen after delete).
    Appended(Version),
    /// The open version was closed and an adjacent successor opened.
    Replaced { closed: Version, opened: Version },
    /// A scheduled version's payload was overwritten in place.
    Rescheduled(Version),
}

impl Mutation {
    /// Returns the version that is open after this mutation.
    pub fn open_version(&self) -> &Version {
        match self {
            Mutation::Appended(v) => v,
            Mutation::Replaced { opened, .. } => opened,
            Mutation::Rescheduled(v) => v,
        }
    }
}

/// Write front of the version store.
///
/// Every mutating operation runs the same sequence under the entity's write
/// lock: read the latest version, plan against it, apply the plan as one
/// atomic ledger write. Reads never take locks; see [`QueryEngine`].
pub struct TemporalStore<S: VersionStore, C: Clock> {
    store: Arc<S>,
    clock: Arc<C>,
    locks: EntityLockTable,
}

impl<S: VersionStore, C: Clock> TemporalStore<S, C> {
    /// Creates a temporal store with the default lock wait.
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_lock_wait(store, clock, DEFAULT_LOCK_WAIT)
    }

    /// Creates a temporal store with a custom bound on lock acquisition.
    pub fn with_lock_wait(store: Arc<S>, clock: Arc<C>, max_wait: Duration) -> Self {
        Self {
            store,
            clock,
            locks: EntityLockTable::new(max_wait),
        }
    }

    /// Creates the first version of an entity, valid from `valid_from` with
    /// no end.
    ///
    /// Fails with [`LedgerError::EntityAlreadyExists`] if the entity already
    /// has an open or overlapping version; an entity whose history was fully
    /// closed before `valid_from` may be recreated.
    pub fn create(
        &self,
        entity: &EntityId,
        payload: Payload,
        valid_from: TimePoint,
    ) -> Result<Version, LedgerError> {
        let _guard = self.locks.acquire(entity)?;
        let now = self.clock.now();

        let version = self
            .store
            .append(entity, payload, Interval::open_from(valid_from), now)?;

        debug!(%entity, version = %version.id(), %valid_from, "created entity");
        Ok(version)
    }

    /// Applies a mutation: `payload` becomes the entity's value effective at
    /// `effective_at`.
    ///
    /// The normal case closes the current open version at `effective_at` and
    /// opens an exactly-adjacent successor. An entity without live history is
    /// (re)opened with a fresh version. A repeat mutation aimed at the same
    /// not-yet-started scheduled version overwrites it in place. Backdated
    /// requests and requests landing inside closed history are rejected
    /// before any write.
    pub fn change(
        &self,
        entity: &EntityId,
        payload: Payload,
        effective_at: TimePoint,
    ) -> Result<Mutation, LedgerError> {
        let _guard = self.locks.acquire(entity)?;
        let now = self.clock.now();

        let latest = self.store.get_latest(entity)?;
        let mutation = match plan_mutation(entity, latest.as_ref(), effective_at, now)? {
            MutationPlan::Append { interval } => self
                .store
                .append(entity, payload, interval, now)
                .map(Mutation::Appended)?,
            MutationPlan::CloseAndAppend {
                close,
                effective_at,
            } => {
                let (closed, opened) =
                    self.store
                        .close_and_append(entity, close, payload, effective_at, now)?;
                Mutation::Replaced { closed, opened }
            }
            MutationPlan::ReplaceScheduled { replace } => self
                .store
                .replace_payload(entity, replace, payload, now)
                .map(Mutation::Rescheduled)?,
        };

        debug!(
            %entity,
            version = %mutation.open_version().id(),
            %effective_at,
            "applied mutation"
        );
        Ok(mutation)
    }

    /// Soft-deletes the entity effective at `effective_at`: the open version
    /// is closed with no successor, leaving the entity without a defined
    /// value until a later [`change`](Self::change) reopens it.
    pub fn remove(
        &self,
        entity: &EntityId,
        effective_at: TimePoint,
    ) -> Result<Version, LedgerError> {
        let _guard = self.locks.acquire(entity)?;

        let latest = self.store.get_latest(entity)?;
        let plan = plan_removal(entity, latest.as_ref(), effective_at)?;
        let closed = self.store.close(entity, plan.close, plan.effective_at)?;

        debug!(%entity, version = %closed.id(), %effective_at, "closed entity");
        Ok(closed)
    }

    /// Returns the read-side engine over the same ledger and clock.
    pub fn queries(&self) -> QueryEngine<S, C> {
        QueryEngine::new(Arc::clone(&self.store), Arc::clone(&self.clock))
    }
}
