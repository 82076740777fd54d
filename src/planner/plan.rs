// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Mutation planning.
//!
//! Given the latest version of an entity, the requested effective instant,
//! and the current time, decide which ledger write applies - or reject the
//! request before it touches storage. Pure functions; the caller holds the
//! entity lock so the latest version cannot change underneath the plan.

use crate::interval::{Interval, TimePoint, ValidTo};
use crate::ledger::{EntityId, LedgerError, Version, VersionId};

/// The ledger write a valid mutation request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationPlan {
    /// Insert a fresh version; the entity has no live history (first version,
    /// or reopening after a soft delete, possibly leaving a gap).
    Append { interval: Interval },
    /// Close the open version at `effective_at` and insert the adjacent
    /// successor. The normal forward mutation.
    CloseAndAppend {
        close: VersionId,
        effective_at: TimePoint,
    },
    /// Overwrite the payload of a scheduled version that has not started.
    /// Repeated mutations for the same future instant converge on one row
    /// instead of stacking successors.
    ReplaceScheduled { replace: VersionId },
}

/// The ledger write a valid removal request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalPlan {
    pub close: VersionId,
    pub effective_at: TimePoint,
}

/// Plans a mutation `(new payload effective at effective_at)`.
///
/// The backdating guards are applied against the latest version whether or
/// not it has started, so scheduled versions participate in ordering like
/// any other.
pub fn plan_mutation(
    entity: &EntityId,
    latest: Option<&Version>,
    effective_at: TimePoint,
    now: TimePoint,
) -> Result<MutationPlan, LedgerError> {
    let Some(latest) = latest else {
        return Ok(MutationPlan::Append {
            interval: Interval::open_from(effective_at),
        });
    };

    if effective_at < latest.valid_from() {
        return Err(LedgerError::BackdatedBeforeCurrentVersion {
            entity: entity.clone(),
            effective_at,
            current_start: latest.valid_from(),
        });
    }

    if effective_at == latest.valid_from() {
        // Started versions are history; only a scheduled one may be redone.
        if latest.valid_from() <= now {
            return Err(LedgerError::CorrectionRequired {
                entity: entity.clone(),
                at: effective_at,
            });
        }
        return Ok(MutationPlan::ReplaceScheduled {
            replace: latest.id(),
        });
    }

    match latest.valid_to() {
        ValidTo::Open => Ok(MutationPlan::CloseAndAppend {
            close: latest.id(),
            effective_at,
        }),
        ValidTo::Bounded(end) if effective_at < end => Err(LedgerError::WouldOverlap {
            entity: entity.clone(),
            effective_at,
            conflicting: latest.id(),
            interval: latest.interval(),
        }),
        // At or past the closed end: reopen, gap permitted.
        ValidTo::Bounded(_) => Ok(MutationPlan::Append {
            interval: Interval::open_from(effective_at),
        }),
    }
}

/// Plans a soft delete: close the open version at `effective_at` with no
/// successor. The same backdating guards as [`plan_mutation`] apply.
pub fn plan_removal(
    entity: &EntityId,
    latest: Option<&Version>,
    effective_at: TimePoint,
) -> Result<RemovalPlan, LedgerError> {
    let latest = latest
        .filter(|v| v.is_open())
        .ok_or_else(|| LedgerError::NoOpenVersion {
            entity: entity.clone(),
        })?;

    if effective_at < latest.valid_from() {
        return Err(LedgerError::BackdatedBeforeCurrentVersion {
            entity: entity.clone(),
            effective_at,
            current_start: latest.valid_from(),
        });
    }
    if effective_at == latest.valid_from() {
        // Closing a version at its own start would make it empty; removing
        // a version outright is a correction, not a mutation.
        return Err(LedgerError::CorrectionRequired {
            entity: entity.clone(),
            at: effective_at,
        });
    }

    Ok(RemovalPlan {
        close: latest.id(),
        effective_at,
    })
}
