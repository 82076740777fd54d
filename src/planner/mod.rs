// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Mutation planning and the write surface.
//!
//! Planning is a pure function from the entity's latest version and the
//! requested effective instant to a [`MutationPlan`]; [`TemporalStore`]
//! executes plans under a per-entity lock so that read-plan-apply is atomic
//! for each entity.

pub mod lock;
pub mod manager;
pub mod plan;

pub use lock::{EntityGuard, EntityLockTable};
pub use manager::{Mutation, TemporalStore, DEFAULT_LOCK_WAIT};
pub use plan::{plan_mutation, plan_removal, MutationPlan, RemovalPlan};
