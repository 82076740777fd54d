// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Per-entity write serialization.
//!
//! The mutation sequence is read-latest-then-write; two concurrent mutations
//! for the same entity must not both observe the same open version. Writers
//! therefore hold the entity's lock from plan to apply. Locks are sharded by
//! entity hash to bound memory; two entities hashing to the same shard
//! serialize against each other, which affects throughput, never correctness.

use std::hash::{Hash, Hasher};
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::ledger::{EntityId, LedgerError};

const NUM_SHARDS: usize = 256;

/// Sharded lock table keyed by entity.
///
/// Acquisition waits at most the configured duration, then fails with
/// [`LedgerError::LockTimeout`]; callers retry with backoff rather than
/// blocking indefinitely.
pub struct EntityLockTable {
    shards: [Mutex<()>; NUM_SHARDS],
    max_wait: Duration,
}

/// Holds an entity's write lock until dropped.
pub struct EntityGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl EntityLockTable {
    /// Creates a lock table with the given maximum acquisition wait.
    pub fn new(max_wait: Duration) -> Self {
        Self {
            shards: std::array::from_fn(|_| Mutex::new(())),
            max_wait,
        }
    }

    /// Computes the shard index for an entity.
    #[inline]
    fn shard_index(&self, entity: &EntityId) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        entity.hash(&mut hasher);
        hasher.finish() as usize % NUM_SHARDS
    }

    /// Acquires the entity's write lock, waiting up to the configured bound.
    pub fn acquire(&self, entity: &EntityId) -> Result<EntityGuard<'_>, LedgerError> {
        let shard = &self.shards[self.shard_index(entity)];
        match shard.try_lock_for(self.max_wait) {
            Some(guard) => Ok(EntityGuard { _guard: guard }),
            None => Err(LedgerError::LockTimeout {
                entity: entity.clone(),
            }),
        }
    }
}
