// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! In-memory version store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::interval::{Interval, TimePoint, ValidTo};

use super::error::LedgerError;
use super::store::VersionStore;
use super::version::{
    EntityId, Payload, Version, VersionId, MAX_ENTITY_ID_SIZE, MAX_PAYLOAD_SIZE,
};

/// Heap-backed [`VersionStore`] for embedding and tests.
///
/// Histories are kept sorted by `valid_from` ascending; because appends are
/// only accepted at or after the latest end, pushing at the tail preserves
/// the order and checking the tail suffices for overlap detection.
pub struct MemoryVersionStore {
    entities: RwLock<HashMap<EntityId, Vec<Version>>>,
    next_id: AtomicU64,
}

impl MemoryVersionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn fresh_id(&self) -> VersionId {
        VersionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn validate(entity: &EntityId, payload: &Payload) -> Result<(), LedgerError> {
        if entity.len() > MAX_ENTITY_ID_SIZE {
            return Err(LedgerError::EntityIdTooLarge {
                size: entity.len(),
                max: MAX_ENTITY_ID_SIZE,
            });
        }
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(LedgerError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(())
    }
}

impl Default for MemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionStore for MemoryVersionStore {
    fn append(
        &self,
        entity: &EntityId,
        payload: Payload,
        interval: Interval,
        created_at: TimePoint,
    ) -> Result<Version, LedgerError> {
        Self::validate(entity, &payload)?;

        let mut entities = self.entities.write();
        let versions = entities.entry(entity.clone()).or_default();

        if let Some(last) = versions.last() {
            // Histories are sorted, so the tail carries the maximum end.
            if last.valid_to().is_after(interval.start()) {
                return Err(LedgerError::EntityAlreadyExists {
                    entity: entity.clone(),
                });
            }
        }

        let version = Version::new(
            self.fresh_id(),
            entity.clone(),
            payload,
            interval,
            created_at,
        );
        versions.push(version.clone());
        Ok(version)
    }

    fn close_and_append(
        &self,
        entity: &EntityId,
        close: VersionId,
        payload: Payload,
        effective_at: TimePoint,
        created_at: TimePoint,
    ) -> Result<(Version, Version), LedgerError> {
        Self::validate(entity, &payload)?;

        let mut entities = self.entities.write();
        let versions = entities
            .get_mut(entity)
            .ok_or_else(|| LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: close,
            })?;
        let last = versions
            .last_mut()
            .ok_or_else(|| LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: close,
            })?;

        if last.id() != close {
            return Err(LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: close,
            });
        }
        if let ValidTo::Bounded(closed_at) = last.valid_to() {
            return Err(LedgerError::AlreadyClosed {
                id: close,
                closed_at,
            });
        }

        let closed = last.with_interval(last.interval().closed_at(effective_at)?);
        *last = closed.clone();

        let opened = Version::new(
            self.fresh_id(),
            entity.clone(),
            payload,
            Interval::open_from(effective_at),
            created_at,
        );
        versions.push(opened.clone());

        Ok((closed, opened))
    }

    fn close(
        &self,
        entity: &EntityId,
        close: VersionId,
        effective_at: TimePoint,
    ) -> Result<Version, LedgerError> {
        let mut entities = self.entities.write();
        let last = entities
            .get_mut(entity)
            .and_then(|versions| versions.last_mut())
            .ok_or_else(|| LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: close,
            })?;

        if last.id() != close {
            return Err(LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: close,
            });
        }
        if let ValidTo::Bounded(closed_at) = last.valid_to() {
            return Err(LedgerError::AlreadyClosed {
                id: close,
                closed_at,
            });
        }

        let closed = last.with_interval(last.interval().closed_at(effective_at)?);
        *last = closed.clone();
        Ok(closed)
    }

    fn replace_payload(
        &self,
        entity: &EntityId,
        replace: VersionId,
        payload: Payload,
        created_at: TimePoint,
    ) -> Result<Version, LedgerError> {
        Self::validate(entity, &payload)?;

        let mut entities = self.entities.write();
        let last = entities
            .get_mut(entity)
            .and_then(|versions| versions.last_mut())
            .ok_or_else(|| LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: replace,
            })?;

        if last.id() != replace {
            return Err(LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: replace,
            });
        }

        let replaced = last.with_payload(payload, created_at);
        *last = replaced.clone();
        Ok(replaced)
    }

    fn get_open(&self, entity: &EntityId) -> Result<Option<Version>, LedgerError> {
        let entities = self.entities.read();
        Ok(entities
            .get(entity)
            .and_then(|versions| versions.last())
            .filter(|v| v.is_open())
            .cloned())
    }

    fn get_latest(&self, entity: &EntityId) -> Result<Option<Version>, LedgerError> {
        let entities = self.entities.read();
        Ok(entities
            .get(entity)
            .and_then(|versions| versions.last())
            .cloned())
    }

    fn get_all(&self, entity: &EntityId) -> Result<Vec<Version>, LedgerError> {
        let entities = self.entities.read();
        Ok(entities.get(entity).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(nanos: u64) -> TimePoint {
        TimePoint::from_nanos(nanos)
    }

    fn entity() -> EntityId {
        EntityId::from("product-1")
    }

    #[test]
    fn test_append_first_version() {
        let store = MemoryVersionStore::new();
        let v = store
            .append(
                &entity(),
                Payload::from("100"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();

        assert!(v.is_open());
        assert_eq!(v.valid_from(), t(100));
        assert_eq!(store.get_open(&entity()).unwrap(), Some(v));
    }

    #[test]
    fn test_append_rejects_live_history() {
        let store = MemoryVersionStore::new();
        store
            .append(
                &entity(),
                Payload::from("100"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();

        let result = store.append(
            &entity(),
            Payload::from("200"),
            Interval::open_from(t(500)),
            t(490),
        );
        assert!(matches!(
            result,
            Err(LedgerError::EntityAlreadyExists { .. })
        ));
    }

    #[test]
    fn test_close_and_append_tiles_exactly() {
        let store = MemoryVersionStore::new();
        let first = store
            .append(
                &entity(),
                Payload::from("100"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();

        let (closed, opened) = store
            .close_and_append(&entity(), first.id(), Payload::from("250"), t(200), t(190))
            .unwrap();

        assert_eq!(closed.valid_to(), ValidTo::Bounded(t(200)));
        assert_eq!(opened.valid_from(), t(200));
        assert!(closed.interval().adjacent(&opened.interval()));
        assert!(!closed.interval().overlaps(&opened.interval()));
    }

    #[test]
    fn test_close_once() {
        let store = MemoryVersionStore::new();
        let first = store
            .append(
                &entity(),
                Payload::from("100"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();

        store.close(&entity(), first.id(), t(200)).unwrap();

        // Re-closing the same version must fail and leave the row untouched.
        let result = store.close(&entity(), first.id(), t(300));
        assert!(matches!(result, Err(LedgerError::AlreadyClosed { .. })));

        let latest = store.get_latest(&entity()).unwrap().unwrap();
        assert_eq!(latest.valid_to(), ValidTo::Bounded(t(200)));
    }

    #[test]
    fn test_close_and_append_wrong_id() {
        let store = MemoryVersionStore::new();
        store
            .append(
                &entity(),
                Payload::from("100"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();

        let result =
            store.close_and_append(&entity(), VersionId(999), Payload::from("x"), t(200), t(190));
        assert!(matches!(result, Err(LedgerError::VersionNotFound { .. })));
    }

    #[test]
    fn test_reopen_after_close() {
        let store = MemoryVersionStore::new();
        let first = store
            .append(
                &entity(),
                Payload::from("100"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();
        store.close(&entity(), first.id(), t(200)).unwrap();

        assert_eq!(store.get_open(&entity()).unwrap(), None);

        // A later append reopens the entity, gap permitted.
        let reopened = store
            .append(
                &entity(),
                Payload::from("300"),
                Interval::open_from(t(500)),
                t(490),
            )
            .unwrap();
        assert!(reopened.is_open());
        assert_eq!(store.get_all(&entity()).unwrap().len(), 2);
    }

    #[test]
    fn test_replace_payload() {
        let store = MemoryVersionStore::new();
        let first = store
            .append(
                &entity(),
                Payload::from("100"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();

        let replaced = store
            .replace_payload(&entity(), first.id(), Payload::from("150"), t(95))
            .unwrap();

        assert_eq!(replaced.id(), first.id());
        assert_eq!(replaced.payload(), &Payload::from("150"));
        assert_eq!(replaced.interval(), first.interval());
        assert_eq!(store.get_all(&entity()).unwrap().len(), 1);
    }

    #[test]
    fn test_get_all_ascending() {
        let store = MemoryVersionStore::new();
        let mut open = store
            .append(
                &entity(),
                Payload::from("v0"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();
        for i in 1..5u64 {
            let (_, next) = store
                .close_and_append(
                    &entity(),
                    open.id(),
                    Payload::from(format!("v{i}").as_str()),
                    t(100 + i * 100),
                    t(90 + i * 100),
                )
                .unwrap();
            open = next;
        }

        let all = store.get_all(&entity()).unwrap();
        assert_eq!(all.len(), 5);
        for pair in all.windows(2) {
            assert!(pair[0].valid_from() < pair[1].valid_from());
            assert!(pair[0].interval().adjacent(&pair[1].interval()));
        }
        assert!(all.last().unwrap().is_open());
    }

    #[test]
    fn test_ids_are_unique() {
        let store = MemoryVersionStore::new();
        let a = store
            .append(
                &EntityId::from("a"),
                Payload::from("1"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();
        let b = store
            .append(
                &EntityId::from("b"),
                Payload::from("2"),
                Interval::open_from(t(100)),
                t(90),
            )
            .unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_entity_id_too_large() {
        let store = MemoryVersionStore::new();
        let huge = EntityId::new(vec![0u8; MAX_ENTITY_ID_SIZE + 1]);
        let result = store.append(
            &huge,
            Payload::from("1"),
            Interval::open_from(t(100)),
            t(90),
        );
        assert!(matches!(result, Err(LedgerError::EntityIdTooLarge { .. })));
    }
}
