// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Version record and its identifier types.

use crate::interval::{Interval, TimePoint, ValidTo};

/// Maximum entity id size in bytes.
pub const MAX_ENTITY_ID_SIZE: usize = 8 * 1024; // 8KB

/// Maximum payload size in bytes.
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024; // 64MB

/// The stable identifier of a versioned entity.
///
/// Opaque bytes; the ledger only hashes and compares it. The entity itself
/// is not stored here, this is the foreign key its history hangs off of.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(pub Vec<u8>);

impl EntityId {
    /// Creates a new entity id from bytes.
    #[inline]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the id bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the id.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the id is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for EntityId {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for EntityId {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl AsRef<[u8]> for EntityId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// The opaque value a version holds during its validity interval.
///
/// A price, a tier, a serialized attribute set - the ledger never looks
/// inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(pub Vec<u8>);

impl Payload {
    /// Creates a new payload from bytes.
    #[inline]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the payload bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the payload.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Unique surrogate identifier of a version row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionId(pub u64);

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// One time-bounded snapshot of an entity's value.
///
/// The interval is business (valid) time; `created_at` is the wall-clock
/// instant the row was persisted (transaction time). Once a version's end
/// has passed, none of its fields ever change again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    id: VersionId,
    entity_id: EntityId,
    payload: Payload,
    interval: Interval,
    created_at: TimePoint,
}

impl Version {
    /// Assembles a version record. Storage backends are the only intended
    /// callers; everything else receives versions from the ledger.
    pub fn new(
        id: VersionId,
        entity_id: EntityId,
        payload: Payload,
        interval: Interval,
        created_at: TimePoint,
    ) -> Self {
        Self {
            id,
            entity_id,
            payload,
            interval,
            created_at,
        }
    }

    /// Returns the version's surrogate id.
    #[inline]
    pub fn id(&self) -> VersionId {
        self.id
    }

    /// Returns the entity this version belongs to.
    #[inline]
    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Returns the payload.
    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Consumes the version, returning its payload.
    #[inline]
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Returns the validity interval.
    #[inline]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Returns the inclusive start of validity.
    #[inline]
    pub fn valid_from(&self) -> TimePoint {
        self.interval.start()
    }

    /// Returns the exclusive end of validity.
    #[inline]
    pub fn valid_to(&self) -> ValidTo {
        self.interval.end()
    }

    /// Returns the instant this row was persisted.
    #[inline]
    pub fn created_at(&self) -> TimePoint {
        self.created_at
    }

    /// Returns true if this is the entity's current, unclosed version.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.interval.is_open()
    }

    /// Returns a copy with the interval replaced. The close-once discipline
    /// is enforced by the stores, not here.
    pub(crate) fn with_interval(&self, interval: Interval) -> Self {
        Self {
            interval,
            ..self.clone()
        }
    }

    /// Returns a copy with payload and creation instant replaced, used only
    /// when overwriting a scheduled version that has not started.
    pub(crate) fn with_payload(&self, payload: Payload, created_at: TimePoint) -> Self {
        Self {
            payload,
            created_at,
            ..self.clone()
        }
    }
}
