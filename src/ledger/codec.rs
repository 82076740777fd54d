// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Row encoding for the RocksDB-backed ledger.
//!
//! Row key format: `[entity_len:u32 BE][entity bytes][MAX - valid_from:u64 BE]`
//!
//! `valid_from` is inverted (MAX - value) so the newest version of an entity
//! sorts first under the default byte-order comparator; finding the latest
//! (and therefore the open) version is a single prefix seek.
//!
//! Row value format: `[id:u64 BE][created_at:u64 BE][valid_to:u64 BE][payload]`
//!
//! `valid_to` stores `u64::MAX` as the open sentinel. Entity ids are capped
//! well below a `u32::MAX` length prefix, which leaves the all-ones prefix
//! free for store metadata keys.

use crate::interval::{Interval, TimePoint, ValidTo};

use super::error::LedgerError;
use super::version::{EntityId, Payload, Version, VersionId};

/// `valid_to` wire value meaning "open".
const OPEN_SENTINEL: u64 = u64::MAX;

/// Byte length of the value header preceding the payload.
const ROW_HEADER_LEN: usize = 24;

/// Metadata key holding the next version id. The 0xFFFFFFFF length prefix
/// cannot collide with an entity row key.
pub(crate) const NEXT_ID_KEY: &[u8] = b"\xff\xff\xff\xffnext_version_id";

/// Encodes the row key for one version of an entity.
#[inline]
pub fn encode_row_key(entity: &EntityId, valid_from: TimePoint) -> Vec<u8> {
    let bytes = entity.as_bytes();
    let mut encoded = Vec::with_capacity(4 + bytes.len() + 8);
    encoded.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    encoded.extend_from_slice(bytes);
    encoded.extend_from_slice(&(u64::MAX - valid_from.nanos()).to_be_bytes());
    encoded
}

/// Decodes a row key back into entity id and `valid_from`.
pub fn decode_row_key(encoded: &[u8]) -> Result<(EntityId, TimePoint), LedgerError> {
    if encoded.len() < 4 {
        return Err(LedgerError::Corruption(
            "row key too short for length prefix".to_string(),
        ));
    }

    let entity_len = u32::from_be_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]) as usize;
    let expected_len = 4 + entity_len + 8;
    if encoded.len() != expected_len {
        return Err(LedgerError::Corruption(format!(
            "row key: expected {} bytes, got {}",
            expected_len,
            encoded.len()
        )));
    }

    let entity = EntityId::new(encoded[4..4 + entity_len].to_vec());

    let mut inverted = [0u8; 8];
    inverted.copy_from_slice(&encoded[4 + entity_len..]);
    let valid_from = TimePoint::from_nanos(u64::MAX - u64::from_be_bytes(inverted));

    Ok((entity, valid_from))
}

/// Returns the key prefix covering every version of an entity.
#[inline]
pub fn entity_prefix(entity: &EntityId) -> Vec<u8> {
    let bytes = entity.as_bytes();
    let mut prefix = Vec::with_capacity(4 + bytes.len());
    prefix.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    prefix.extend_from_slice(bytes);
    prefix
}

/// Extracts the entity id bytes from a row key without full decoding.
#[inline]
pub fn extract_entity(encoded: &[u8]) -> Result<&[u8], LedgerError> {
    if encoded.len() < 4 {
        return Err(LedgerError::Corruption(
            "row key too short for length prefix".to_string(),
        ));
    }

    let entity_len = u32::from_be_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]) as usize;
    if encoded.len() < 4 + entity_len {
        return Err(LedgerError::Corruption(
            "row key too short for entity id".to_string(),
        ));
    }

    Ok(&encoded[4..4 + entity_len])
}

/// Encodes the value half of a version row.
pub fn encode_row_value(version: &Version) -> Vec<u8> {
    let payload = version.payload().as_bytes();
    let mut encoded = Vec::with_capacity(ROW_HEADER_LEN + payload.len());

    encoded.extend_from_slice(&version.id().0.to_be_bytes());
    encoded.extend_from_slice(&version.created_at().nanos().to_be_bytes());
    let valid_to = match version.valid_to() {
        ValidTo::Bounded(t) => t.nanos(),
        ValidTo::Open => OPEN_SENTINEL,
    };
    encoded.extend_from_slice(&valid_to.to_be_bytes());
    encoded.extend_from_slice(payload);

    encoded
}

/// Reassembles a version from its decoded key parts and its row value.
pub fn decode_row_value(
    entity: EntityId,
    valid_from: TimePoint,
    encoded: &[u8],
) -> Result<Version, LedgerError> {
    if encoded.len() < ROW_HEADER_LEN {
        return Err(LedgerError::Corruption(format!(
            "row value too short: {} < {}",
            encoded.len(),
            ROW_HEADER_LEN
        )));
    }

    let mut word = [0u8; 8];
    word.copy_from_slice(&encoded[0..8]);
    let id = VersionId(u64::from_be_bytes(word));
    word.copy_from_slice(&encoded[8..16]);
    let created_at = TimePoint::from_nanos(u64::from_be_bytes(word));
    word.copy_from_slice(&encoded[16..24]);
    let valid_to = u64::from_be_bytes(word);

    let interval = if valid_to == OPEN_SENTINEL {
        Interval::open_from(valid_from)
    } else {
        Interval::bounded(valid_from, TimePoint::from_nanos(valid_to))
            .map_err(|e| LedgerError::Corruption(format!("row interval: {e}")))?
    };

    Ok(Version::new(
        id,
        entity,
        Payload::new(encoded[ROW_HEADER_LEN..].to_vec()),
        interval,
        created_at,
    ))
}
