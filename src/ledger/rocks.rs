// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! RocksDB-backed version store.

use std::path::Path;

use parking_lot::Mutex;
use rocksdb::{DBWithThreadMode, MultiThreaded, Options, WriteBatch, WriteOptions};

use crate::interval::{Interval, TimePoint, ValidTo};

use super::codec::{
    decode_row_key, decode_row_value, encode_row_key, encode_row_value, entity_prefix,
    extract_entity, NEXT_ID_KEY,
};
use super::error::LedgerError;
use super::store::VersionStore;
use super::version::{
    EntityId, Payload, Version, VersionId, MAX_ENTITY_ID_SIZE, MAX_PAYLOAD_SIZE,
};

/// Durability mode for write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Writes are synced to WAL but not fsynced to disk.
    /// Durable against process crashes but not power failures.
    /// This is the default mode, balancing performance and safety.
    #[default]
    WalOnly,
    /// Writes are fsynced to disk on every operation.
    /// Durable against power failures but slower.
    FsyncEveryWrite,
}

/// Durable [`VersionStore`] on RocksDB.
///
/// Versions are stored newest-first within each entity (see the codec), so
/// the latest and open rows are a single prefix seek away. Two-row mutations
/// (close + append) go through one `WriteBatch` and land atomically.
///
/// The version-id counter is persisted alongside the rows and written in the
/// same batch as the rows it numbered; its lock doubles as the write-order
/// guard that keeps the persisted counter ahead of every persisted row.
pub struct RocksVersionStore {
    db: DBWithThreadMode<MultiThreaded>,
    write_opts: WriteOptions,
    next_id: Mutex<u64>,
}

impl RocksVersionStore {
    /// Opens or creates a database at the given path.
    ///
    /// Uses `DurabilityMode::WalOnly` by default.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        Self::open_with_durability(path, DurabilityMode::default())
    }

    /// Opens or creates a database with the specified durability mode.
    pub fn open_with_durability(
        path: &Path,
        durability: DurabilityMode,
    ) -> Result<Self, LedgerError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        opts.set_write_buffer_size(64 * 1024 * 1024); // 64MB
        opts.set_max_write_buffer_number(4);
        opts.set_target_file_size_base(64 * 1024 * 1024);
        opts.set_level_compaction_dynamic_level_bytes(true);

        // Bloom filters for entity lookups.
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        opts.set_block_based_table_factory(&block_opts);

        // Entity prefix scans share the 4-byte length prefix.
        opts.set_prefix_extractor(rocksdb::SliceTransform::create_fixed_prefix(4));

        let db = DBWithThreadMode::open(&opts, path)?;

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(durability == DurabilityMode::FsyncEveryWrite);

        let next_id = match db.get(NEXT_ID_KEY)? {
            Some(bytes) => {
                let word: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| LedgerError::Corruption("malformed id counter".to_string()))?;
                u64::from_be_bytes(word)
            }
            None => 1,
        };

        tracing::debug!(path = %path.display(), next_id, "opened version store");

        Ok(Self {
            db,
            write_opts,
            next_id: Mutex::new(next_id),
        })
    }

    /// Forces a flush to disk.
    pub fn sync(&self) -> Result<(), LedgerError> {
        self.db.flush()?;
        Ok(())
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

    /// Reads the newest row of an entity, if any. Newest-first key order
    /// makes this the first hit under the entity's prefix.
    fn read_latest(&self, entity: &EntityId) -> Result<Option<Version>, LedgerError> {
        let prefix = entity_prefix(entity);
        let mut iter = self.db.prefix_iterator(&prefix);

        match iter.next() {
            Some(item) => {
                let (key, value) = item?;
                if extract_entity(&key)? != entity.as_bytes() {
                    return Ok(None);
                }
                let (decoded_entity, valid_from) = decode_row_key(&key)?;
                Ok(Some(decode_row_value(decoded_entity, valid_from, &value)?))
            }
            None => Ok(None),
        }
    }

    /// Writes a batch together with the advanced id counter.
    ///
    /// The counter lock is held across the write so a batch carrying ids
    /// `[first, first + count)` can never be overtaken by one carrying a
    /// smaller counter value.
    fn write_numbered(
        &self,
        count: u64,
        mut fill: impl FnMut(u64, &mut WriteBatch) -> Result<(), LedgerError>,
    ) -> Result<(), LedgerError> {
        let mut next_id = self.next_id.lock();
        let first = *next_id;

        let mut batch = WriteBatch::default();
        fill(first, &mut batch)?;
        batch.put(NEXT_ID_KEY, (first + count).to_be_bytes());

        self.db.write_opt(batch, &self.write_opts)?;
        *next_id = first + count;
        Ok(())
    }
}

impl VersionStore for RocksVersionStore {
    fn append(
        &self,
        entity: &EntityId,
        payload: Payload,
        interval: Interval,
        created_at: TimePoint,
    ) -> Result<Version, LedgerError> {
        Self::validate(entity, &payload)?;

        if let Some(latest) = self.read_latest(entity)? {
            if latest.valid_to().is_after(interval.start()) {
                return Err(LedgerError::EntityAlreadyExists {
                    entity: entity.clone(),
                });
            }
        }

        let mut appended = None;
        self.write_numbered(1, |first, batch| {
            let version = Version::new(
                VersionId(first),
                entity.clone(),
                payload.clone(),
                interval,
                created_at,
            );
            batch.put(
                encode_row_key(entity, version.valid_from()),
                encode_row_value(&version),
            );
            appended = Some(version);
            Ok(())
        })?;

        // write_numbered ran the closure exactly once.
        appended.ok_or_else(|| LedgerError::Corruption("append produced no row".to_string()))
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

        let latest = self
            .read_latest(entity)?
            .ok_or_else(|| LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: close,
            })?;
        if latest.id() != close {
            return Err(LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: close,
            });
        }
        if let ValidTo::Bounded(closed_at) = latest.valid_to() {
            return Err(LedgerError::AlreadyClosed {
                id: close,
                closed_at,
            });
        }

        let closed = latest.with_interval(latest.interval().closed_at(effective_at)?);

        let mut opened = None;
        self.write_numbered(1, |first, batch| {
            let successor = Version::new(
                VersionId(first),
                entity.clone(),
                payload.clone(),
                Interval::open_from(effective_at),
                created_at,
            );
            // Same row key as before; only valid_to changes in the envelope.
            batch.put(
                encode_row_key(entity, closed.valid_from()),
                encode_row_value(&closed),
            );
            batch.put(
                encode_row_key(entity, successor.valid_from()),
                encode_row_value(&successor),
            );
            opened = Some(successor);
            Ok(())
        })?;

        let opened = opened
            .ok_or_else(|| LedgerError::Corruption("mutation produced no row".to_string()))?;
        Ok((closed, opened))
    }

    fn close(
        &self,
        entity: &EntityId,
        close: VersionId,
        effective_at: TimePoint,
    ) -> Result<Version, LedgerError> {
        let latest = self
            .read_latest(entity)?
            .ok_or_else(|| LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: close,
            })?;
        if latest.id() != close {
            return Err(LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: close,
            });
        }
        if let ValidTo::Bounded(closed_at) = latest.valid_to() {
            return Err(LedgerError::AlreadyClosed {
                id: close,
                closed_at,
            });
        }

        let closed = latest.with_interval(latest.interval().closed_at(effective_at)?);
        self.db.put_opt(
            encode_row_key(entity, closed.valid_from()),
            encode_row_value(&closed),
            &self.write_opts,
        )?;
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

        let latest = self
            .read_latest(entity)?
            .ok_or_else(|| LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: replace,
            })?;
        if latest.id() != replace {
            return Err(LedgerError::VersionNotFound {
                entity: entity.clone(),
                id: replace,
            });
        }

        let replaced = latest.with_payload(payload, created_at);
        self.db.put_opt(
            encode_row_key(entity, replaced.valid_from()),
            encode_row_value(&replaced),
            &self.write_opts,
        )?;
        Ok(replaced)
    }

    fn get_open(&self, entity: &EntityId) -> Result<Option<Version>, LedgerError> {
        Ok(self.read_latest(entity)?.filter(|v| v.is_open()))
    }

    fn get_latest(&self, entity: &EntityId) -> Result<Option<Version>, LedgerError> {
        self.read_latest(entity)
    }

    fn get_all(&self, entity: &EntityId) -> Result<Vec<Version>, LedgerError> {
        let prefix = entity_prefix(entity);
        let iter = self.db.prefix_iterator(&prefix);

        let mut versions = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if extract_entity(&key)? != entity.as_bytes() {
                break;
            }
            let (decoded_entity, valid_from) = decode_row_key(&key)?;
            versions.push(decode_row_value(decoded_entity, valid_from, &value)?);
        }

        // Keys are newest-first; history is served oldest-first.
        versions.reverse();
        Ok(versions)
    }
}
