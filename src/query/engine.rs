// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Point-in-time reads over the version ledger.

use std::sync::Arc;

use crate::clock::Clock;
use crate::interval::{Interval, TimePoint};
use crate::ledger::{EntityId, LedgerError, Payload, Version, VersionStore};

/// Read-side engine over a version ledger.
///
/// Queries take no locks: every version row is immutable once written, and
/// the non-overlap invariant means any instant matches at most one version,
/// so a plain scan of the entity's history is always consistent.
pub struct QueryEngine<S: VersionStore, C: Clock> {
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S: VersionStore, C: Clock> QueryEngine<S, C> {
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Returns the payload valid at `at`, or `None` when the entity has no
    /// version covering that instant (never existed yet, or removed).
    pub fn as_of(&self, entity: &EntityId, at: TimePoint) -> Result<Option<Payload>, LedgerError> {
        Ok(self.version_as_of(entity, at)?.map(Version::into_payload))
    }

    /// Like [`as_of`](Self::as_of), but returns the full version row.
    pub fn version_as_of(
        &self,
        entity: &EntityId,
        at: TimePoint,
    ) -> Result<Option<Version>, LedgerError> {
        let versions = self.store.get_all(entity)?;
        Ok(versions.into_iter().find(|v| v.interval().contains(at)))
    }

    /// Returns the payload valid right now.
    ///
    /// A scheduled version whose effective instant has not arrived is not
    /// visible here: its predecessor is closed at that future instant and so
    /// still covers the present.
    pub fn current(&self, entity: &EntityId) -> Result<Option<Payload>, LedgerError> {
        self.as_of(entity, self.clock.now())
    }

    /// Returns the entity's full history, oldest first.
    pub fn history(&self, entity: &EntityId) -> Result<History, LedgerError> {
        let versions = self.store.get_all(entity)?;
        Ok(History {
            inner: versions.into_iter(),
        })
    }

    /// Returns every version whose validity overlaps `[from, to)`, oldest
    /// first. Fails with [`LedgerError::Interval`] when the window is empty
    /// or inverted.
    pub fn diff(
        &self,
        entity: &EntityId,
        from: TimePoint,
        to: TimePoint,
    ) -> Result<Vec<Version>, LedgerError> {
        let window = Interval::bounded(from, to)?;
        let versions = self.store.get_all(entity)?;
        Ok(versions
            .into_iter()
            .filter(|v| v.interval().overlaps(&window))
            .collect())
    }
}

/// Iterator over an entity's versions in ascending `valid_from` order.
pub struct History {
    inner: std::vec::IntoIter<Version>,
}

impl Iterator for History {
    type Item = Version;

    fn next(&mut self) -> Option<Version> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for History {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::ledger::MemoryVersionStore;
    use crate::planner::TemporalStore;
    use std::time::Duration;

    fn t(nanos: u64) -> TimePoint {
        TimePoint::from_nanos(nanos)
    }

    fn create_test_store(
        now: TimePoint,
    ) -> (
        TemporalStore<MemoryVersionStore, ManualClock>,
        Arc<ManualClock>,
    ) {
        let clock = Arc::new(ManualClock::new(now));
        let store = TemporalStore::new(Arc::new(MemoryVersionStore::new()), Arc::clone(&clock));
        (store, clock)
    }

    fn entity() -> EntityId {
        EntityId::from("product-1")
    }

    #[test]
    fn test_as_of_before_first_version() {
        let (store, _clock) = create_test_store(t(1_000));
        store
            .create(&entity(), Payload::from("100"), t(1_000))
            .unwrap();

        let queries = store.queries();
        assert_eq!(queries.as_of(&entity(), t(500)).unwrap(), None);
        assert_eq!(
            queries.as_of(&entity(), t(1_000)).unwrap(),
            Some(Payload::from("100"))
        );
    }

    #[test]
    fn test_as_of_selects_covering_version() {
        let (store, _clock) = create_test_store(t(1_000));
        store
            .create(&entity(), Payload::from("100"), t(1_000))
            .unwrap();
        store
            .change(&entity(), Payload::from("250"), t(2_000))
            .unwrap();

        let queries = store.queries();
        assert_eq!(
            queries.as_of(&entity(), t(1_500)).unwrap(),
            Some(Payload::from("100"))
        );
        // Boundary instant belongs to the successor, not the closed version.
        assert_eq!(
            queries.as_of(&entity(), t(2_000)).unwrap(),
            Some(Payload::from("250"))
        );
        assert_eq!(
            queries.as_of(&entity(), t(9_000)).unwrap(),
            Some(Payload::from("250"))
        );
    }

    #[test]
    fn test_current_tracks_clock() {
        let (store, clock) = create_test_store(t(1_000));
        store
            .create(&entity(), Payload::from("100"), t(1_000))
            .unwrap();

        let queries = store.queries();
        assert_eq!(
            queries.current(&entity()).unwrap(),
            Some(Payload::from("100"))
        );

        store.remove(&entity(), t(5_000)).unwrap();
        assert_eq!(
            queries.current(&entity()).unwrap(),
            Some(Payload::from("100")),
            "removal scheduled ahead of now must not take effect yet"
        );

        clock.set(t(5_000));
        assert_eq!(queries.current(&entity()).unwrap(), None);
    }

    #[test]
    fn test_scheduled_change_invisible_until_effective() {
        let (store, clock) = create_test_store(t(1_000));
        store
            .create(&entity(), Payload::from("100"), t(1_000))
            .unwrap();
        store
            .change(&entity(), Payload::from("250"), t(5_000))
            .unwrap();

        let queries = store.queries();
        assert_eq!(
            queries.current(&entity()).unwrap(),
            Some(Payload::from("100"))
        );

        clock.advance(Duration::from_nanos(4_000));
        assert_eq!(
            queries.current(&entity()).unwrap(),
            Some(Payload::from("250"))
        );
    }

    #[test]
    fn test_history_ascending_and_exact() {
        let (store, _clock) = create_test_store(t(1_000));
        store
            .create(&entity(), Payload::from("a"), t(1_000))
            .unwrap();
        store.change(&entity(), Payload::from("b"), t(2_000)).unwrap();
        store.change(&entity(), Payload::from("c"), t(3_000)).unwrap();

        let history: Vec<Version> = store.queries().history(&entity()).unwrap().collect();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].payload(), &Payload::from("a"));
        assert_eq!(history[2].payload(), &Payload::from("c"));
        assert!(history[0].valid_from() < history[1].valid_from());
        assert!(history[2].is_open());
    }

    #[test]
    fn test_history_of_unknown_entity_is_empty() {
        let (store, _clock) = create_test_store(t(1_000));
        let history = store.queries().history(&entity()).unwrap();
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn test_gap_after_removal_reads_none() {
        let (store, _clock) = create_test_store(t(1_000));
        store
            .create(&entity(), Payload::from("100"), t(1_000))
            .unwrap();
        store.remove(&entity(), t(2_000)).unwrap();
        store
            .change(&entity(), Payload::from("500"), t(4_000))
            .unwrap();

        let queries = store.queries();
        assert_eq!(
            queries.as_of(&entity(), t(1_500)).unwrap(),
            Some(Payload::from("100"))
        );
        assert_eq!(queries.as_of(&entity(), t(3_000)).unwrap(), None);
        assert_eq!(
            queries.as_of(&entity(), t(4_000)).unwrap(),
            Some(Payload::from("500"))
        );
    }

    #[test]
    fn test_diff_window() {
        let (store, _clock) = create_test_store(t(1_000));
        store
            .create(&entity(), Payload::from("a"), t(1_000))
            .unwrap();
        store.change(&entity(), Payload::from("b"), t(2_000)).unwrap();
        store.change(&entity(), Payload::from("c"), t(3_000)).unwrap();

        let queries = store.queries();

        // Window entirely inside the first version.
        let inside = queries.diff(&entity(), t(1_100), t(1_200)).unwrap();
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].payload(), &Payload::from("a"));

        // Window spanning the first two versions.
        let spanning = queries.diff(&entity(), t(1_500), t(2_500)).unwrap();
        assert_eq!(spanning.len(), 2);

        // Window before any history.
        assert!(queries.diff(&entity(), t(100), t(200)).unwrap().is_empty());
    }

    #[test]
    fn test_diff_rejects_inverted_window() {
        let (store, _clock) = create_test_store(t(1_000));
        let queries = store.queries();
        assert!(matches!(
            queries.diff(&entity(), t(2_000), t(1_000)),
            Err(LedgerError::Interval(_))
        ));
        assert!(matches!(
            queries.diff(&entity(), t(2_000), t(2_000)),
            Err(LedgerError::Interval(_))
        ));
    }

    #[test]
    fn test_version_as_of_exposes_row() {
        let (store, _clock) = create_test_store(t(1_000));
        store
            .create(&entity(), Payload::from("100"), t(1_000))
            .unwrap();

        let queries = store.queries();
        let version = queries.version_as_of(&entity(), t(1_500)).unwrap().unwrap();
        assert_eq!(version.valid_from(), t(1_000));
        assert!(version.is_open());
    }
}
