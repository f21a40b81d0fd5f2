//! Authoritative in-memory collection state.
//!
//! [`Snapshot`] holds the pure transitions. [`CollectionStore`] owns the
//! current snapshot and swaps it for the result of each successful command.

mod snapshot;

pub use snapshot::Snapshot;

use crate::error::{CollectionError, CollectionResult};
use crate::model::{CollectionId, IdSequence, Insight, InsightId};
use std::sync::Arc;

/// Owns the current [`Snapshot`] and applies commands to it.
///
/// Commands take `&mut self`, so two mutations can never interleave. Each
/// successful command replaces the snapshot wholesale and bumps `version`;
/// a failed command leaves both untouched.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    current: Arc<Snapshot>,
    collection_ids: IdSequence,
    version: u64,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionStore {
    /// Create a store with no collections.
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::new())
    }

    /// Create a store from an existing snapshot, such as one loaded from JSON.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let mut collection_ids = IdSequence::new();
        for collection in snapshot.collections() {
            collection_ids.observe(collection.id.get());
        }
        Self {
            current: Arc::new(snapshot),
            collection_ids,
            version: 0,
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    /// Number of committed commands.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Run a transition against the current snapshot and commit its result.
    pub fn apply<F>(&mut self, transition: F) -> CollectionResult<Arc<Snapshot>>
    where
        F: FnOnce(&Snapshot) -> CollectionResult<Snapshot>,
    {
        let next = transition(&self.current)?;
        self.current = Arc::new(next);
        self.version += 1;
        Ok(self.snapshot())
    }

    /// Create an empty collection with a fresh id.
    pub fn create_collection(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
    ) -> CollectionResult<(CollectionId, Arc<Snapshot>)> {
        let id = self
            .collection_ids
            .peek()
            .map(CollectionId::new)
            .ok_or(CollectionError::IdsExhausted {
                entity: "collection",
            })?;
        let title = title.into();
        let snapshot = self.apply(|s| s.create_collection(id, title, description))?;
        self.collection_ids.next_id();
        log::debug!("Created collection {}", id);
        Ok((id, snapshot))
    }

    pub fn add_insight_to_collection(
        &mut self,
        collection_id: CollectionId,
        insight: Insight,
    ) -> CollectionResult<Arc<Snapshot>> {
        let insight_id = insight.id;
        let snapshot = self.apply(|s| s.add_insight_to_collection(collection_id, insight))?;
        log::debug!("Insight {} appended to collection {}", insight_id, collection_id);
        Ok(snapshot)
    }

    pub fn insert_insight_at(
        &mut self,
        collection_id: CollectionId,
        insight: Insight,
        index: usize,
    ) -> CollectionResult<Arc<Snapshot>> {
        let insight_id = insight.id;
        let snapshot = self.apply(|s| s.insert_insight_at(collection_id, insight, index))?;
        log::debug!(
            "Insight {} inserted into collection {} at {}",
            insight_id,
            collection_id,
            index
        );
        Ok(snapshot)
    }

    /// Removing an insight the collection does not hold keeps the current
    /// snapshot and version.
    pub fn remove_insight_from_collection(
        &mut self,
        collection_id: CollectionId,
        insight_id: InsightId,
    ) -> CollectionResult<Arc<Snapshot>> {
        let collection = self
            .current
            .collection(collection_id)
            .ok_or_else(|| CollectionError::collection_not_found(collection_id))?;
        if !collection.contains(insight_id) {
            log::debug!("Insight {} not in collection {}", insight_id, collection_id);
            return Ok(self.snapshot());
        }
        self.apply(|s| s.remove_insight_from_collection(collection_id, insight_id))
    }

    /// Moving an element onto its own position keeps the current snapshot and
    /// version.
    pub fn reorder_within_collection(
        &mut self,
        collection_id: CollectionId,
        source_index: usize,
        target_index: usize,
    ) -> CollectionResult<Arc<Snapshot>> {
        let next = self
            .current
            .reorder_within_collection(collection_id, source_index, target_index)?;
        if source_index == target_index {
            return Ok(self.snapshot());
        }
        self.apply(|_| Ok(next))
    }

    pub fn delete_collection(
        &mut self,
        collection_id: CollectionId,
    ) -> CollectionResult<Arc<Snapshot>> {
        let snapshot = self.apply(|s| s.delete_collection(collection_id))?;
        log::debug!(
            "Deleted collection {}, {} insight(s) unassigned",
            collection_id,
            snapshot.unassigned().len()
        );
        Ok(snapshot)
    }

    pub fn rename_collection(
        &mut self,
        collection_id: CollectionId,
        title: impl Into<String>,
        description: Option<String>,
    ) -> CollectionResult<Arc<Snapshot>> {
        let title = title.into();
        self.apply(|s| s.rename_collection(collection_id, title, description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Collection;

    #[test]
    fn test_create_collection_assigns_fresh_ids() {
        let mut store = CollectionStore::new();
        let (first, _) = store.create_collection("Myths", None).unwrap();
        let (second, snapshot) = store
            .create_collection("Oracles", Some("prophecy".to_string()))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(store.version(), 2);

        // Deleted ids are not reused.
        store.delete_collection(second).unwrap();
        let (third, _) = store.create_collection("Heroes", None).unwrap();
        assert_ne!(third, second);
    }

    #[test]
    fn test_with_snapshot_continues_after_existing_ids() {
        let seeded = Snapshot::new()
            .insert_collection(Collection::new(CollectionId::new(41), "Seed"))
            .unwrap();
        let mut store = CollectionStore::with_snapshot(seeded);

        let (id, _) = store.create_collection("Next", None).unwrap();
        assert_eq!(id, CollectionId::new(42));
    }

    #[test]
    fn test_create_collection_reports_exhausted_ids() {
        let seeded = Snapshot::new()
            .insert_collection(Collection::new(CollectionId::new(u64::MAX), "Seed"))
            .unwrap();
        let mut store = CollectionStore::with_snapshot(seeded);
        let before = store.snapshot();

        let result = store.create_collection("Overflow", None);
        assert_eq!(
            result.unwrap_err(),
            CollectionError::IdsExhausted {
                entity: "collection"
            }
        );
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_with_snapshot_accepts_loaded_state() {
        let mut store = CollectionStore::new();
        let (id, _) = store.create_collection("Myths", None).unwrap();
        store
            .add_insight_to_collection(id, Insight::new(InsightId::new(5), "x", "t"))
            .unwrap();
        let json = serde_json::to_string(&*store.snapshot()).unwrap();

        let loaded: Snapshot = serde_json::from_str(&json).unwrap();
        let mut reloaded = CollectionStore::with_snapshot(loaded);
        let snapshot = reloaded
            .add_insight_to_collection(id, Insight::new(InsightId::new(9), "y", "t"))
            .unwrap();
        assert_eq!(snapshot.collection(id).unwrap().len(), 2);
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_noop_commands_keep_version() {
        let mut store = CollectionStore::new();
        let (id, _) = store.create_collection("Myths", None).unwrap();
        store
            .add_insight_to_collection(id, Insight::new(InsightId::new(1), "a", "t"))
            .unwrap();
        let before = store.snapshot();
        let version = store.version();

        let removed = store
            .remove_insight_from_collection(id, InsightId::new(404))
            .unwrap();
        let reordered = store.reorder_within_collection(id, 0, 0).unwrap();

        assert!(Arc::ptr_eq(&before, &removed));
        assert!(Arc::ptr_eq(&before, &reordered));
        assert_eq!(store.version(), version);

        // Still bounds-checked and still NotFound for a missing collection.
        assert!(matches!(
            store.reorder_within_collection(id, 3, 3),
            Err(CollectionError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            store.remove_insight_from_collection(CollectionId::new(9), InsightId::new(1)),
            Err(CollectionError::NotFound { .. })
        ));
    }

    #[test]
    fn test_failed_command_keeps_snapshot_and_version() {
        let mut store = CollectionStore::new();
        let (id, _) = store.create_collection("Only", None).unwrap();
        let before = store.snapshot();
        let version = store.version();

        let result = store.reorder_within_collection(id, 5, 0);
        assert!(matches!(result, Err(CollectionError::IndexOutOfRange { .. })));

        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_commands_replace_snapshot() {
        let mut store = CollectionStore::new();
        let (id, _) = store.create_collection("Myths", None).unwrap();
        let before = store.snapshot();

        let insight = Insight::new(InsightId::new(100), "x", "The Creation Myth");
        let after = store.add_insight_to_collection(id, insight).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert!(before.collection(id).unwrap().is_empty());
        assert_eq!(after.collection(id).unwrap().len(), 1);
    }
}
