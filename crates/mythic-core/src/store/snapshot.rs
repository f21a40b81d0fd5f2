//! Immutable collection state and its transitions.

use crate::error::{CollectionError, CollectionResult};
use crate::model::{Collection, CollectionId, Insight, InsightId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The full state of all collections at one point in time.
///
/// Transitions never touch `self`; each returns a fresh snapshot or an error,
/// so a failed call leaves the caller holding exactly what it had.
///
/// Deserialization rejects input that breaks the membership invariants, so
/// every `Snapshot` value is consistent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SnapshotData")]
pub struct Snapshot {
    collections: Vec<Collection>,
    /// Insights released from collections, in release order.
    unassigned: Vec<Insight>,
}

/// Unchecked wire form of a [`Snapshot`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotData {
    collections: Vec<Collection>,
    #[serde(default)]
    unassigned: Vec<Insight>,
}

impl TryFrom<SnapshotData> for Snapshot {
    type Error = CollectionError;

    fn try_from(data: SnapshotData) -> Result<Self, Self::Error> {
        let snapshot = Snapshot {
            collections: data.collections,
            unassigned: data.unassigned,
        };
        if !snapshot.is_consistent() {
            return Err(CollectionError::InconsistentSnapshot(
                "insight membership does not match back-references".to_string(),
            ));
        }
        Ok(snapshot)
    }
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// All collections in creation order.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Get a collection by ID.
    pub fn collection(&self, id: CollectionId) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    /// Insights that belong to no collection.
    pub fn unassigned(&self) -> &[Insight] {
        &self.unassigned
    }

    /// Number of collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Find an insight anywhere in the snapshot, along with the collection
    /// holding it.
    pub fn find_insight(&self, id: InsightId) -> Option<(&Insight, Option<CollectionId>)> {
        self.collections
            .iter()
            .find_map(|c| c.insights.iter().find(|i| i.id == id).map(|i| (i, Some(c.id))))
            .or_else(|| {
                self.unassigned
                    .iter()
                    .find(|i| i.id == id)
                    .map(|i| (i, None))
            })
    }

    /// Position of an insight inside a collection.
    pub fn position_of(&self, collection_id: CollectionId, insight_id: InsightId) -> Option<usize> {
        self.collection(collection_id)?.position(insight_id)
    }

    /// Check the membership invariants: collection ids are unique, every
    /// insight id occurs once across all collections and the unassigned
    /// shelf, and each insight's back-reference matches where it sits.
    pub fn is_consistent(&self) -> bool {
        let mut collection_ids = HashSet::new();
        let mut insight_ids = HashSet::new();

        for collection in &self.collections {
            if !collection_ids.insert(collection.id) {
                return false;
            }
            for insight in &collection.insights {
                if insight.collection_id != Some(collection.id) || !insight_ids.insert(insight.id) {
                    return false;
                }
            }
        }

        self.unassigned
            .iter()
            .all(|insight| insight.collection_id.is_none() && insight_ids.insert(insight.id))
    }

    /// Add a collection with a caller-chosen id.
    ///
    /// Insights already in `collection` are adopted: their back-reference is
    /// set to the new collection. Fails with `DuplicateId` if the collection
    /// id or any adopted insight id is already present.
    pub fn insert_collection(&self, mut collection: Collection) -> CollectionResult<Snapshot> {
        if self.collection(collection.id).is_some() {
            return Err(CollectionError::DuplicateId(collection.id.get()));
        }

        let mut adopted = HashSet::new();
        for insight in &mut collection.insights {
            if self.find_insight(insight.id).is_some() || !adopted.insert(insight.id) {
                return Err(CollectionError::DuplicateId(insight.id.get()));
            }
            insight.collection_id = Some(collection.id);
        }

        let mut next = self.clone();
        next.collections.push(collection);
        Ok(next)
    }

    /// Create an empty collection.
    pub fn create_collection(
        &self,
        id: CollectionId,
        title: impl Into<String>,
        description: Option<String>,
    ) -> CollectionResult<Snapshot> {
        self.insert_collection(Collection::new(id, title).with_description(description))
    }

    /// Append an insight to the end of a collection.
    ///
    /// If the insight is held elsewhere (another collection or the unassigned
    /// shelf) it is taken out of there in the same transition. Dropping it on
    /// the collection that already holds it moves it to the end.
    pub fn add_insight_to_collection(
        &self,
        collection_id: CollectionId,
        insight: Insight,
    ) -> CollectionResult<Snapshot> {
        self.place(collection_id, insight, None)
    }

    /// Insert an insight at `index` of a collection, with the same move
    /// semantics as [`add_insight_to_collection`](Self::add_insight_to_collection).
    ///
    /// `index` is counted after the insight has been lifted from its previous
    /// position, so `0..=len` is valid.
    pub fn insert_insight_at(
        &self,
        collection_id: CollectionId,
        insight: Insight,
        index: usize,
    ) -> CollectionResult<Snapshot> {
        self.place(collection_id, insight, Some(index))
    }

    fn place(
        &self,
        collection_id: CollectionId,
        mut insight: Insight,
        index: Option<usize>,
    ) -> CollectionResult<Snapshot> {
        let target = self.index_of(collection_id)?;

        let mut next = self.clone();
        next.lift(insight.id);

        let sequence = &mut next.collections[target].insights;
        let index = match index {
            Some(index) if index > sequence.len() => {
                return Err(CollectionError::IndexOutOfRange {
                    index,
                    len: sequence.len(),
                });
            }
            Some(index) => index,
            None => sequence.len(),
        };

        insight.collection_id = Some(collection_id);
        sequence.insert(index, insight);

        debug_assert!(next.is_consistent());
        Ok(next)
    }

    /// Remove an insight from a collection; it moves to the unassigned shelf.
    ///
    /// Removing an insight the collection does not hold returns an unchanged
    /// copy.
    pub fn remove_insight_from_collection(
        &self,
        collection_id: CollectionId,
        insight_id: InsightId,
    ) -> CollectionResult<Snapshot> {
        let target = self.index_of(collection_id)?;
        let Some(position) = self.collections[target].position(insight_id) else {
            return Ok(self.clone());
        };

        let mut next = self.clone();
        let mut insight = next.collections[target].insights.remove(position);
        insight.collection_id = None;
        next.unassigned.push(insight);

        debug_assert!(next.is_consistent());
        Ok(next)
    }

    /// Move the element at `source_index` to `target_index`, shifting the
    /// elements in between by one.
    pub fn reorder_within_collection(
        &self,
        collection_id: CollectionId,
        source_index: usize,
        target_index: usize,
    ) -> CollectionResult<Snapshot> {
        let target = self.index_of(collection_id)?;
        let len = self.collections[target].len();

        for index in [source_index, target_index] {
            if index >= len {
                return Err(CollectionError::IndexOutOfRange { index, len });
            }
        }

        if source_index == target_index {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        let sequence = &mut next.collections[target].insights;
        let moved = sequence.remove(source_index);
        sequence.insert(target_index, moved);
        Ok(next)
    }

    /// Delete a collection. Its insights become unassigned.
    pub fn delete_collection(&self, collection_id: CollectionId) -> CollectionResult<Snapshot> {
        let target = self.index_of(collection_id)?;

        let mut next = self.clone();
        let removed = next.collections.remove(target);
        next.unassigned
            .extend(removed.insights.into_iter().map(|mut insight| {
                insight.collection_id = None;
                insight
            }));

        debug_assert!(next.is_consistent());
        Ok(next)
    }

    /// Update a collection's title and description. The sequence is untouched.
    pub fn rename_collection(
        &self,
        collection_id: CollectionId,
        title: impl Into<String>,
        description: Option<String>,
    ) -> CollectionResult<Snapshot> {
        let target = self.index_of(collection_id)?;

        let mut next = self.clone();
        let collection = &mut next.collections[target];
        collection.title = title.into();
        collection.description = description;
        Ok(next)
    }

    fn index_of(&self, collection_id: CollectionId) -> CollectionResult<usize> {
        self.collections
            .iter()
            .position(|c| c.id == collection_id)
            .ok_or_else(|| CollectionError::collection_not_found(collection_id))
    }

    /// Take an insight out of wherever it currently sits.
    fn lift(&mut self, insight_id: InsightId) -> Option<Insight> {
        for collection in &mut self.collections {
            if let Some(position) = collection.position(insight_id) {
                return Some(collection.insights.remove(position));
            }
        }
        let position = self.unassigned.iter().position(|i| i.id == insight_id)?;
        Some(self.unassigned.remove(position))
    }
}
