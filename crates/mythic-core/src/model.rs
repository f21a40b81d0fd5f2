//! Insight and collection records.
//!
//! Records are plain data. Membership rules (an insight lives in at most one
//! collection, and its `collection_id` points back at that collection) are
//! enforced by the [`Snapshot`](crate::store::Snapshot) transitions, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an [`Insight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightId(u64);

impl InsightId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InsightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a [`Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(u64);

impl CollectionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source. Ids handed out are never reused, even after the
/// record that carried them is gone.
#[derive(Debug, Clone)]
pub struct IdSequence {
    /// `None` once `u64::MAX` has been handed out or observed.
    next: Option<u64>,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSequence {
    /// Create a sequence starting at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a sequence whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self { next: Some(first) }
    }

    /// Take the next id, or `None` if the id space is used up.
    pub fn next_id(&mut self) -> Option<u64> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// Make sure ids up to and including `id` are never handed out.
    pub fn observe(&mut self, id: u64) {
        if matches!(self.next, Some(next) if id >= next) {
            self.next = id.checked_add(1);
        }
    }

    /// Peek at the id the next call to [`next_id`](Self::next_id) returns.
    pub fn peek(&self) -> Option<u64> {
        self.next
    }

    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}

/// A single generated content record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: InsightId,
    pub content: String,
    /// Title of the theme that produced this insight.
    pub theme: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    /// Collection currently holding this insight, `None` when unassigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<CollectionId>,
}

impl PartialEq for Insight {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Insight {}

impl Insight {
    /// Create an unassigned insight stamped with the current time.
    pub fn new(id: InsightId, content: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            theme: theme.into(),
            timestamp: Utc::now(),
            tags: Vec::new(),
            is_featured: false,
            collection_id: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.is_featured = featured;
        self
    }

    /// Check if this insight is not held by any collection.
    pub fn is_unassigned(&self) -> bool {
        self.collection_id.is_none()
    }
}

/// A named, ordered container of insights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display order; index 0 is shown first.
    pub insights: Vec<Insight>,
    pub timestamp: DateTime<Utc>,
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Collection {}

impl Collection {
    /// Create an empty collection stamped with the current time.
    pub fn new(id: CollectionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            insights: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn len(&self) -> usize {
        self.insights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    /// Position of an insight in the sequence.
    pub fn position(&self, insight_id: InsightId) -> Option<usize> {
        self.insights.iter().position(|i| i.id == insight_id)
    }

    pub fn contains(&self, insight_id: InsightId) -> bool {
        self.position(insight_id).is_some()
    }

    /// Ids in display order.
    pub fn insight_ids(&self) -> Vec<InsightId> {
        self.insights.iter().map(|i| i.id).collect()
    }
}
