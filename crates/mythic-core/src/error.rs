//! Error types for collection and drag-and-drop operations.

use thiserror::Error;

/// Errors raised by store transitions and the drag session.
///
/// Every error leaves the store in the state it had before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },
    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid drag payload: {0}")]
    InvalidPayload(String),
    #[error("Duplicate id: {0}")]
    DuplicateId(u64),
    #[error("No {entity} ids left")]
    IdsExhausted { entity: &'static str },
    #[error("Inconsistent snapshot: {0}")]
    InconsistentSnapshot(String),
}

impl CollectionError {
    pub(crate) fn collection_not_found(id: crate::model::CollectionId) -> Self {
        Self::NotFound {
            entity: "Collection",
            id: id.get(),
        }
    }
}

/// Result type for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;
