//! Mythic Machines Core Library
//!
//! Platform-agnostic data model, collection store and drag-and-drop
//! protocol for organizing generated insights into collections.

pub mod adapter;
pub mod drag;
pub mod error;
pub mod explore;
pub mod model;
pub mod store;

pub use adapter::{Gesture, GestureResponse, InteractionController, SnapshotObserver};
pub use drag::{DragPayload, DragSession, DropKind, DropOutcome};
pub use error::{CollectionError, CollectionResult};
pub use explore::{
    ExplorationSession, GenerationError, GenerationRequest, Generator, MockGenerator, Theme,
    ThemeCatalog,
};
pub use model::{Collection, CollectionId, IdSequence, Insight, InsightId};
pub use store::{CollectionStore, Snapshot};
