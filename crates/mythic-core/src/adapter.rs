//! Gesture entry points for a presentation layer.
//!
//! A UI forwards each pointer or button gesture to an
//! [`InteractionController`], which drives the [`DragSession`] and the
//! [`CollectionStore`] and pushes every new snapshot to its observers.

use crate::drag::{DragSession, DropOutcome};
use crate::error::{CollectionError, CollectionResult};
use crate::model::{CollectionId, Insight, InsightId};
use crate::store::{CollectionStore, Snapshot};
use std::sync::Arc;

/// Receives the full snapshot after every committed change.
pub trait SnapshotObserver {
    fn snapshot_changed(&mut self, snapshot: &Arc<Snapshot>);
}

impl<F> SnapshotObserver for F
where
    F: FnMut(&Arc<Snapshot>),
{
    fn snapshot_changed(&mut self, snapshot: &Arc<Snapshot>) {
        self(snapshot)
    }
}

/// A discrete user gesture.
#[derive(Debug, Clone)]
pub enum Gesture {
    /// Start dragging an insight shown at `index`.
    DragStart { insight: Insight, index: usize },
    /// Pointer entered a collection during a drag.
    DragOver { collection_id: CollectionId },
    /// Pointer left a collection during a drag.
    DragLeave { collection_id: CollectionId },
    /// Drop an encoded payload on a collection, optionally at a position.
    Drop {
        collection_id: CollectionId,
        payload: String,
        index: Option<usize>,
    },
    /// Drop outside any collection.
    DropOutside,
    /// Drag aborted (e.g. Escape).
    CancelDrag,
    DeleteInsight {
        collection_id: CollectionId,
        insight_id: InsightId,
    },
    DeleteCollection { collection_id: CollectionId },
    EditCollection {
        collection_id: CollectionId,
        title: String,
        description: Option<String>,
    },
    CreateCollection {
        title: String,
        description: Option<String>,
    },
    Reorder {
        collection_id: CollectionId,
        source: usize,
        target: usize,
    },
}

/// What a handled gesture produced.
#[derive(Debug, Clone)]
pub enum GestureResponse {
    /// Drag started; the encoded payload for the drag channel.
    DragStarted(String),
    /// Drop feedback changed; nothing was committed.
    Feedback { armed: Option<CollectionId> },
    /// Drag ended without a drop.
    DragEnded,
    Dropped(DropOutcome),
    CollectionCreated {
        id: CollectionId,
        snapshot: Arc<Snapshot>,
    },
    Changed(Arc<Snapshot>),
}

/// Couples the store, the drag session and the observers.
pub struct InteractionController {
    store: CollectionStore,
    drag: DragSession,
    observers: Vec<Box<dyn SnapshotObserver>>,
    /// Store version the observers last saw.
    notified_version: u64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(CollectionStore::new())
    }
}

impl InteractionController {
    pub fn new(store: CollectionStore) -> Self {
        Self {
            notified_version: store.version(),
            store,
            drag: DragSession::default(),
            observers: Vec::new(),
        }
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    /// Register an observer for snapshot changes.
    pub fn subscribe(&mut self, observer: impl SnapshotObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Dispatch a gesture to its entry point.
    pub fn handle(&mut self, gesture: Gesture) -> CollectionResult<GestureResponse> {
        match gesture {
            Gesture::DragStart { insight, index } => self
                .on_drag_start(&insight, index)
                .map(GestureResponse::DragStarted),
            Gesture::DragOver { collection_id } => {
                self.on_drag_over(collection_id);
                Ok(GestureResponse::Feedback {
                    armed: self.drag.hover_target(),
                })
            }
            Gesture::DragLeave { collection_id } => {
                self.on_drag_leave(collection_id);
                Ok(GestureResponse::Feedback {
                    armed: self.drag.hover_target(),
                })
            }
            Gesture::Drop {
                collection_id,
                payload,
                index,
            } => self
                .on_drop(collection_id, &payload, index)
                .map(GestureResponse::Dropped),
            Gesture::DropOutside => {
                self.on_drop_outside();
                Ok(GestureResponse::DragEnded)
            }
            Gesture::CancelDrag => {
                self.on_drag_cancel();
                Ok(GestureResponse::DragEnded)
            }
            Gesture::DeleteInsight {
                collection_id,
                insight_id,
            } => self
                .on_delete_insight(collection_id, insight_id)
                .map(GestureResponse::Changed),
            Gesture::DeleteCollection { collection_id } => self
                .on_delete_collection(collection_id)
                .map(GestureResponse::Changed),
            Gesture::EditCollection {
                collection_id,
                title,
                description,
            } => self
                .on_edit_collection(collection_id, title, description)
                .map(GestureResponse::Changed),
            Gesture::CreateCollection { title, description } => self
                .on_create_collection(title, description)
                .map(|(id, snapshot)| GestureResponse::CollectionCreated { id, snapshot }),
            Gesture::Reorder {
                collection_id,
                source,
                target,
            } => self
                .on_reorder(collection_id, source, target)
                .map(GestureResponse::Changed),
        }
    }

    /// Start dragging an insight; returns the encoded payload.
    pub fn on_drag_start(&mut self, insight: &Insight, index: usize) -> CollectionResult<String> {
        self.drag.start(insight, index)
    }

    /// Start dragging an insight that is already in the store.
    pub fn on_drag_start_by_id(&mut self, insight_id: InsightId) -> CollectionResult<String> {
        let not_found = || CollectionError::NotFound {
            entity: "Insight",
            id: insight_id.get(),
        };
        let snapshot = self.store.snapshot();
        let (insight, holder) = snapshot.find_insight(insight_id).ok_or_else(not_found)?;
        let index = match holder {
            Some(collection_id) => snapshot.position_of(collection_id, insight_id),
            None => snapshot.unassigned().iter().position(|i| i.id == insight_id),
        }
        .ok_or_else(not_found)?;
        self.drag.start(insight, index)
    }

    pub fn on_drag_over(&mut self, collection_id: CollectionId) {
        self.drag.drag_over(collection_id);
    }

    pub fn on_drag_leave(&mut self, collection_id: CollectionId) {
        self.drag.drag_leave(collection_id);
    }

    pub fn on_drop(
        &mut self,
        collection_id: CollectionId,
        payload: &str,
        index: Option<usize>,
    ) -> CollectionResult<DropOutcome> {
        let result = self.drag.drop_on(&mut self.store, collection_id, payload, index);
        let outcome = self.report(result)?;
        self.notify(&outcome.snapshot);
        Ok(outcome)
    }

    pub fn on_drop_outside(&mut self) {
        self.drag.cancel();
    }

    pub fn on_drag_cancel(&mut self) {
        self.drag.cancel();
    }

    pub fn on_delete_insight(
        &mut self,
        collection_id: CollectionId,
        insight_id: InsightId,
    ) -> CollectionResult<Arc<Snapshot>> {
        let result = self
            .store
            .remove_insight_from_collection(collection_id, insight_id);
        self.commit(result)
    }

    pub fn on_delete_collection(
        &mut self,
        collection_id: CollectionId,
    ) -> CollectionResult<Arc<Snapshot>> {
        let result = self.store.delete_collection(collection_id);
        self.commit(result)
    }

    pub fn on_edit_collection(
        &mut self,
        collection_id: CollectionId,
        title: String,
        description: Option<String>,
    ) -> CollectionResult<Arc<Snapshot>> {
        let result = self
            .store
            .rename_collection(collection_id, title, description);
        self.commit(result)
    }

    pub fn on_create_collection(
        &mut self,
        title: String,
        description: Option<String>,
    ) -> CollectionResult<(CollectionId, Arc<Snapshot>)> {
        let result = self.store.create_collection(title, description);
        let (id, snapshot) = self.report(result)?;
        self.notify(&snapshot);
        Ok((id, snapshot))
    }

    pub fn on_reorder(
        &mut self,
        collection_id: CollectionId,
        source: usize,
        target: usize,
    ) -> CollectionResult<Arc<Snapshot>> {
        let result = self
            .store
            .reorder_within_collection(collection_id, source, target);
        self.commit(result)
    }

    fn commit(
        &mut self,
        result: CollectionResult<Arc<Snapshot>>,
    ) -> CollectionResult<Arc<Snapshot>> {
        let snapshot = self.report(result)?;
        self.notify(&snapshot);
        Ok(snapshot)
    }

    fn report<T>(&self, result: CollectionResult<T>) -> CollectionResult<T> {
        if let Err(e) = &result {
            log::warn!("Gesture rejected: {}", e);
        }
        result
    }

    /// Push the snapshot to observers unless the store did not change.
    fn notify(&mut self, snapshot: &Arc<Snapshot>) {
        let version = self.store.version();
        if version == self.notified_version {
            return;
        }
        self.notified_version = version;
        for observer in &mut self.observers {
            observer.snapshot_changed(snapshot);
        }
    }
}
