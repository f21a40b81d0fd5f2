//! Drag session state machine.

use super::payload::DragPayload;
use crate::error::CollectionResult;
use crate::model::{CollectionId, Insight, InsightId};
use crate::store::{CollectionStore, Snapshot};
use std::sync::Arc;

/// The transient state between a drag start and its drop or cancel.
#[derive(Debug, Clone, Default)]
pub enum DragSession {
    /// No drag in progress.
    #[default]
    Idle,
    /// An insight is being dragged.
    Dragging {
        payload: DragPayload,
        /// Collection currently showing drop feedback, if any.
        hover: Option<CollectionId>,
    },
}

/// How a drop related the target to where the insight came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// The insight was unassigned before the drop.
    Assigned,
    /// The insight came from another collection.
    Moved { from: CollectionId },
    /// The insight was dropped on the collection it came from.
    Repositioned,
}

/// Result of a drop that reached the store.
#[derive(Debug, Clone)]
pub struct DropOutcome {
    pub kind: DropKind,
    pub insight_id: InsightId,
    pub target: CollectionId,
    pub snapshot: Arc<Snapshot>,
}

impl DragSession {
    /// Check if a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Payload of the drag in progress.
    pub fn payload(&self) -> Option<&DragPayload> {
        match self {
            Self::Dragging { payload, .. } => Some(payload),
            Self::Idle => None,
        }
    }

    /// Collection currently armed as drop target.
    pub fn hover_target(&self) -> Option<CollectionId> {
        match self {
            Self::Dragging { hover, .. } => *hover,
            Self::Idle => None,
        }
    }

    /// Check if a collection should show drop feedback.
    pub fn is_hover_armed(&self, collection_id: CollectionId) -> bool {
        self.hover_target() == Some(collection_id)
    }

    /// Begin dragging an insight shown at `index`.
    ///
    /// Returns the encoded payload to hand to the drag channel. A drag
    /// already in progress is replaced.
    pub fn start(&mut self, insight: &Insight, index: usize) -> CollectionResult<String> {
        let payload = DragPayload::capture(insight, index);
        let encoded = payload.encode()?;

        if let Some(previous) = self.payload() {
            log::debug!(
                "Drag of insight {} replaced by insight {}",
                previous.insight.id,
                insight.id
            );
        }
        log::debug!("Drag started: insight {} at index {}", insight.id, index);

        *self = Self::Dragging {
            payload,
            hover: None,
        };
        Ok(encoded)
    }

    /// Pointer entered a collection while dragging. Returns whether the
    /// collection is now armed.
    pub fn drag_over(&mut self, collection_id: CollectionId) -> bool {
        match self {
            Self::Dragging { hover, .. } => {
                *hover = Some(collection_id);
                true
            }
            Self::Idle => false,
        }
    }

    /// Pointer left a collection.
    pub fn drag_leave(&mut self, collection_id: CollectionId) {
        if let Self::Dragging { hover, .. } = self {
            if *hover == Some(collection_id) {
                *hover = None;
            }
        }
    }

    /// Abandon the drag without touching the store.
    ///
    /// Covers both an explicit cancel and a drop outside any collection.
    pub fn cancel(&mut self) -> Option<DragPayload> {
        match std::mem::take(self) {
            Self::Dragging { payload, .. } => {
                log::debug!("Drag of insight {} cancelled", payload.insight.id);
                Some(payload)
            }
            Self::Idle => None,
        }
    }

    /// Drop encoded `data` onto a collection.
    ///
    /// The payload is decoded from `data` alone, so a drop works even when
    /// this session never saw the matching start. With `index` the insight is
    /// inserted there; without it, appended. The session is idle afterwards
    /// whether or not the store accepted the drop.
    pub fn drop_on(
        &mut self,
        store: &mut CollectionStore,
        target: CollectionId,
        data: &str,
        index: Option<usize>,
    ) -> CollectionResult<DropOutcome> {
        if !self.is_dragging() {
            log::debug!("Drop on collection {} without a local drag start", target);
        }
        *self = Self::Idle;

        let payload = DragPayload::decode(data)?;
        let insight_id = payload.insight.id;
        let kind = match payload.source_collection_id {
            None => DropKind::Assigned,
            Some(source) if source == target => DropKind::Repositioned,
            Some(source) => DropKind::Moved { from: source },
        };

        let snapshot = match index {
            Some(index) => store.insert_insight_at(target, payload.insight, index)?,
            None => store.add_insight_to_collection(target, payload.insight)?,
        };

        Ok(DropOutcome {
            kind,
            insight_id,
            target,
            snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectionError;

    fn setup() -> (CollectionStore, CollectionId, CollectionId) {
        let mut store = CollectionStore::new();
        let (a, _) = store.create_collection("Creation", None).unwrap();
        let (b, _) = store.create_collection("Journey", None).unwrap();
        for id in 1..=3 {
            let insight =
                Insight::new(InsightId::new(id), format!("passage {id}"), "The Creation Myth");
            store.add_insight_to_collection(a, insight).unwrap();
        }
        (store, a, b)
    }

    fn held(store: &CollectionStore, id: CollectionId) -> Vec<u64> {
        store
            .snapshot()
            .collection(id)
            .unwrap()
            .insight_ids()
            .into_iter()
            .map(InsightId::get)
            .collect()
    }

    #[test]
    fn test_default_is_idle() {
        let session = DragSession::default();
        assert!(!session.is_dragging());
        assert!(session.payload().is_none());
    }

    #[test]
    fn test_drag_and_drop_across_collections() {
        let (mut store, a, b) = setup();
        let mut session = DragSession::default();
        let dragged = store.snapshot().collection(a).unwrap().insights[1].clone();

        let data = session.start(&dragged, 1).unwrap();
        assert!(session.is_dragging());

        let outcome = session.drop_on(&mut store, b, &data, None).unwrap();
        assert_eq!(outcome.kind, DropKind::Moved { from: a });
        assert_eq!(outcome.insight_id, InsightId::new(2));
        assert!(!session.is_dragging());

        assert_eq!(held(&store, a), vec![1, 3]);
        assert_eq!(held(&store, b), vec![2]);
        assert!(outcome.snapshot.is_consistent());
    }

    #[test]
    fn test_drop_on_source_collection() {
        let (mut store, a, _) = setup();
        let mut session = DragSession::default();
        let first = store.snapshot().collection(a).unwrap().insights[0].clone();

        let data = session.start(&first, 0).unwrap();
        let outcome = session.drop_on(&mut store, a, &data, None).unwrap();

        assert_eq!(outcome.kind, DropKind::Repositioned);
        assert_eq!(held(&store, a), vec![2, 3, 1]);
    }

    #[test]
    fn test_positional_drop() {
        let (mut store, a, _) = setup();
        let mut session = DragSession::default();
        let last = store.snapshot().collection(a).unwrap().insights[2].clone();

        let data = session.start(&last, 2).unwrap();
        session.drop_on(&mut store, a, &data, Some(0)).unwrap();
        assert_eq!(held(&store, a), vec![3, 1, 2]);
    }

    #[test]
    fn test_unassigned_insight_drop() {
        let (mut store, _, b) = setup();
        let mut session = DragSession::default();
        let fresh = Insight::new(InsightId::new(50), "new", "The Hero's Journey");

        let data = session.start(&fresh, 0).unwrap();
        let outcome = session.drop_on(&mut store, b, &data, None).unwrap();

        assert_eq!(outcome.kind, DropKind::Assigned);
        assert_eq!(held(&store, b), vec![50]);
    }

    #[test]
    fn test_hover_arming() {
        let (_, a, b) = setup();
        let mut session = DragSession::default();

        // Nothing to arm while idle.
        assert!(!session.drag_over(a));

        let insight = Insight::new(InsightId::new(8), "x", "t");
        session.start(&insight, 0).unwrap();
        assert!(session.drag_over(a));
        assert!(session.is_hover_armed(a));

        // Leaving a different collection keeps the arm.
        session.drag_leave(b);
        assert!(session.is_hover_armed(a));

        session.drag_leave(a);
        assert_eq!(session.hover_target(), None);
    }

    #[test]
    fn test_cancel_leaves_store_untouched() {
        let (store, a, _) = setup();
        let version = store.version();
        let mut session = DragSession::default();
        let insight = store.snapshot().collection(a).unwrap().insights[0].clone();

        session.start(&insight, 0).unwrap();
        let cancelled = session.cancel().unwrap();

        assert_eq!(cancelled.insight.id, insight.id);
        assert!(!session.is_dragging());
        assert_eq!(store.version(), version);
        assert!(session.cancel().is_none());
    }

    #[test]
    fn test_malformed_payload_returns_to_idle() {
        let (mut store, a, _) = setup();
        let mut session = DragSession::default();
        let insight = Insight::new(InsightId::new(8), "x", "t");
        session.start(&insight, 0).unwrap();

        let result = session.drop_on(&mut store, a, "{broken", None);
        assert!(matches!(result, Err(CollectionError::InvalidPayload(_))));
        assert!(!session.is_dragging());
        assert_eq!(held(&store, a), vec![1, 2, 3]);
    }

    #[test]
    fn test_store_failure_returns_to_idle() {
        let (mut store, a, _) = setup();
        let mut session = DragSession::default();
        let insight = store.snapshot().collection(a).unwrap().insights[0].clone();

        let data = session.start(&insight, 0).unwrap();
        let result = session.drop_on(&mut store, CollectionId::new(99), &data, None);

        assert!(matches!(result, Err(CollectionError::NotFound { id: 99, .. })));
        assert!(!session.is_dragging());
        assert_eq!(held(&store, a), vec![1, 2, 3]);
    }

    #[test]
    fn test_payload_is_not_refreshed_from_live_state() {
        let (mut store, a, b) = setup();
        let mut session = DragSession::default();
        let insight = store.snapshot().collection(a).unwrap().insights[0].clone();
        let data = session.start(&insight, 0).unwrap();

        // The source moves under the drag.
        store.add_insight_to_collection(b, insight.clone()).unwrap();

        let outcome = session.drop_on(&mut store, a, &data, None).unwrap();
        // Classified from the captured origin, applied to live membership.
        assert_eq!(outcome.kind, DropKind::Repositioned);
        assert_eq!(held(&store, a), vec![2, 3, 1]);
        assert!(held(&store, b).is_empty());
    }

    #[test]
    fn test_new_start_replaces_drag() {
        let mut session = DragSession::default();
        let first = Insight::new(InsightId::new(1), "a", "t");
        let second = Insight::new(InsightId::new(2), "b", "t");

        session.start(&first, 0).unwrap();
        session.start(&second, 3).unwrap();

        let payload = session.payload().unwrap();
        assert_eq!(payload.insight.id, InsightId::new(2));
        assert_eq!(payload.source_index, 3);
    }
}
