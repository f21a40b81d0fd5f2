//! Drag payload wire format.

use crate::error::{CollectionError, CollectionResult};
use crate::model::{CollectionId, Insight};
use serde::{Deserialize, Serialize};

/// Format tag under which the encoded payload travels through the platform's
/// drag channel.
pub const PAYLOAD_FORMAT: &str = "text/plain";

/// Everything a drop target needs to know about a dragged insight.
///
/// Captured once at drag start and never refreshed from live state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub insight: Insight,
    /// Index of the insight in its source sequence when the drag started.
    pub source_index: usize,
    /// Collection the insight was dragged out of, `None` for an unassigned one.
    #[serde(rename = "collectionId", default, skip_serializing_if = "Option::is_none")]
    pub source_collection_id: Option<CollectionId>,
}

impl DragPayload {
    /// Capture a payload for an insight shown at `source_index`.
    pub fn capture(insight: &Insight, source_index: usize) -> Self {
        Self {
            insight: insight.clone(),
            source_index,
            source_collection_id: insight.collection_id,
        }
    }

    /// Serialize to the string carried by the drag channel.
    pub fn encode(&self) -> CollectionResult<String> {
        serde_json::to_string(self).map_err(|e| CollectionError::InvalidPayload(e.to_string()))
    }

    /// Parse a string received at drop time.
    pub fn decode(data: &str) -> CollectionResult<Self> {
        serde_json::from_str(data).map_err(|e| CollectionError::InvalidPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InsightId;

    #[test]
    fn test_capture_records_origin() {
        let mut insight = Insight::new(InsightId::new(3), "the revelation", "The Oracle's Vision");
        insight.collection_id = Some(CollectionId::new(2));

        let payload = DragPayload::capture(&insight, 4);
        assert_eq!(payload.source_index, 4);
        assert_eq!(payload.source_collection_id, Some(CollectionId::new(2)));
    }

    #[test]
    fn test_encoded_shape() {
        let mut insight = Insight::new(InsightId::new(3), "c", "t");
        insight.collection_id = Some(CollectionId::new(2));
        let encoded = DragPayload::capture(&insight, 1).encode().unwrap();

        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["insight"]["id"], 3);
        assert_eq!(value["sourceIndex"], 1);
        assert_eq!(value["collectionId"], 2);
    }

    #[test]
    fn test_decode_payload_from_another_widget() {
        let data = r#"{
            "insight": {"id": 9, "content": "void", "theme": "The Creation Myth",
                        "timestamp": "2024-05-01T12:00:00Z"},
            "sourceIndex": 0
        }"#;

        let payload = DragPayload::decode(data).unwrap();
        assert_eq!(payload.insight.id, InsightId::new(9));
        assert_eq!(payload.source_collection_id, None);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for data in ["", "not json", r#"{"sourceIndex": 0}"#, r#"{"insight": 5}"#] {
            assert!(matches!(
                DragPayload::decode(data),
                Err(CollectionError::InvalidPayload(_))
            ));
        }
    }
}
