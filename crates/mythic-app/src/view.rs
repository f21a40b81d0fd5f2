//! Plain-text rendering of snapshots and themes.

use mythic_core::{CollectionId, Insight, Snapshot, ThemeCatalog};
use std::fmt::Write;

const PREVIEW_CHARS: usize = 60;

fn preview(insight: &Insight) -> String {
    let mut text: String = insight.content.chars().take(PREVIEW_CHARS).collect();
    if insight.content.chars().count() > PREVIEW_CHARS {
        text.push('…');
    }
    text
}

fn insight_line(out: &mut String, index: usize, insight: &Insight) {
    let star = if insight.is_featured { "*" } else { " " };
    let _ = write!(out, "    {index:>2}.{star}[{}] {}", insight.id, preview(insight));
    if !insight.tags.is_empty() {
        let _ = write!(out, "  #{}", insight.tags.join(" #"));
    }
    out.push('\n');
}

/// Render all collections. The collection in `armed` is marked as the
/// current drop target.
pub fn render_snapshot(snapshot: &Snapshot, armed: Option<CollectionId>) -> String {
    let mut out = String::new();

    if snapshot.is_empty() {
        out.push_str("  (no collections)\n");
    }
    for collection in snapshot.collections() {
        let marker = if armed == Some(collection.id) { ">>" } else { "  " };
        let _ = write!(out, "{marker}[{}] {}", collection.id, collection.title);
        if let Some(description) = &collection.description {
            let _ = write!(out, " - {description}");
        }
        out.push('\n');
        for (index, insight) in collection.insights.iter().enumerate() {
            insight_line(&mut out, index, insight);
        }
    }

    if !snapshot.unassigned().is_empty() {
        out.push_str("  Unassigned\n");
        for (index, insight) in snapshot.unassigned().iter().enumerate() {
            insight_line(&mut out, index, insight);
        }
    }
    out
}

/// Render the theme list, marking the selected theme.
pub fn render_themes(catalog: &ThemeCatalog, selected: Option<u32>) -> String {
    let mut out = String::new();
    for theme in catalog.themes() {
        let marker = if selected == Some(theme.id) { ">>" } else { "  " };
        let _ = writeln!(out, "{marker}{}. {}", theme.id, theme.title);
        let _ = writeln!(out, "      {}", theme.description);
    }
    out
}

/// Render captured insights waiting to be dragged into a collection.
pub fn render_tray(tray: &[Insight]) -> String {
    let mut out = String::new();
    if tray.is_empty() {
        return out;
    }
    out.push_str("  Tray\n");
    for (index, insight) in tray.iter().enumerate() {
        insight_line(&mut out, index, insight);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mythic_core::{CollectionStore, InsightId};

    #[test]
    fn test_render_marks_armed_collection() {
        let mut store = CollectionStore::new();
        let (a, _) = store.create_collection("Creation", None).unwrap();
        let (b, _) = store
            .create_collection("Journey", Some("trials".to_string()))
            .unwrap();
        let insight = Insight::new(InsightId::new(7), "the void", "The Creation Myth")
            .with_tags(["origin"]);
        let snapshot = store.add_insight_to_collection(a, insight).unwrap();

        let text = render_snapshot(&snapshot, Some(b));
        assert!(text.contains("  [1] Creation"));
        assert!(text.contains(">>[2] Journey - trials"));
        assert!(text.contains("[7] the void  #origin"));
    }

    #[test]
    fn test_render_empty_and_unassigned() {
        let text = render_snapshot(&Snapshot::new(), None);
        assert!(text.contains("(no collections)"));

        let mut store = CollectionStore::new();
        let (a, _) = store.create_collection("Only", None).unwrap();
        store
            .add_insight_to_collection(a, Insight::new(InsightId::new(1), "x", "t"))
            .unwrap();
        let snapshot = store.delete_collection(a).unwrap();
        let text = render_snapshot(&snapshot, None);
        assert!(text.contains("Unassigned"));
        assert!(text.contains("[1] x"));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "a".repeat(PREVIEW_CHARS + 10);
        let insight = Insight::new(InsightId::new(1), long, "t");
        assert_eq!(preview(&insight).chars().count(), PREVIEW_CHARS + 1);
    }
}
