// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Import of AI-suggested fields. Suggestions carry a kind and a label only;
// placement is a fixed scatter the user is expected to adjust.

use quill_bridge::{FieldSuggester, FieldSuggestion};
use quill_core::{Field, FieldId, PagePoint};
use tracing::{info, instrument, warn};

use crate::canvas::{Canvas, SharedCanvas, lock};

/// Where the `index`-th suggested field is dropped: three columns, one row
/// step per suggestion. Clamped on insert.
pub fn scatter_position(index: usize) -> PagePoint {
    PagePoint::new(15.0 + (index % 3) as f64 * 25.0, 30.0 + index as f64 * 12.0)
}

/// Add one field per suggestion with the kind's default extent. The
/// selection is left alone.
pub fn import_suggestions(canvas: &mut Canvas, suggestions: &[FieldSuggestion]) -> Vec<FieldId> {
    let ids: Vec<FieldId> = suggestions
        .iter()
        .enumerate()
        .map(|(index, suggestion)| {
            let mut field = Field::new(suggestion.kind);
            field.label = suggestion.label.clone();
            field.position = scatter_position(index);
            canvas.insert_field(field)
        })
        .collect();
    info!(imported = ids.len(), "Suggested fields imported");
    ids
}

/// Ask `suggester` for fields and import them. Any failure adds nothing.
#[instrument(skip_all, fields(description_len = description.len()))]
pub async fn suggest_and_import<S: FieldSuggester>(
    canvas: &SharedCanvas,
    suggester: &S,
    description: &str,
) -> Vec<FieldId> {
    let suggestions = match suggester.suggest(description).await {
        Ok(suggestions) => suggestions,
        Err(err) => {
            warn!(error = %err, "Field suggestion failed");
            return Vec::new();
        }
    };
    import_suggestions(&mut lock(canvas), &suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_bridge::stub::{CannedSuggester, StubSuggester};
    use quill_core::{EditorConfig, FieldKind, PageExtent};

    fn shared() -> SharedCanvas {
        Canvas::new(EditorConfig::default(), "lease.pdf", None).into_shared()
    }

    #[test]
    fn scatter_wraps_every_three() {
        assert_eq!(scatter_position(0), PagePoint::new(15.0, 30.0));
        assert_eq!(scatter_position(2), PagePoint::new(65.0, 54.0));
        assert_eq!(scatter_position(3), PagePoint::new(15.0, 66.0));
    }

    #[tokio::test]
    async fn one_suggestion_becomes_one_field() {
        let canvas = shared();
        let suggester =
            CannedSuggester::new(r#"[{"type":"signature","label":"Tenant","confidence":0.9}]"#);
        let ids = suggest_and_import(&canvas, &suggester, "residential lease").await;
        assert_eq!(ids.len(), 1);

        let canvas = lock(&canvas);
        let field = canvas.registry().get(ids[0]).unwrap();
        assert_eq!(field.kind, FieldKind::Signature);
        assert_eq!(field.label, "Tenant");
        assert_eq!(field.position, PagePoint::new(15.0, 30.0));
        assert_eq!(field.extent, PageExtent::new(28.0, 10.0));
        assert_eq!(canvas.registry().selected(), None);
    }

    #[tokio::test]
    async fn late_rows_are_clamped_inside_the_page() {
        let canvas = shared();
        let item = r#"{"type":"text","label":"Note","confidence":0.5}"#;
        let suggester = CannedSuggester::new(format!("[{}]", vec![item; 9].join(",")));
        let ids = suggest_and_import(&canvas, &suggester, "form").await;
        assert_eq!(ids.len(), 9);

        let canvas = lock(&canvas);
        let last = canvas.registry().get(ids[8]).unwrap();
        assert_eq!(last.position, PagePoint::new(65.0, 95.0));
    }

    #[tokio::test]
    async fn failing_service_adds_nothing() {
        let canvas = shared();
        assert!(suggest_and_import(&canvas, &StubSuggester, "nda").await.is_empty());
        assert!(lock(&canvas).registry().is_empty());
    }

    #[tokio::test]
    async fn malformed_response_adds_nothing() {
        let canvas = shared();
        let ids = suggest_and_import(&canvas, &CannedSuggester::new("not json"), "nda").await;
        assert!(ids.is_empty());
    }
}
