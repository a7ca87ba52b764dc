// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire format of the field-suggestion service.

use quill_core::FieldKind;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::traits::FieldSuggestion;

#[derive(Debug, Deserialize)]
struct WireSuggestion {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    confidence: f64,
}

/// Parse a suggestion response of the form
/// `[{ "type": "signature", "label": "Sign Here", "confidence": 0.9 }]`.
///
/// Malformed JSON yields an empty list. Items whose type is not a known
/// field kind are skipped; an empty label falls back to the kind's default.
pub fn parse_suggestions(json: &str) -> Vec<FieldSuggestion> {
    let body = json.trim();
    if body.is_empty() {
        return Vec::new();
    }

    let wire: Vec<WireSuggestion> = match serde_json::from_str(body) {
        Ok(items) => items,
        Err(err) => {
            warn!(%err, "Discarding malformed suggestion response");
            return Vec::new();
        }
    };

    let total = wire.len();
    let parsed: Vec<FieldSuggestion> = wire
        .into_iter()
        .filter_map(|item| {
            let Some(kind) = FieldKind::from_wire(&item.kind) else {
                debug!(kind = %item.kind, "Skipping suggestion with unknown field type");
                return None;
            };
            let label = match item.label.trim() {
                "" => kind.default_label().to_string(),
                trimmed => trimmed.to_string(),
            };
            Some(FieldSuggestion {
                kind,
                label,
                confidence: item.confidence.clamp(0.0, 1.0),
            })
        })
        .collect();

    debug!(total, accepted = parsed.len(), "Parsed field suggestions");
    parsed
}
