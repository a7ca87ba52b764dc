// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub collaborators for headless and CI builds where no PDF engine or
// suggestion service is wired in.

use image::RgbaImage;
use quill_core::error::{QuillError, Result};

use crate::suggestion::parse_suggestions;
use crate::traits::*;

/// PDF backend that is never available.
pub struct StubPdfRasterizer;

impl PdfRasterizer for StubPdfRasterizer {
    fn rasterize_page(&self, _pdf: &[u8], _scale: f32) -> Result<RgbaImage> {
        tracing::warn!("PdfRasterizer::rasterize_page called on stub backend");
        Err(QuillError::RendererUnavailable)
    }
}

/// Suggestion service that is never available.
pub struct StubSuggester;

impl FieldSuggester for StubSuggester {
    async fn suggest(&self, _description: &str) -> Result<Vec<FieldSuggestion>> {
        tracing::warn!("FieldSuggester::suggest called on stub service");
        Err(QuillError::Suggestion("no suggestion service configured".into()))
    }
}

/// Replays a fixed JSON response through the wire parser.
///
/// Used by the CLI (`--suggestions <json>`) and by tests.
pub struct CannedSuggester {
    response: String,
}

impl CannedSuggester {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl FieldSuggester for CannedSuggester {
    async fn suggest(&self, description: &str) -> Result<Vec<FieldSuggestion>> {
        tracing::debug!(description_len = description.len(), "Replaying canned suggestions");
        Ok(parse_suggestions(&self.response))
    }
}

/// Barrier that resolves immediately. For hosts that render synchronously.
pub struct ImmediateSettle;

impl SettleBarrier for ImmediateSettle {
    async fn settle(&self, _epoch: u64) -> Result<()> {
        Ok(())
    }
}
