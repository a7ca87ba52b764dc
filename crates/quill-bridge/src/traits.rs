// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator trait definitions.
//
// The canvas engine never renders documents, talks to the suggestion model,
// or writes output files itself. Each of those capabilities is a trait here
// so hosts and tests can plug in their own implementation.

use std::future::Future;

use image::RgbaImage;
use quill_core::error::Result;
use quill_core::{Field, FieldId, FieldKind, Orientation, PageImage, PageSize, UploadedFile};
use serde::{Deserialize, Serialize};

/// Turns an uploaded file into a displayable raster of its first page.
pub trait PageRenderer {
    /// Render page one. Multi-page input is reduced to its first page.
    fn render_first_page(&self, file: &UploadedFile) -> Result<PageImage>;
}

/// Rasterizes a single-page PDF. Backed by a native PDF engine on the host.
pub trait PdfRasterizer {
    /// Render the only page of `pdf` at `scale` times its natural size.
    fn rasterize_page(&self, pdf: &[u8], scale: f32) -> Result<RgbaImage>;
}

/// One field proposed by the suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSuggestion {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    /// Model confidence in `[0, 1]`. Not used for placement.
    pub confidence: f64,
}

/// Proposes fields from a free-text description of a document.
pub trait FieldSuggester: Send + Sync {
    fn suggest(
        &self,
        description: &str,
    ) -> impl Future<Output = Result<Vec<FieldSuggestion>>> + Send;
}

/// Resolves once the host has committed the view state for `epoch`.
///
/// The export pipeline awaits this after resetting the view so the capture
/// never sees a transient frame.
pub trait SettleBarrier: Send + Sync {
    fn settle(&self, epoch: u64) -> impl Future<Output = Result<()>> + Send;
}

/// Everything the rasterizer needs to draw one page.
#[derive(Debug, Clone)]
pub struct PageScene {
    /// Background page raster. `None` draws a blank white page.
    pub page: Option<PageImage>,
    /// Natural paper size in CSS pixels.
    pub size: PageSize,
    /// Fields in paint order (insertion order).
    pub fields: Vec<Field>,
    /// Field drawn with selection chrome, if any.
    pub selected: Option<FieldId>,
    /// Caption shown faintly on a blank page (usually the document name).
    pub caption: Option<String>,
}

/// Draws a page scene into an opaque raster.
pub trait PageRasterizer {
    /// Render at `multiplier` times the natural size.
    fn rasterize(&self, scene: &PageScene, multiplier: u32) -> Result<RgbaImage>;
}

/// The downloadable result of a flatten/export.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Natural page width in CSS pixels (not the supersampled raster width).
    pub width_px: u32,
    pub height_px: u32,
    pub orientation: Orientation,
}

/// Wraps a flattened raster in a single-page output document.
pub trait DocumentPackager {
    fn package(&self, raster: &RgbaImage, natural: PageSize, file_name: &str)
    -> Result<ExportArtifact>;
}
