// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// quill-document: Raster and PDF work for the Quill signature canvas.
//
// Provides signature capture surfaces (freehand ink, typed names), the page
// compositor used by export, the first-page renderer used by upload, image
// processing (decode, fit, ink tint), and PDF reading and writing.

pub mod capture;
pub mod compositor;
pub mod image;
pub mod pdf;
pub mod renderer;
pub mod text;

mod raster;

// Re-export the primary structs so callers can use `quill_document::PdfWriter` etc.
pub use capture::{InkSurface, SignatureSurface, TypedSignature};
pub use compositor::Compositor;
pub use crate::image::processor::ImageProcessor;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use renderer::{RasterPageRenderer, classify_upload};
pub use text::{GlyphFont, TextMetrics, TextPainter};
