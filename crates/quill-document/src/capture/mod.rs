// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signature capture surfaces: freehand ink and typed rendering.
//
// Both produce a PNG that the canvas stores as a field value.

pub mod ink;
pub mod typed;

pub use ink::InkSurface;
pub use typed::TypedSignature;

use image::RgbaImage;
use quill_core::error::{QuillError, Result};

use crate::image::{encode_png, png_data_url};

/// Common surface of the two capture modes.
pub trait SignatureSurface {
    /// Whether there is anything worth saving.
    fn has_content(&self) -> bool;

    fn clear(&mut self);

    /// The backing raster, transparent where nothing was drawn.
    fn raster(&self) -> &RgbaImage;

    /// Encode the surface as PNG. Fails with `EmptyCapture` when
    /// [`has_content`](Self::has_content) is false.
    fn export_png(&self) -> Result<Vec<u8>> {
        if !self.has_content() {
            return Err(QuillError::EmptyCapture);
        }
        encode_png(self.raster())
    }

    /// Encode the surface as a `data:image/png;base64,...` URL.
    fn export_data_url(&self) -> Result<String> {
        Ok(png_data_url(&self.export_png()?))
    }
}
