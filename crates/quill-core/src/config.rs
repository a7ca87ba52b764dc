// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{QuillError, Result};
use crate::geometry::PlacementLimits;

/// Default ceiling on the pixels of one export raster. A letter page at the
/// largest supersample (8x) stays under it.
pub const DEFAULT_MAX_PAGE_PIXELS: u64 = 64_000_000;

/// Tunable settings for the canvas, capture surfaces, and export pipeline.
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest allowed zoom factor.
    pub zoom_min: f64,
    /// Largest allowed zoom factor.
    pub zoom_max: f64,
    /// Increment applied by zoom-in / zoom-out.
    pub zoom_step: f64,
    /// Minimum field width, in page percent.
    pub min_field_width: f64,
    /// Minimum field height, in page percent.
    pub min_field_height: f64,
    /// Supersampling multiplier for export rasterization.
    pub export_supersample: u32,
    /// Largest export raster, in pixels, the pipeline will allocate.
    pub max_page_pixels: u64,
    /// Fixed settle delay used by the default settle barrier.
    pub settle_delay_ms: u64,
    /// Upper bound on how long a frame-synchronised barrier waits.
    pub settle_timeout_ms: u64,
    /// Backing-store scale of the freehand capture surface.
    pub capture_pixel_ratio: f32,
    /// Freehand stroke width in logical pixels.
    pub ink_line_width: f32,
    /// Typed signature canvas width in pixels.
    pub typed_canvas_width: u32,
    /// Typed signature canvas height in pixels.
    pub typed_canvas_height: u32,
    /// Starting font size for typed signatures.
    pub typed_base_font_px: f32,
    /// Horizontal margin kept free when shrinking typed text.
    pub typed_margin_px: f32,
    /// Natural width of the on-screen paper element.
    pub paper_width_px: u32,
    /// Natural height of a page that has no preview image.
    pub blank_page_height_px: u32,
    /// Upscaling factor used when rasterizing PDF pages for preview.
    pub pdf_render_scale: f32,
    /// Open the signature capture surface when an unfilled signature is selected.
    pub auto_open_capture: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.5,
            zoom_max: 3.0,
            zoom_step: 0.1,
            min_field_width: 5.0,
            min_field_height: 2.0,
            export_supersample: 4,
            max_page_pixels: DEFAULT_MAX_PAGE_PIXELS,
            settle_delay_ms: 400,
            settle_timeout_ms: 5_000,
            capture_pixel_ratio: 2.0,
            ink_line_width: 3.0,
            typed_canvas_width: 800,
            typed_canvas_height: 400,
            typed_base_font_px: 120.0,
            typed_margin_px: 40.0,
            paper_width_px: 816,
            blank_page_height_px: 1056,
            pdf_render_scale: 2.0,
            auto_open_capture: true,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON configuration document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would break the canvas invariants.
    pub fn validate(&self) -> Result<()> {
        if !(self.zoom_min > 0.0 && self.zoom_min <= 1.0 && self.zoom_max >= 1.0) {
            return Err(QuillError::ConfigInvalid(format!(
                "zoom range [{}, {}] must be positive and contain 1.0",
                self.zoom_min, self.zoom_max
            )));
        }
        if !(self.zoom_step > 0.0) {
            return Err(QuillError::ConfigInvalid("zoom_step must be positive".into()));
        }
        for (name, floor) in [
            ("min_field_width", self.min_field_width),
            ("min_field_height", self.min_field_height),
        ] {
            if !(floor > 0.0 && floor <= 100.0) {
                return Err(QuillError::ConfigInvalid(format!(
                    "{name} must be in (0, 100], got {floor}"
                )));
            }
        }
        if self.export_supersample == 0 || self.export_supersample > 8 {
            return Err(QuillError::ConfigInvalid(format!(
                "export_supersample must be in 1..=8, got {}",
                self.export_supersample
            )));
        }
        if self.max_page_pixels == 0 {
            return Err(QuillError::ConfigInvalid("max_page_pixels must be non-zero".into()));
        }
        if !(self.capture_pixel_ratio >= 1.0) {
            return Err(QuillError::ConfigInvalid(
                "capture_pixel_ratio must be at least 1.0".into(),
            ));
        }
        if self.typed_canvas_width as f32 <= self.typed_margin_px
            || self.typed_canvas_height == 0
        {
            return Err(QuillError::ConfigInvalid(
                "typed canvas must be wider than its margin".into(),
            ));
        }
        if self.paper_width_px == 0 || self.blank_page_height_px == 0 {
            return Err(QuillError::ConfigInvalid("paper size must be non-zero".into()));
        }
        Ok(())
    }

    /// Minimum-size floors applied by the placement clamp.
    pub fn placement_limits(&self) -> PlacementLimits {
        PlacementLimits {
            min_width: self.min_field_width,
            min_height: self.min_field_height,
        }
    }
}
