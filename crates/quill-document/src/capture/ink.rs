// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Freehand ink surface.
//
// Pointer positions arrive in logical pixels; the backing raster is
// `logical * pixel_ratio`. Strokes are rasterized immediately, so a stroke's
// colour is fixed when it is drawn.

use image::RgbaImage;
use quill_core::{EditorConfig, InkColor};
use tracing::{debug, info};

use super::SignatureSurface;
use crate::raster::draw_capsule;

#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    rgb: [u8; 3],
    /// Last point, in backing pixels.
    last: (f32, f32),
}

/// Immediate-mode freehand drawing surface.
pub struct InkSurface {
    logical_width: u32,
    logical_height: u32,
    pixel_ratio: f32,
    /// Stroke width in logical pixels.
    line_width: f32,
    ink: InkColor,
    buffer: RgbaImage,
    stroke: Option<ActiveStroke>,
    has_content: bool,
}

impl InkSurface {
    pub fn new(logical_width: u32, logical_height: u32, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio >= 1.0 {
            pixel_ratio
        } else {
            1.0
        };
        let (w, h) = backing_size(logical_width, logical_height, pixel_ratio);
        Self {
            logical_width,
            logical_height,
            pixel_ratio,
            line_width: 3.0,
            ink: InkColor::Black,
            buffer: RgbaImage::new(w, h),
            stroke: None,
            has_content: false,
        }
    }

    /// Surface using the configured pixel ratio and line width.
    pub fn from_config(logical_width: u32, logical_height: u32, config: &EditorConfig) -> Self {
        let mut surface = Self::new(logical_width, logical_height, config.capture_pixel_ratio);
        surface.line_width = config.ink_line_width.max(0.5);
        surface
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn ink(&self) -> InkColor {
        self.ink
    }

    /// Change the ink for strokes started after this call.
    pub fn set_ink(&mut self, ink: InkColor) {
        self.ink = ink;
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    fn to_backing(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (x * self.pixel_ratio, y * self.pixel_ratio)
    }

    /// Start a stroke at a logical point, leaving a round dot there.
    pub fn begin_stroke(&mut self, at: (f32, f32)) {
        let rgb = self.ink.rgb();
        let point = self.to_backing(at);
        draw_capsule(&mut self.buffer, point, point, self.line_width * self.pixel_ratio, rgb);
        self.stroke = Some(ActiveStroke { rgb, last: point });
        self.has_content = true;
    }

    /// Append a segment to the active stroke. Ignored when no stroke is active.
    pub fn extend_stroke(&mut self, to: (f32, f32)) {
        let Some(mut stroke) = self.stroke else {
            return;
        };
        let point = self.to_backing(to);
        draw_capsule(
            &mut self.buffer,
            stroke.last,
            point,
            self.line_width * self.pixel_ratio,
            stroke.rgb,
        );
        stroke.last = point;
        self.stroke = Some(stroke);
    }

    pub fn end_stroke(&mut self) {
        self.stroke = None;
    }

    /// Change the logical size, keeping existing ink.
    ///
    /// The old raster is copied verbatim at the origin and cropped if the
    /// surface shrank.
    pub fn resize(&mut self, logical_width: u32, logical_height: u32) {
        let (w, h) = backing_size(logical_width, logical_height, self.pixel_ratio);
        let mut next = RgbaImage::new(w, h);
        image::imageops::replace(&mut next, &self.buffer, 0, 0);
        debug!(
            from_w = self.buffer.width(),
            from_h = self.buffer.height(),
            to_w = w,
            to_h = h,
            "Ink surface resized"
        );
        self.buffer = next;
        self.logical_width = logical_width;
        self.logical_height = logical_height;
    }
}

impl SignatureSurface for InkSurface {
    fn has_content(&self) -> bool {
        self.has_content
    }

    fn clear(&mut self) {
        self.buffer = RgbaImage::new(self.buffer.width(), self.buffer.height());
        self.stroke = None;
        self.has_content = false;
        info!("Ink surface cleared");
    }

    fn raster(&self) -> &RgbaImage {
        &self.buffer
    }
}

fn backing_size(logical_width: u32, logical_height: u32, pixel_ratio: f32) -> (u32, u32) {
    let scale = |v: u32| ((v as f32 * pixel_ratio).round() as u32).max(1);
    (scale(logical_width), scale(logical_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use quill_core::QuillError;

    fn horizontal_stroke(surface: &mut InkSurface, y: f32) {
        surface.begin_stroke((10.0, y));
        surface.extend_stroke((50.0, y));
        surface.extend_stroke((90.0, y));
        surface.end_stroke();
    }

    #[test]
    fn backing_buffer_scales_with_pixel_ratio() {
        let surface = InkSurface::new(300, 150, 2.0);
        assert_eq!(surface.raster().dimensions(), (600, 300));
    }

    #[test]
    fn pointer_coordinates_are_scaled() {
        let mut surface = InkSurface::new(100, 100, 2.0);
        horizontal_stroke(&mut surface, 20.0);
        // Logical (50, 20) lands at backing (100, 40).
        assert_eq!(surface.raster().get_pixel(100, 40)[3], 255);
        assert_eq!(surface.raster().get_pixel(100, 80)[3], 0);
    }

    #[test]
    fn colour_change_only_affects_later_strokes() {
        let mut surface = InkSurface::new(100, 100, 2.0);
        horizontal_stroke(&mut surface, 20.0);
        surface.set_ink(InkColor::Red);
        horizontal_stroke(&mut surface, 70.0);

        let png = surface.export_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(*decoded.get_pixel(100, 40), Rgba([0, 0, 0, 255]));
        assert_eq!(*decoded.get_pixel(100, 140), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn resize_preserves_existing_ink() {
        let mut surface = InkSurface::new(100, 100, 2.0);
        horizontal_stroke(&mut surface, 20.0);
        surface.set_ink(InkColor::Blue);
        surface.resize(200, 120);

        assert_eq!(surface.raster().dimensions(), (400, 240));
        assert_eq!(*surface.raster().get_pixel(100, 40), Rgba([0, 0, 0, 255]));
        assert!(surface.has_content());
    }

    #[test]
    fn empty_surface_refuses_export() {
        let mut surface = InkSurface::new(100, 100, 2.0);
        assert!(matches!(surface.export_png(), Err(QuillError::EmptyCapture)));

        horizontal_stroke(&mut surface, 20.0);
        surface.clear();
        assert!(!surface.has_content());
        assert!(surface.raster().pixels().all(|p| p[3] == 0));
        assert!(surface.export_data_url().is_err());
    }

    #[test]
    fn move_without_stroke_is_ignored() {
        let mut surface = InkSurface::new(50, 50, 1.0);
        surface.extend_stroke((10.0, 10.0));
        assert!(!surface.has_content());
        assert!(surface.raster().pixels().all(|p| p[3] == 0));
    }
}
