// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed signature: a name rendered in a handwriting font, centred on a
// fixed canvas and shrunk until it fits between the margins.

use image::RgbaImage;
use quill_core::{EditorConfig, InkColor};
use tracing::debug;

use super::SignatureSurface;
use crate::text::{TextPainter, fit_font_size, paint_centred};

/// Renders a typed name through a [`TextPainter`].
pub struct TypedSignature<P> {
    painter: P,
    name: String,
    ink: InkColor,
    base_font_px: f32,
    margin_px: f32,
    font_px: f32,
    canvas: RgbaImage,
}

impl<P: TextPainter> TypedSignature<P> {
    pub fn new(painter: P, config: &EditorConfig) -> Self {
        Self {
            painter,
            name: String::new(),
            ink: InkColor::Black,
            base_font_px: config.typed_base_font_px,
            margin_px: config.typed_margin_px,
            font_px: config.typed_base_font_px,
            canvas: RgbaImage::new(
                config.typed_canvas_width.max(1),
                config.typed_canvas_height.max(1),
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.render();
    }

    pub fn set_ink(&mut self, ink: InkColor) {
        self.ink = ink;
        self.render();
    }

    /// Font size used for the last render.
    pub fn font_size(&self) -> f32 {
        self.font_px
    }

    /// Swap the handwriting style, keeping name and ink.
    pub fn set_painter(&mut self, painter: P) {
        self.painter = painter;
        self.render();
    }

    fn render(&mut self) {
        self.canvas = RgbaImage::new(self.canvas.width(), self.canvas.height());
        self.font_px = self.base_font_px;
        if !self.has_content() {
            return;
        }

        let width = self.canvas.width() as f32;
        let height = self.canvas.height() as f32;
        self.font_px = fit_font_size(
            &self.painter,
            &self.name,
            self.base_font_px,
            width - self.margin_px,
        );
        paint_centred(
            &self.painter,
            &mut self.canvas,
            &self.name,
            self.font_px,
            (0.0, 0.0, width, height),
            self.ink.typed_rgb(),
        );
        debug!(font_px = self.font_px, name_len = self.name.len(), "Typed signature rendered");
    }
}

impl<P: TextPainter> SignatureSurface for TypedSignature<P> {
    fn has_content(&self) -> bool {
        !self.name.trim().is_empty()
    }

    fn clear(&mut self) {
        self.name.clear();
        self.render();
    }

    fn raster(&self) -> &RgbaImage {
        &self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::testing::BlockPainter;
    use quill_core::QuillError;

    fn ink_columns(canvas: &RgbaImage) -> (u32, u32) {
        let xs: Vec<u32> = (0..canvas.width())
            .filter(|&x| (0..canvas.height()).any(|y| canvas.get_pixel(x, y)[3] > 0))
            .collect();
        (xs[0], xs[xs.len() - 1])
    }

    #[test]
    fn short_name_uses_base_size() {
        let mut typed = TypedSignature::new(BlockPainter, &EditorConfig::default());
        typed.set_name("Jo Li");
        assert_eq!(typed.font_size(), 120.0);
    }

    #[test]
    fn long_name_shrinks_and_stays_centred() {
        let mut typed = TypedSignature::new(BlockPainter, &EditorConfig::default());
        // 24 chars * 60 px = 1440 px, far wider than 760.
        typed.set_name("Alexandria Montgomery-Ng");
        let size = typed.font_size();
        assert!(size < 120.0);
        assert!(BlockPainter.measure(typed.name(), size).width <= 760.0 + 1e-3);

        let (first, last) = ink_columns(typed.raster());
        let left_gap = first as i64;
        let right_gap = 799 - last as i64;
        assert!((left_gap - right_gap).abs() <= 1, "gaps {left_gap} / {right_gap}");
    }

    #[test]
    fn ink_colour_is_applied() {
        let mut typed = TypedSignature::new(BlockPainter, &EditorConfig::default());
        typed.set_name("Ann");
        typed.set_ink(InkColor::Blue);
        let p = typed.raster().get_pixel(400, 200);
        assert_eq!([p[0], p[1], p[2], p[3]], [0x25, 0x63, 0xeb, 255]);
    }

    #[test]
    fn blank_name_has_no_content() {
        let mut typed = TypedSignature::new(BlockPainter, &EditorConfig::default());
        typed.set_name("   ");
        assert!(!typed.has_content());
        assert!(matches!(typed.export_png(), Err(QuillError::EmptyCapture)));

        typed.set_name("Ann");
        typed.clear();
        assert!(typed.raster().pixels().all(|p| p[3] == 0));
    }
}
