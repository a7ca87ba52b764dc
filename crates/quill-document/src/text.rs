// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text measurement and painting.
//
// Typed signatures and the compositor's labels both go through `TextPainter`,
// so neither depends on a particular font backend. `GlyphFont` is the
// production painter, built on `ab_glyph` outlines.

use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont, point};
use image::RgbaImage;
use quill_core::error::{QuillError, Result};
use tracing::{debug, instrument};

use crate::raster::blend_over;

/// Horizontal extent and vertical metrics of a single line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the whole line.
    pub width: f32,
    /// Distance from the baseline up to the top of the line box.
    pub ascent: f32,
    /// Distance from the baseline down to the bottom of the line box (positive).
    pub descent: f32,
}

impl TextMetrics {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Measures and paints single-line text at a pixel size.
pub trait TextPainter {
    fn measure(&self, text: &str, size_px: f32) -> TextMetrics;

    /// Paint `text` with its left edge at `x` and its baseline at `baseline`.
    fn paint(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size_px: f32,
        x: f32,
        baseline: f32,
        rgb: [u8; 3],
    );
}

/// Font size at which `text` fits in `max_width`, starting from `size_px`.
///
/// Text that already fits keeps its size. Wider text is scaled down by
/// `max_width / measured`, then nudged further if glyph rounding still
/// overshoots.
pub fn fit_font_size<P: TextPainter + ?Sized>(
    painter: &P,
    text: &str,
    size_px: f32,
    max_width: f32,
) -> f32 {
    let measured = painter.measure(text, size_px).width;
    if measured <= max_width || measured <= 0.0 || max_width <= 0.0 {
        return size_px;
    }
    let mut size = size_px * max_width / measured;
    for _ in 0..16 {
        if painter.measure(text, size).width <= max_width {
            break;
        }
        size *= 0.98;
    }
    size
}

/// Paint `text` centred on both axes inside the box at `(left, top)`.
///
/// Returns the left edge the text was painted at.
pub fn paint_centred<P: TextPainter + ?Sized>(
    painter: &P,
    canvas: &mut RgbaImage,
    text: &str,
    size_px: f32,
    (left, top, width, height): (f32, f32, f32, f32),
    rgb: [u8; 3],
) -> f32 {
    let metrics = painter.measure(text, size_px);
    let x = left + (width - metrics.width) / 2.0;
    let baseline = top + (height - metrics.height()) / 2.0 + metrics.ascent;
    painter.paint(canvas, text, size_px, x, baseline, rgb);
    x
}

/// A TrueType / OpenType font rendered through `ab_glyph`.
#[derive(Clone)]
pub struct GlyphFont {
    font: FontArc,
}

impl GlyphFont {
    /// Parse a font from its file contents.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|err| QuillError::FontError(err.to_string()))?;
        Ok(Self { font })
    }

    /// Load a font file from disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        debug!(bytes_len = bytes.len(), "Font file read");
        Self::from_bytes(bytes)
    }

    /// Glyph ids with their x offsets from the line start, plus total width.
    fn layout(&self, text: &str, size_px: f32) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(size_px);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut cursor_x = 0.0f32;
        let mut last_glyph: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = self.font.glyph_id(ch);
            if let Some(prev) = last_glyph {
                cursor_x += scaled.kern(prev, glyph_id);
            }
            glyphs.push((glyph_id, cursor_x));
            cursor_x += scaled.h_advance(glyph_id);
            last_glyph = Some(glyph_id);
        }

        (glyphs, cursor_x)
    }
}

impl TextPainter for GlyphFont {
    fn measure(&self, text: &str, size_px: f32) -> TextMetrics {
        let scaled = self.font.as_scaled(size_px);
        let (_, width) = self.layout(text, size_px);
        TextMetrics {
            width,
            ascent: scaled.ascent(),
            descent: -scaled.descent(),
        }
    }

    fn paint(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size_px: f32,
        x: f32,
        baseline: f32,
        rgb: [u8; 3],
    ) {
        let (glyphs, _) = self.layout(text, size_px);
        for (glyph_id, offset) in glyphs {
            let glyph = glyph_id.with_scale_and_position(size_px, point(x + offset, baseline));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                blend_over(
                    canvas,
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    rgb,
                    coverage,
                );
            });
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use image::Rgba;

    /// Monospace block painter: every char is `0.5 * size` wide and paints a
    /// solid rectangle from `baseline - 0.8 * size` to `baseline + 0.2 * size`.
    pub struct BlockPainter;

    impl TextPainter for BlockPainter {
        fn measure(&self, text: &str, size_px: f32) -> TextMetrics {
            TextMetrics {
                width: text.chars().count() as f32 * size_px * 0.5,
                ascent: size_px * 0.8,
                descent: size_px * 0.2,
            }
        }

        fn paint(
            &self,
            canvas: &mut RgbaImage,
            text: &str,
            size_px: f32,
            x: f32,
            baseline: f32,
            rgb: [u8; 3],
        ) {
            let metrics = self.measure(text, size_px);
            let (x0, x1) = (x.round() as i32, (x + metrics.width).round() as i32);
            let (y0, y1) = (
                (baseline - metrics.ascent).round() as i32,
                (baseline + metrics.descent).round() as i32,
            );
            for py in y0.max(0)..y1.min(canvas.height() as i32) {
                for px in x0.max(0)..x1.min(canvas.width() as i32) {
                    canvas.put_pixel(px as u32, py as u32, Rgba([rgb[0], rgb[1], rgb[2], 255]));
                }
            }
        }
    }
}
