// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page compositor: flattens the page raster and every field overlay into a
// single opaque image at a supersampling multiplier.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use quill_bridge::{PageRasterizer, PageScene};
use quill_core::error::{QuillError, Result};
use quill_core::{DEFAULT_MAX_PAGE_PIXELS, Field, FieldValue, PAGE_EXTENT_PERCENT};
use tracing::{debug, info, instrument, warn};

use crate::image::ImageProcessor;
use crate::text::{GlyphFont, TextPainter, fit_font_size, paint_centred};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PLACEHOLDER_BORDER: Rgba<u8> = Rgba([0xcb, 0xd5, 0xe1, 255]);
const SELECTION_RING: Rgba<u8> = Rgba([0x25, 0x63, 0xeb, 255]);
const LABEL_INK: [u8; 3] = [0x1e, 0x29, 0x3b];
const VALUE_INK: [u8; 3] = [0x0f, 0x17, 0x2a];
const CAPTION_INK: [u8; 3] = [0xe2, 0xe8, 0xf0];

/// Field box in raster pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelBox {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl PixelBox {
    fn of(field: &Field, raster_w: u32, raster_h: u32) -> Self {
        let to_px = |pct: f64, total: u32| (pct / PAGE_EXTENT_PERCENT * total as f64).round();
        let x = to_px(field.position.x, raster_w);
        let y = to_px(field.position.y, raster_h);
        let right = to_px(field.position.x + field.extent.width, raster_w);
        let bottom = to_px(field.position.y + field.extent.height, raster_h);
        Self {
            x: x as i32,
            y: y as i32,
            width: (right - x).max(1.0) as u32,
            height: (bottom - y).max(1.0) as u32,
        }
    }

    fn rect(&self) -> Rect {
        Rect::at(self.x, self.y).of_size(self.width, self.height)
    }

    fn inset(&self, by: u32) -> Option<Self> {
        if self.width <= by * 2 || self.height <= by * 2 {
            return None;
        }
        Some(Self {
            x: self.x + by as i32,
            y: self.y + by as i32,
            width: self.width - by * 2,
            height: self.height - by * 2,
        })
    }

    fn as_f32(&self) -> (f32, f32, f32, f32) {
        (self.x as f32, self.y as f32, self.width as f32, self.height as f32)
    }
}

/// Default [`PageRasterizer`]: draws the page, then fields in insertion order.
///
/// - The page raster is stretched to the natural size times the multiplier;
///   with no page the background is plain white.
/// - Image values are tinted by the field's ink and contain-fitted, centred.
/// - Text values are shrunk to fit and centred.
/// - Unfilled fields show a white placeholder card with a border and label.
/// - Only the scene's selected field gets a selection ring.
///
/// Without a text painter, text values and labels are skipped.
pub struct Compositor<P = GlyphFont> {
    painter: Option<P>,
    max_pixels: u64,
}

impl<P: TextPainter> Compositor<P> {
    pub fn new(painter: P) -> Self {
        Self {
            painter: Some(painter),
            max_pixels: DEFAULT_MAX_PAGE_PIXELS,
        }
    }

    /// Compositor that draws images and chrome but no text.
    pub fn image_only() -> Self {
        Self {
            painter: None,
            max_pixels: DEFAULT_MAX_PAGE_PIXELS,
        }
    }

    /// Refuse rasters larger than `max_pixels` instead of allocating them.
    pub fn with_pixel_budget(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    fn draw_page(&self, canvas: &mut RgbaImage, scene: &PageScene) -> Result<()> {
        let (w, h) = canvas.dimensions();
        match &scene.page {
            Some(page) => {
                let page = ImageProcessor::from_bytes(&page.bytes)
                    .map_err(|err| QuillError::RasterizeFailed(err.to_string()))?
                    .resize_exact(w, h)
                    .into_rgba();
                image::imageops::overlay(canvas, &page, 0, 0);
            }
            None => {
                if let (Some(painter), Some(caption)) = (&self.painter, &scene.caption) {
                    let size = fit_font_size(painter, caption, h as f32 * 0.03, w as f32 * 0.8);
                    paint_centred(painter, canvas, caption, size, (0.0, 0.0, w as f32, h as f32), CAPTION_INK);
                }
            }
        }
        Ok(())
    }

    fn draw_field(&self, canvas: &mut RgbaImage, field: &Field, multiplier: u32) -> Result<()> {
        let (w, h) = canvas.dimensions();
        let area = PixelBox::of(field, w, h);
        match &field.value {
            Some(FieldValue::Image(png)) => {
                let ink = ImageProcessor::from_bytes(png)
                    .map_err(|err| QuillError::RasterizeFailed(err.to_string()))?
                    .tint(field.ink_color)
                    .fit_within(area.width, area.height)
                    .into_rgba();
                let x = area.x as i64 + (area.width as i64 - ink.width() as i64) / 2;
                let y = area.y as i64 + (area.height as i64 - ink.height() as i64) / 2;
                image::imageops::overlay(canvas, &ink, x, y);
            }
            Some(FieldValue::Text(text)) => {
                self.draw_text(canvas, text, area, multiplier, VALUE_INK);
            }
            None => {
                draw_filled_rect_mut(canvas, area.rect(), WHITE);
                draw_ring(canvas, area, multiplier * 2, PLACEHOLDER_BORDER);
                self.draw_text(canvas, &field.label, area, multiplier, LABEL_INK);
            }
        }
        Ok(())
    }

    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        area: PixelBox,
        multiplier: u32,
        rgb: [u8; 3],
    ) {
        let Some(painter) = &self.painter else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        let padding = (multiplier * 6).min(area.width / 8);
        let Some(inner) = area.inset(padding) else {
            return;
        };
        let size = fit_font_size(painter, text, area.height as f32 * 0.6, inner.width as f32);
        paint_centred(painter, canvas, text, size, inner.as_f32(), rgb);
    }
}

impl<P: TextPainter> PageRasterizer for Compositor<P> {
    #[instrument(skip_all, fields(fields = scene.fields.len(), multiplier))]
    fn rasterize(&self, scene: &PageScene, multiplier: u32) -> Result<RgbaImage> {
        let multiplier = multiplier.max(1);
        let (Some(width), Some(height)) = (
            scene.size.width_px.checked_mul(multiplier),
            scene.size.height_px.checked_mul(multiplier),
        ) else {
            return Err(over_budget(scene, multiplier, self.max_pixels));
        };
        if width == 0 || height == 0 {
            return Err(QuillError::RasterizeFailed(format!(
                "page has no area ({}x{})",
                scene.size.width_px, scene.size.height_px
            )));
        }
        match scene.size.raster_pixels(multiplier) {
            Some(pixels) if pixels <= self.max_pixels => {}
            _ => return Err(over_budget(scene, multiplier, self.max_pixels)),
        }
        if self.painter.is_none() {
            warn!("No text painter configured; labels and text values will be omitted");
        }

        let mut canvas = RgbaImage::from_pixel(width, height, WHITE);
        self.draw_page(&mut canvas, scene)?;

        for field in &scene.fields {
            self.draw_field(&mut canvas, field, multiplier)?;
            if scene.selected == Some(field.id) {
                let area = PixelBox::of(field, width, height);
                draw_ring(&mut canvas, area, multiplier * 2, SELECTION_RING);
            }
            debug!(field_id = %field.id, kind = ?field.kind, "Field composited");
        }

        // Opaque output regardless of what the page raster carried.
        for pixel in canvas.pixels_mut() {
            pixel[3] = 255;
        }

        info!(width, height, "Page composited");
        Ok(canvas)
    }
}

fn over_budget(scene: &PageScene, multiplier: u32, max_pixels: u64) -> QuillError {
    QuillError::RasterizeFailed(format!(
        "page of {}x{} px at {}x exceeds the raster budget of {} pixels",
        scene.size.width_px, scene.size.height_px, multiplier, max_pixels
    ))
}

fn draw_ring(canvas: &mut RgbaImage, area: PixelBox, thickness: u32, color: Rgba<u8>) {
    for step in 0..thickness.max(1) {
        match area.inset(step) {
            Some(ring) => draw_hollow_rect_mut(canvas, ring.rect(), color),
            None => break,
        }
    }
}
