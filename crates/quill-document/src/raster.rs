// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel-level helpers shared by the capture surfaces and the compositor.

use image::{Rgba, RgbaImage};

/// Source-over blend of `rgb` at `coverage` (0..=1) onto one pixel.
///
/// Out-of-bounds coordinates are ignored.
pub(crate) fn blend_over(canvas: &mut RgbaImage, x: i32, y: i32, rgb: [u8; 3], coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let src_a = coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }
    let mix = |s: u8, d: u8| -> u8 {
        let v = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(rgb[0], dst[0]),
        mix(rgb[1], dst[1]),
        mix(rgb[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

/// Paint `rgb` at `coverage`, keeping the higher opacity where the pixel
/// already holds the same colour.
///
/// Overlapping dabs of one stroke then stay uniform instead of darkening at
/// every joint.
pub(crate) fn stamp_max(canvas: &mut RgbaImage, x: i32, y: i32, rgb: [u8; 3], coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    if pixel[3] == 0 || [pixel[0], pixel[1], pixel[2]] == rgb {
        let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
        if alpha > pixel[3] {
            *pixel = Rgba([rgb[0], rgb[1], rgb[2], alpha]);
        }
        return;
    }
    blend_over(canvas, x, y, rgb, coverage);
}

/// Distance from `(px, py)` to the segment `a`-`b`.
pub(crate) fn segment_distance(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = bx - ax;
    let dy = by - ay;
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = ax + t * dx;
    let cy = ay + t * dy;
    ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
}

/// Draw an antialiased capsule (a segment with round caps) of the given
/// `width` from `a` to `b`.
pub(crate) fn draw_capsule(
    canvas: &mut RgbaImage,
    a: (f32, f32),
    b: (f32, f32),
    width: f32,
    rgb: [u8; 3],
) {
    let radius = (width / 2.0).max(0.5);
    let min_x = (a.0.min(b.0) - radius - 1.0).floor() as i32;
    let max_x = (a.0.max(b.0) + radius + 1.0).ceil() as i32;
    let min_y = (a.1.min(b.1) - radius - 1.0).floor() as i32;
    let max_y = (a.1.max(b.1) + radius + 1.0).ceil() as i32;

    for y in min_y.max(0)..=max_y.min(canvas.height() as i32 - 1) {
        for x in min_x.max(0)..=max_x.min(canvas.width() as i32 - 1) {
            let d = segment_distance(x as f32 + 0.5, y as f32 + 0.5, a.0, a.1, b.0, b.1);
            let coverage = radius + 0.5 - d;
            if coverage > 0.0 {
                stamp_max(canvas, x, y, rgb, coverage);
            }
        }
    }
}
