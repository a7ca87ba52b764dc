// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coordinate model: page-relative percentages (the stored truth), unscaled
// paper pixels, and screen pixels as reported by the pointer.
//
// Every write to a field's position or extent goes through `clamp_placement`
// or `clamp_extent_at`. Those two functions are the only place the
// containment and minimum-size invariants are enforced.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Upper bound of the page-percent coordinate system on both axes.
pub const PAGE_EXTENT_PERCENT: f64 = 100.0;

/// Top-left corner of a field, in percent of page width / height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of a field, in percent of page width / height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageExtent {
    pub width: f64,
    pub height: f64,
}

impl PageExtent {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A movement expressed in page percent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PercentDelta {
    pub dx: f64,
    pub dy: f64,
}

impl Add<PercentDelta> for PagePoint {
    type Output = PagePoint;

    fn add(self, delta: PercentDelta) -> PagePoint {
        PagePoint::new(self.x + delta.dx, self.y + delta.dy)
    }
}

impl Add<PercentDelta> for PageExtent {
    type Output = PageExtent;

    fn add(self, delta: PercentDelta) -> PageExtent {
        PageExtent::new(self.width + delta.dx, self.height + delta.dy)
    }
}

/// A pointer position in screen (device-independent) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Difference between two screen points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenDelta {
    pub dx: f64,
    pub dy: f64,
}

impl ScreenDelta {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

impl Sub for ScreenPoint {
    type Output = ScreenDelta;

    fn sub(self, other: ScreenPoint) -> ScreenDelta {
        ScreenDelta::new(self.x - other.x, self.y - other.y)
    }
}

impl Add<ScreenDelta> for ScreenPoint {
    type Output = ScreenPoint;

    fn add(self, delta: ScreenDelta) -> ScreenPoint {
        ScreenPoint::new(self.x + delta.dx, self.y + delta.dy)
    }
}

/// Layout rectangle of the paper element before zoom and pan are applied.
///
/// `origin` is where the paper's top-left corner sits on screen at identity
/// transform; `width` / `height` are its natural (unscaled) pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperRect {
    pub origin: ScreenPoint,
    pub width: f64,
    pub height: f64,
}

impl PaperRect {
    pub const fn new(origin: ScreenPoint, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Paper rectangle anchored at the screen origin.
    pub const fn at_origin(width: f64, height: f64) -> Self {
        Self::new(ScreenPoint::new(0.0, 0.0), width, height)
    }
}

/// Zoom factor and pan offset applied to the paper's on-screen presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan: ScreenDelta,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        zoom: 1.0,
        pan: ScreenDelta::new(0.0, 0.0),
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Minimum-size floors (page percent) enforced on every field extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementLimits {
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            min_width: 5.0,
            min_height: 2.0,
        }
    }
}

// -- Mappings -----------------------------------------------------------------

/// Map a page-percent point to screen pixels through the view transform.
pub fn to_screen(point: PagePoint, view: &ViewTransform, paper: &PaperRect) -> ScreenPoint {
    ScreenPoint::new(
        paper.origin.x + point.x / PAGE_EXTENT_PERCENT * paper.width * view.zoom + view.pan.dx,
        paper.origin.y + point.y / PAGE_EXTENT_PERCENT * paper.height * view.zoom + view.pan.dy,
    )
}

/// Inverse of [`to_screen`]: map an absolute screen point back to page percent.
pub fn to_page(point: ScreenPoint, view: &ViewTransform, paper: &PaperRect) -> PagePoint {
    let scaled_w = paper.width * view.zoom;
    let scaled_h = paper.height * view.zoom;
    if !(scaled_w > 0.0 && scaled_h > 0.0) {
        return PagePoint::default();
    }
    PagePoint::new(
        (point.x - paper.origin.x - view.pan.dx) / scaled_w * PAGE_EXTENT_PERCENT,
        (point.y - paper.origin.y - view.pan.dy) / scaled_h * PAGE_EXTENT_PERCENT,
    )
}

/// Convert a pointer movement into a page-percent movement.
///
/// Degenerate paper sizes or zoom factors produce a zero delta.
pub fn to_percent(delta: ScreenDelta, paper: &PaperRect, zoom: f64) -> PercentDelta {
    let scaled_w = paper.width * zoom;
    let scaled_h = paper.height * zoom;
    if !(scaled_w > 0.0 && scaled_h > 0.0) {
        return PercentDelta::default();
    }
    PercentDelta {
        dx: finite_or(delta.dx, 0.0) / scaled_w * PAGE_EXTENT_PERCENT,
        dy: finite_or(delta.dy, 0.0) / scaled_h * PAGE_EXTENT_PERCENT,
    }
}

// -- Clamping -----------------------------------------------------------------

/// Clamp an extent to `[floor, 100]` on both axes.
pub fn clamp_extent(extent: PageExtent, limits: &PlacementLimits) -> PageExtent {
    PageExtent::new(
        bounded(extent.width, limits.min_width, PAGE_EXTENT_PERCENT),
        bounded(extent.height, limits.min_height, PAGE_EXTENT_PERCENT),
    )
}

/// Clamp a whole placement so the field box lies inside the page.
///
/// The extent is clamped first, then the position is kept within
/// `[0, 100 - extent]`.
pub fn clamp_placement(
    position: PagePoint,
    extent: PageExtent,
    limits: &PlacementLimits,
) -> (PagePoint, PageExtent) {
    let extent = clamp_extent(extent, limits);
    let position = PagePoint::new(
        bounded(position.x, 0.0, PAGE_EXTENT_PERCENT - extent.width),
        bounded(position.y, 0.0, PAGE_EXTENT_PERCENT - extent.height),
    );
    (position, extent)
}

/// Clamp an extent for a resize anchored at a fixed top-left `position`.
///
/// The result satisfies `floor <= extent <= 100 - position` so the position
/// never has to move.
pub fn clamp_extent_at(
    position: PagePoint,
    extent: PageExtent,
    limits: &PlacementLimits,
) -> PageExtent {
    let max_w = (PAGE_EXTENT_PERCENT - position.x).max(limits.min_width);
    let max_h = (PAGE_EXTENT_PERCENT - position.y).max(limits.min_height);
    PageExtent::new(
        bounded(extent.width, limits.min_width, max_w),
        bounded(extent.height, limits.min_height, max_h),
    )
}

/// Whether a placement satisfies containment and the minimum-size floors.
pub fn placement_is_valid(
    position: PagePoint,
    extent: PageExtent,
    limits: &PlacementLimits,
) -> bool {
    const EPS: f64 = 1e-9;
    position.x >= 0.0
        && position.y >= 0.0
        && position.x + extent.width <= PAGE_EXTENT_PERCENT + EPS
        && position.y + extent.height <= PAGE_EXTENT_PERCENT + EPS
        && extent.width >= limits.min_width - EPS
        && extent.height >= limits.min_height - EPS
}

/// `value.clamp(lo, hi)` that tolerates NaN/∞ and an inverted range.
fn bounded(value: f64, lo: f64, hi: f64) -> f64 {
    let hi = hi.max(lo);
    finite_or(value, lo).clamp(lo, hi)
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPER: PaperRect = PaperRect::at_origin(800.0, 1000.0);

    #[test]
    fn to_screen_at_identity_is_proportional() {
        let p = to_screen(PagePoint::new(50.0, 10.0), &ViewTransform::IDENTITY, &PAPER);
        assert_eq!(p, ScreenPoint::new(400.0, 100.0));
    }

    #[test]
    fn to_screen_applies_zoom_then_pan() {
        let view = ViewTransform {
            zoom: 2.0,
            pan: ScreenDelta::new(30.0, -12.0),
        };
        let paper = PaperRect::new(ScreenPoint::new(10.0, 20.0), 800.0, 1000.0);
        let p = to_screen(PagePoint::new(25.0, 50.0), &view, &paper);
        assert_eq!(p, ScreenPoint::new(10.0 + 400.0 + 30.0, 20.0 + 1000.0 - 12.0));
    }

    #[test]
    fn to_page_inverts_to_screen() {
        let view = ViewTransform {
            zoom: 1.7,
            pan: ScreenDelta::new(30.0, -12.0),
        };
        let original = PagePoint::new(33.0, 71.5);
        let back = to_page(to_screen(original, &view, &PAPER), &view, &PAPER);
        assert!((back.x - original.x).abs() < 1e-9);
        assert!((back.y - original.y).abs() < 1e-9);
    }

    #[test]
    fn to_percent_divides_out_zoom() {
        let d = to_percent(ScreenDelta::new(400.0, 500.0), &PAPER, 2.0);
        assert_eq!(d, PercentDelta { dx: 25.0, dy: 25.0 });
    }

    #[test]
    fn to_percent_degenerate_paper_is_zero() {
        let d = to_percent(ScreenDelta::new(10.0, 10.0), &PaperRect::at_origin(0.0, 0.0), 1.0);
        assert_eq!(d, PercentDelta::default());
    }

    #[test]
    fn clamp_pulls_field_back_inside() {
        let limits = PlacementLimits::default();
        let (pos, ext) =
            clamp_placement(PagePoint::new(85.0, -4.0), PageExtent::new(28.0, 10.0), &limits);
        assert_eq!(pos, PagePoint::new(72.0, 0.0));
        assert_eq!(ext, PageExtent::new(28.0, 10.0));
    }

    #[test]
    fn clamp_enforces_floors_and_ceiling() {
        let limits = PlacementLimits::default();
        let (pos, ext) =
            clamp_placement(PagePoint::new(0.0, 0.0), PageExtent::new(1.0, 500.0), &limits);
        assert_eq!(ext, PageExtent::new(5.0, 100.0));
        assert_eq!(pos, PagePoint::new(0.0, 0.0));
    }

    #[test]
    fn clamp_handles_non_finite_input() {
        let limits = PlacementLimits::default();
        let (pos, ext) = clamp_placement(
            PagePoint::new(f64::NAN, f64::INFINITY),
            PageExtent::new(f64::NAN, 10.0),
            &limits,
        );
        assert!(placement_is_valid(pos, ext, &limits));
        assert_eq!(ext.width, 5.0);
    }

    #[test]
    fn resize_clamp_respects_anchor() {
        let limits = PlacementLimits::default();
        let ext = clamp_extent_at(PagePoint::new(80.0, 95.0), PageExtent::new(50.0, 50.0), &limits);
        assert_eq!(ext, PageExtent::new(20.0, 5.0));
    }
}
