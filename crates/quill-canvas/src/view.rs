// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// View transform: zoom and pan state for the paper, plus the view epoch
// that settle barriers wait on.

use quill_core::{EditorConfig, ScreenDelta, ViewTransform};
use tracing::{debug, warn};

/// Zoom/pan state with its configured limits.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    transform: ViewTransform,
    zoom_min: f64,
    zoom_max: f64,
    zoom_step: f64,
    epoch: u64,
}

impl View {
    /// A view over `config`'s zoom range. A range that fails validation is
    /// replaced by the default one.
    pub fn new(config: &EditorConfig) -> Self {
        let fallback;
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(error = %err, "Invalid editor settings, using default zoom range");
                fallback = EditorConfig::default();
                &fallback
            }
        };
        Self {
            transform: ViewTransform::IDENTITY,
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
            zoom_step: config.zoom_step,
            epoch: 0,
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn zoom(&self) -> f64 {
        self.transform.zoom
    }

    pub fn pan(&self) -> ScreenDelta {
        self.transform.pan
    }

    /// Number of normalisations performed so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.transform.zoom + self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.transform.zoom - self.zoom_step)
    }

    /// Set the zoom, clamped to the configured range. Returns the applied value.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        let zoom = if zoom.is_finite() { zoom } else { 1.0 };
        // Repeated steps of 0.1 drift; keep values like 1.2 exact.
        let zoom = (zoom.clamp(self.zoom_min, self.zoom_max) * 1e6).round() / 1e6;
        self.transform.zoom = zoom;
        debug!(zoom, "Zoom changed");
        zoom
    }

    pub fn set_pan(&mut self, pan: ScreenDelta) {
        if pan.dx.is_finite() && pan.dy.is_finite() {
            self.transform.pan = pan;
        }
    }

    pub fn pan_by(&mut self, delta: ScreenDelta) {
        self.set_pan(ScreenDelta::new(
            self.transform.pan.dx + delta.dx,
            self.transform.pan.dy + delta.dy,
        ));
    }

    /// Back to zoom 1 and no pan. Idempotent.
    pub fn reset(&mut self) {
        self.transform = ViewTransform::IDENTITY;
    }

    /// Reset and start a new epoch. Returns the epoch a settle barrier
    /// should wait for.
    pub fn normalize(&mut self) -> u64 {
        self.reset();
        self.epoch += 1;
        debug!(epoch = self.epoch, "View normalized");
        self.epoch
    }

    /// Put back a previously captured transform. The epoch is left alone.
    pub fn restore(&mut self, transform: ViewTransform) {
        self.transform = transform;
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
