// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flatten/export pipeline.
//
//   snapshot -> normalize -> settle -> rasterize -> package -> restore
//
// The restore step lives in a drop guard, so selection and view come back
// on success, on error, when the export future is dropped mid-wait, and
// while unwinding from a panic.

use quill_bridge::{DocumentPackager, ExportArtifact, PageRasterizer, SettleBarrier};
use quill_core::error::{QuillError, Result};
use quill_core::export_file_name;
use tracing::{debug, info, instrument, warn};

use crate::canvas::{ExportSnapshot, SharedCanvas, lock};

/// Puts the canvas back the way [`ExportPipeline::export`] found it.
struct RestoreGuard<'a> {
    canvas: &'a SharedCanvas,
    snapshot: ExportSnapshot,
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        lock(self.canvas).end_export(&self.snapshot);
        debug!(
            zoom = self.snapshot.view.zoom,
            selected = self.snapshot.selected.is_some(),
            "View restored after export"
        );
    }
}

/// Flattens a canvas into a downloadable single-page document.
pub struct ExportPipeline<R, P, S> {
    rasterizer: R,
    packager: P,
    barrier: S,
}

impl<R, P, S> ExportPipeline<R, P, S>
where
    R: PageRasterizer,
    P: DocumentPackager,
    S: SettleBarrier,
{
    pub fn new(rasterizer: R, packager: P, barrier: S) -> Self {
        Self {
            rasterizer,
            packager,
            barrier,
        }
    }

    pub fn barrier(&self) -> &S {
        &self.barrier
    }

    /// Export the canvas at its configured supersample multiplier.
    ///
    /// Fails with `ExportInProgress` while another export holds the canvas
    /// and with `NothingToExport` when no field has been placed; neither
    /// touches the view. The canvas lock is never held across the settle
    /// wait.
    #[instrument(skip_all)]
    pub async fn export(&self, canvas: &SharedCanvas) -> Result<ExportArtifact> {
        let snapshot = lock(canvas).begin_export()?;
        let _restore = RestoreGuard { canvas, snapshot };
        info!(epoch = snapshot.epoch, "Export started");

        self.barrier.settle(snapshot.epoch).await?;

        let (scene, multiplier, max_pixels, file_name) = {
            let canvas = lock(canvas);
            (
                canvas.scene(),
                canvas.config().export_supersample,
                canvas.config().max_page_pixels,
                export_file_name(canvas.document_name()),
            )
        };
        debug!(fields = scene.fields.len(), multiplier, "Scene captured");

        match scene.size.raster_pixels(multiplier) {
            Some(pixels) if pixels <= max_pixels => {}
            pixels => {
                warn!(?pixels, max_pixels, "Export raster over budget");
                return Err(QuillError::RasterizeFailed(format!(
                    "page of {}x{} px at {}x is larger than the {} pixel export limit",
                    scene.size.width_px, scene.size.height_px, multiplier, max_pixels
                )));
            }
        }

        let raster = self.rasterizer.rasterize(&scene, multiplier)?;
        let artifact = self.packager.package(&raster, scene.size, &file_name)?;
        info!(
            file_name = %artifact.file_name,
            bytes_len = artifact.bytes.len(),
            orientation = ?artifact.orientation,
            "Export finished"
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use quill_bridge::{PageScene, stub::ImmediateSettle};
    use quill_core::{EditorConfig, FieldKind, Orientation, PageSize, QuillError};
    use quill_document::PdfWriter;
    use std::sync::Mutex;

    use crate::canvas::Canvas;

    fn small_page() -> EditorConfig {
        EditorConfig {
            paper_width_px: 120,
            blank_page_height_px: 90,
            ..EditorConfig::default()
        }
    }

    /// Records the scenes it was given and returns a blank raster.
    #[derive(Default)]
    struct SceneSpy {
        seen: Mutex<Vec<(PageScene, u32)>>,
    }

    impl PageRasterizer for SceneSpy {
        fn rasterize(&self, scene: &PageScene, multiplier: u32) -> Result<RgbaImage> {
            self.seen.lock().unwrap().push((scene.clone(), multiplier));
            Ok(RgbaImage::new(
                scene.size.width_px * multiplier,
                scene.size.height_px * multiplier,
            ))
        }
    }

    #[tokio::test]
    async fn rasterizer_sees_no_selection_at_supersample() {
        let canvas = Canvas::new(small_page(), "NDA.pdf", None).into_shared();
        let (id, _) = lock(&canvas).add_field(FieldKind::Text).unwrap();

        let pipeline = ExportPipeline::new(SceneSpy::default(), PdfWriter::new(), ImmediateSettle);
        let artifact = pipeline.export(&canvas).await.unwrap();
        assert_eq!(artifact.file_name, "Signed_NDA.pdf");
        assert_eq!((artifact.width_px, artifact.height_px), (120, 90));
        assert_eq!(artifact.orientation, Orientation::Landscape);

        let seen = pipeline.rasterizer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.selected, None);
        assert_eq!(seen[0].0.size, PageSize::new(120, 90));
        assert_eq!(seen[0].1, 4);
        assert_eq!(lock(&canvas).registry().selected(), Some(id));
    }

    #[tokio::test]
    async fn raster_over_budget_is_refused_before_rasterizing() {
        let config = EditorConfig {
            max_page_pixels: 120 * 90,
            ..small_page()
        };
        let canvas = Canvas::new(config, "NDA.pdf", None).into_shared();
        let (id, _) = lock(&canvas).add_field(FieldKind::Date).unwrap();

        let pipeline = ExportPipeline::new(SceneSpy::default(), PdfWriter::new(), ImmediateSettle);
        let err = pipeline.export(&canvas).await.unwrap_err();
        assert!(matches!(err, QuillError::RasterizeFailed(_)));
        assert!(pipeline.rasterizer.seen.lock().unwrap().is_empty());

        let canvas = lock(&canvas);
        assert_eq!(canvas.registry().selected(), Some(id));
        assert!(!canvas.is_exporting());
    }

    #[tokio::test]
    async fn empty_canvas_is_refused() {
        let canvas = Canvas::new(EditorConfig::default(), "NDA.pdf", None).into_shared();
        lock(&canvas).set_zoom(2.0);
        let pipeline = ExportPipeline::new(SceneSpy::default(), PdfWriter::new(), ImmediateSettle);
        assert!(matches!(
            pipeline.export(&canvas).await,
            Err(QuillError::NothingToExport)
        ));
        assert_eq!(lock(&canvas).view().zoom(), 2.0);
        assert!(pipeline.rasterizer.seen.lock().unwrap().is_empty());
    }
}
