// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: wrap a flattened page raster in a single-page PDF using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use image::{DynamicImage, RgbaImage};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use quill_bridge::{DocumentPackager, ExportArtifact};
use quill_core::PageSize;
use quill_core::error::{QuillError, Result};
use tracing::{debug, info, instrument, warn};

use crate::image::ImageProcessor;

/// Points per CSS pixel (72 pt per inch / 96 px per inch).
pub const PT_PER_PX: f32 = 0.75;

/// CSS pixel density the page's natural size is expressed in.
const CSS_DPI: f32 = 96.0;

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// Creates single-page PDFs sized to a page's natural pixel dimensions.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Create a PDF whose only page is `natural` CSS pixels large
    /// (1 px = 0.75 pt), filled edge to edge by `raster`.
    ///
    /// `raster` is normally a supersampled rendition of the page; its extra
    /// resolution is kept by placing it at a proportionally higher DPI.
    #[instrument(skip(self, raster), fields(raster_w = raster.width(), raster_h = raster.height()))]
    pub fn create_from_raster(&self, raster: &RgbaImage, natural: PageSize) -> Result<Vec<u8>> {
        if natural.width_px == 0 || natural.height_px == 0 || raster.width() == 0 {
            return Err(QuillError::PackagingFailed(format!(
                "cannot package a {}x{} page",
                natural.width_px, natural.height_px
            )));
        }
        let title = self.title.as_deref().unwrap_or("Signed Document");
        let page_w_pt = natural.width_px as f32 * PT_PER_PX;
        let page_h_pt = natural.height_px as f32 * PT_PER_PX;

        info!(
            width_px = natural.width_px,
            height_px = natural.height_px,
            orientation = ?natural.orientation(),
            title,
            "Creating flattened PDF"
        );

        // printpdf embeds RGB8; flatten any residual transparency onto white.
        let rgb = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(raster.clone()))
            .flatten_onto_white()
            .into_dynamic()
            .to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: raster.width() as usize,
            height: raster.height() as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        // At this DPI the raster covers exactly the natural page size.
        let dpi = CSS_DPI * raster.width() as f32 / natural.width_px as f32;
        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(dpi),
                rotate: None,
            },
        }];

        let page = PdfPage::new(pt_to_mm(page_w_pt), pt_to_mm(page_h_pt), ops);
        doc.with_pages(vec![page]);

        debug!(page_w_pt, page_h_pt, dpi, "Raster placed on page");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        Ok(output)
    }
}

impl DocumentPackager for PdfWriter {
    fn package(
        &self,
        raster: &RgbaImage,
        natural: PageSize,
        file_name: &str,
    ) -> Result<ExportArtifact> {
        let bytes = self.create_from_raster(raster, natural)?;
        Ok(ExportArtifact {
            file_name: file_name.to_string(),
            bytes,
            width_px: natural.width_px,
            height_px: natural.height_px,
            orientation: natural.orientation(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfReader;
    use image::Rgba;
    use quill_core::Orientation;

    #[test]
    fn page_matches_natural_size() {
        let raster = RgbaImage::from_pixel(816 * 2, 1056 * 2, Rgba([255, 255, 255, 255]));
        let bytes = PdfWriter::new()
            .create_from_raster(&raster, PageSize::new(816, 1056))
            .unwrap();

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 1);
        let (w, h) = reader.page_size_pt(1).unwrap();
        assert!((w - 612.0).abs() < 0.5, "width {w}");
        assert!((h - 792.0).abs() < 0.5, "height {h}");
    }

    #[test]
    fn landscape_artifact() {
        let raster = RgbaImage::from_pixel(300, 200, Rgba([0, 0, 0, 255]));
        let artifact = PdfWriter::new()
            .package(&raster, PageSize::new(300, 200), "Signed_x.pdf")
            .unwrap();
        assert_eq!(artifact.orientation, Orientation::Landscape);
        assert_eq!((artifact.width_px, artifact.height_px), (300, 200));
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_page_is_refused() {
        let raster = RgbaImage::new(1, 1);
        assert!(matches!(
            PdfWriter::new().create_from_raster(&raster, PageSize::new(0, 10)),
            Err(QuillError::PackagingFailed(_))
        ));
    }
}
