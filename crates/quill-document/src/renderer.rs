// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page renderer: turns an uploaded image or PDF into the canvas background.

use std::path::Path;

use image::ImageFormat;
use quill_bridge::{PageRenderer, PdfRasterizer};
use quill_core::error::{QuillError, Result};
use quill_core::{DocumentType, EditorConfig, PageImage, UploadedFile};
use tracing::{info, instrument};

use crate::image::{ImageProcessor, encode_png};
use crate::pdf::PdfReader;

/// Document type of an upload.
///
/// The file name decides first. Failing that, any raster format the image
/// decoder knows by extension or by its leading bytes counts as an image.
pub fn classify_upload(file: &UploadedFile) -> Option<DocumentType> {
    if file.document_type.is_some() {
        return file.document_type;
    }
    let by_extension = Path::new(&file.name)
        .extension()
        .and_then(ImageFormat::from_extension);
    by_extension
        .or_else(|| image::guess_format(&file.bytes).ok())
        .map(|_| DocumentType::OtherImage)
}

/// [`PageRenderer`] that decodes images itself and hands PDFs, cut down to
/// page one, to a [`PdfRasterizer`] backend.
pub struct RasterPageRenderer<B> {
    backend: B,
    pdf_scale: f32,
}

impl<B: PdfRasterizer> RasterPageRenderer<B> {
    pub fn new(backend: B, config: &EditorConfig) -> Self {
        Self {
            backend,
            pdf_scale: config.pdf_render_scale,
        }
    }

    fn render_pdf(&self, bytes: &[u8]) -> Result<PageImage> {
        let reader = PdfReader::from_bytes(bytes)?;
        let first_page = if reader.page_count() > 1 {
            reader.first_page_only()?
        } else {
            bytes.to_vec()
        };
        let raster = self.backend.rasterize_page(&first_page, self.pdf_scale)?;
        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(QuillError::RenderFailed("backend returned an empty page".into()));
        }
        Ok(PageImage {
            bytes: encode_png(&raster)?,
            width,
            height,
        })
    }
}

impl<B: PdfRasterizer> PageRenderer for RasterPageRenderer<B> {
    #[instrument(skip_all, fields(name = %file.name, kind = ?file.document_type))]
    fn render_first_page(&self, file: &UploadedFile) -> Result<PageImage> {
        let page = match classify_upload(file) {
            Some(kind) if kind.is_image() => {
                let decoded = ImageProcessor::from_bytes(&file.bytes)?;
                // Stored as uploaded; the compositor decodes it again at export.
                PageImage {
                    bytes: file.bytes.clone(),
                    width: decoded.width(),
                    height: decoded.height(),
                }
            }
            Some(DocumentType::Pdf) => self.render_pdf(&file.bytes)?,
            Some(other) => {
                return Err(QuillError::UnsupportedDocument(other.mime_type().to_string()));
            }
            None => return Err(QuillError::UnsupportedDocument(file.name.clone())),
        };
        info!(width = page.width, height = page.height, "First page rendered");
        Ok(page)
    }
}
