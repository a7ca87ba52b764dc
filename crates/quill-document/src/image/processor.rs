// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode, fit, ink tinting, white flattening, PNG encoding.
// Operates on in-memory images using the `image` crate.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use quill_core::InkColor;
use quill_core::error::QuillError;
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`
/// wrapping the result, enabling method chaining.
///
/// ```ignore
/// let png = ImageProcessor::from_bytes(&signature_png)?
///     .tint(InkColor::Blue)
///     .fit_within(320, 120)
///     .to_png_bytes()?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, QuillError> {
        let img = image::load_from_memory(data).map_err(|err| {
            QuillError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Wrap an RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::ImageRgba8(image),
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Consume the processor and return an RGBA buffer.
    pub fn into_rgba(self) -> RgbaImage {
        self.image.into_rgba8()
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Scale the image to the largest size that fits within
    /// `max_width` x `max_height`, preserving aspect ratio. Small images are
    /// scaled up as well as down.
    #[instrument(skip(self), fields(max_width, max_height))]
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Self {
        let (max_width, max_height) = (max_width.max(1), max_height.max(1));
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            "Fitting image"
        );
        let resized = self
            .image
            .resize(max_width, max_height, image::imageops::FilterType::Lanczos3);
        Self { image: resized }
    }

    /// Resize the image to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        let resized = self.image.resize_exact(
            width.max(1),
            height.max(1),
            image::imageops::FilterType::Triangle,
        );
        Self { image: resized }
    }

    /// Apply an ink colour to a signature raster.
    ///
    /// See [`tint_ink`].
    #[instrument(skip(self))]
    pub fn tint(self, color: InkColor) -> Self {
        if color == InkColor::Black {
            return self;
        }
        let tinted = tint_ink(&self.image.to_rgba8(), color);
        Self {
            image: DynamicImage::ImageRgba8(tinted),
        }
    }

    /// Composite the image over opaque white, dropping transparency.
    pub fn flatten_onto_white(self) -> Self {
        let rgba = self.image.to_rgba8();
        let mut canvas = RgbaImage::from_pixel(rgba.width(), rgba.height(), Rgba([255; 4]));
        image::imageops::overlay(&mut canvas, &rgba, 0, 0);
        Self {
            image: DynamicImage::ImageRgba8(canvas),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, QuillError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode the current image as a `data:image/png;base64,...` URL.
    pub fn to_data_url(&self) -> Result<String, QuillError> {
        Ok(png_data_url(&self.to_png_bytes()?))
    }
}

/// Recolour a signature raster for the given ink.
///
/// Black leaves the pixels untouched. Blue and Red replace every pixel's
/// colour with the ink and derive coverage from darkness, so dark strokes
/// keep their opacity and a white paper background becomes transparent.
pub fn tint_ink(source: &RgbaImage, color: InkColor) -> RgbaImage {
    if color == InkColor::Black {
        return source.clone();
    }
    let [r, g, b] = color.rgb();
    let mut out = source.clone();
    for pixel in out.pixels_mut() {
        let Rgba([pr, pg, pb, pa]) = *pixel;
        let luma = 0.299 * pr as f32 + 0.587 * pg as f32 + 0.114 * pb as f32;
        let coverage = 1.0 - luma / 255.0;
        let alpha = (pa as f32 * coverage).round().clamp(0.0, 255.0) as u8;
        *pixel = Rgba([r, g, b, alpha]);
    }
    out
}

/// Decode any supported upload and re-encode it as PNG.
///
/// Used when an image file is uploaded directly as a signature value.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn normalize_to_png(data: &[u8]) -> Result<Vec<u8>, QuillError> {
    let processor = ImageProcessor::from_bytes(data)?;
    let png = processor.to_png_bytes()?;
    info!(
        width = processor.width(),
        height = processor.height(),
        png_len = png.len(),
        "Upload normalised to PNG"
    );
    Ok(png)
}

/// Encode an RGBA buffer as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, QuillError> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|err| QuillError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Wrap PNG bytes in a data URL.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, QuillError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| QuillError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke_on_paper() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(4, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        img
    }

    #[test]
    fn black_ink_is_identity() {
        let img = stroke_on_paper();
        assert_eq!(tint_ink(&img, InkColor::Black), img);
    }

    #[test]
    fn coloured_ink_knocks_out_paper() {
        let tinted = tint_ink(&stroke_on_paper(), InkColor::Blue);
        assert_eq!(*tinted.get_pixel(1, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(tinted.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn fit_within_preserves_aspect() {
        let img = ImageProcessor::from_rgba(RgbaImage::new(400, 100)).fit_within(200, 200);
        assert_eq!((img.width(), img.height()), (200, 50));
    }

    #[test]
    fn flatten_removes_transparency() {
        let img = ImageProcessor::from_rgba(RgbaImage::new(2, 2))
            .flatten_onto_white()
            .into_rgba();
        assert!(img.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn data_url_has_png_prefix() {
        let url = ImageProcessor::from_rgba(RgbaImage::new(1, 1))
            .to_data_url()
            .unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(matches!(
            normalize_to_png(b"not an image"),
            Err(QuillError::ImageError(_))
        ));
    }
}
