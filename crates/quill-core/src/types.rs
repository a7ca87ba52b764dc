// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Quill signature canvas.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{PageExtent, PagePoint};

/// Unique identifier for a placed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(pub Uuid);

impl FieldId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FieldId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an uploaded document within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a field collects. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Signature,
    Date,
    Initials,
    Text,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Signature,
        FieldKind::Date,
        FieldKind::Initials,
        FieldKind::Text,
    ];

    /// Label a freshly added field starts with.
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Signature => "Signature",
            Self::Date => "Date Signed",
            Self::Initials => "Initials",
            Self::Text => "Text Field",
        }
    }

    /// Size a freshly added field starts with, in page percent.
    pub fn default_extent(&self) -> PageExtent {
        match self {
            Self::Signature => PageExtent::new(28.0, 10.0),
            Self::Initials => PageExtent::new(12.0, 8.0),
            Self::Date => PageExtent::new(20.0, 5.0),
            Self::Text => PageExtent::new(25.0, 5.0),
        }
    }

    /// Whether the field's value is an ink image.
    pub fn takes_image(&self) -> bool {
        matches!(self, Self::Signature | Self::Initials)
    }

    /// Parse the lowercase wire name used by the suggestion service.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "signature" => Some(Self::Signature),
            "date" => Some(Self::Date),
            "initials" => Some(Self::Initials),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Default position for toolbox-added fields, in page percent.
pub const DEFAULT_FIELD_POSITION: PagePoint = PagePoint::new(35.0, 35.0);

/// Ink colour applied to signature and initials images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkColor {
    #[default]
    Black,
    Blue,
    Red,
}

impl InkColor {
    /// Pure RGB ink value.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Black => [0x00, 0x00, 0x00],
            Self::Blue => [0x00, 0x00, 0xFF],
            Self::Red => [0xFF, 0x00, 0x00],
        }
    }

    /// Softer ink used for typed signatures (slate, royal blue, crimson).
    pub fn typed_rgb(&self) -> [u8; 3] {
        match self {
            Self::Black => [0x0f, 0x17, 0x2a],
            Self::Blue => [0x25, 0x63, 0xeb],
            Self::Red => [0xdc, 0x26, 0x26],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "black" => Some(Self::Black),
            "blue" => Some(Self::Blue),
            "red" => Some(Self::Red),
            _ => None,
        }
    }
}

/// Filled-in content of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// PNG-encoded ink image (signature / initials).
    Image(Vec<u8>),
    /// Plain text (text fields, stamped dates).
    Text(String),
}

/// A positioned, typed overlay element placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub kind: FieldKind,
    pub position: PagePoint,
    pub extent: PageExtent,
    pub label: String,
    pub value: Option<FieldValue>,
    pub ink_color: InkColor,
}

impl Field {
    /// A new field with the kind's default label, extent, and position.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            id: FieldId::new(),
            kind,
            position: DEFAULT_FIELD_POSITION,
            extent: kind.default_extent(),
            label: kind.default_label().to_string(),
            value: None,
            ink_color: InkColor::Black,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }
}

/// Which gestures the pointer performs on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Select,
    Pan,
}

/// Supported upload types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Png,
    Jpeg,
    Webp,
    /// Any other raster format the image decoder recognises (GIF, BMP, TIFF, ...).
    OtherImage,
    /// Word processor formats: accepted, opened without a preview.
    WordProcessor,
}

impl DocumentType {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::OtherImage => "image/*",
            Self::WordProcessor => "application/octet-stream",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Webp | Self::OtherImage)
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "doc" | "docx" | "odt" => Some(Self::WordProcessor),
            _ => None,
        }
    }

    /// Infer document type from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

/// A file handed over by the upload flow.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub document_type: Option<DocumentType>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Build an upload, inferring its type from the file name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let document_type = DocumentType::from_file_name(&name);
        Self {
            name,
            document_type,
            bytes,
        }
    }
}

/// Orientation of the exported page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Natural pixel size of the paper element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_px: u32,
    pub height_px: u32,
}

impl PageSize {
    pub const fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }

    /// Pixel count of this page rendered at `multiplier`, or `None` when it
    /// overflows.
    pub fn raster_pixels(&self, multiplier: u32) -> Option<u64> {
        let width = u64::from(self.width_px).checked_mul(u64::from(multiplier))?;
        let height = u64::from(self.height_px).checked_mul(u64::from(multiplier))?;
        width.checked_mul(height)
    }

    pub fn orientation(&self) -> Orientation {
        if self.width_px > self.height_px {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// A rendered page raster used as the canvas background.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    /// Encoded image bytes (PNG or JPEG).
    pub bytes: Vec<u8>,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
}

impl PageImage {
    /// Natural on-screen size of this page when laid out at `paper_width`.
    ///
    /// The paper keeps a fixed width and takes its height from the image's
    /// aspect ratio.
    pub fn natural_size(&self, paper_width: u32) -> PageSize {
        if self.width == 0 {
            return PageSize::new(paper_width, paper_width);
        }
        let height = (self.height as f64 * paper_width as f64 / self.width as f64).round();
        PageSize::new(paper_width, (height as u32).max(1))
    }
}

/// Text stamped into a date field, e.g. `Oct 14, 2026`.
pub fn signing_date_text(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Name of the exported artifact for a source document name.
///
/// `Contract.v2.pdf` becomes `Signed_Contract.v2.pdf`.
pub fn export_file_name(document_name: &str) -> String {
    let trimmed = document_name.trim();
    let base = match trimmed.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => trimmed,
    };
    let base = if base.is_empty() { "Untitled" } else { base };
    format!("Signed_{base}.pdf")
}
