// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `quill flatten`: open a page, place fields from a JSON file, optionally
// import canned suggestions, and export the signed PDF.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use quill_bridge::stub::{CannedSuggester, ImmediateSettle, StubPdfRasterizer};
use quill_bridge::{ExportArtifact, PageRasterizer};
use quill_canvas::{Canvas, ExportPipeline, SessionStore, SharedCanvas, UploadFlow, suggest_and_import};
use quill_core::error::{QuillError, Result};
use quill_core::{EditorConfig, Field, FieldKind, InkColor, PageExtent, PagePoint, UploadedFile};
use quill_document::{Compositor, GlyphFont, PdfWriter, RasterPageRenderer};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::cli::FlattenArgs;

/// One entry of the `--fields` file.
///
/// ```json
/// [
///   { "type": "signature", "x": 10, "y": 80, "image": "sig.png", "color": "blue" },
///   { "type": "date", "x": 60, "y": 82, "date": "today" },
///   { "type": "text", "label": "Company", "text": "Acme Ltd" }
/// ]
/// ```
///
/// Geometry is in page percent and defaults to the kind's toolbox defaults.
/// `image` paths are resolved against the fields file's directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub text: Option<String>,
    /// `"today"` or an ISO date (`2026-10-14`).
    pub date: Option<String>,
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub color: InkColor,
}

pub fn parse_fields(json: &str) -> Result<Vec<FieldEntry>> {
    Ok(serde_json::from_str(json)?)
}

fn signing_date(value: &str) -> Result<NaiveDate> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| QuillError::ConfigInvalid(format!("bad date '{value}': {e}")))
}

/// Place every entry on the canvas and fill in the values it carries.
pub fn place_fields(canvas: &mut Canvas, entries: &[FieldEntry], base_dir: &Path) -> Result<usize> {
    for (index, entry) in entries.iter().enumerate() {
        let mut field = Field::new(entry.kind);
        if let Some(label) = &entry.label {
            field.label = label.clone();
        }
        field.position = PagePoint::new(
            entry.x.unwrap_or(field.position.x),
            entry.y.unwrap_or(field.position.y),
        );
        field.extent = PageExtent::new(
            entry.width.unwrap_or(field.extent.width),
            entry.height.unwrap_or(field.extent.height),
        );
        field.ink_color = entry.color;
        let id = canvas.insert_field(field);

        if let Some(text) = &entry.text {
            if !canvas.set_text(id, text) {
                warn!(index, kind = ?entry.kind, "Text ignored for image field");
            }
        }
        if let Some(date) = &entry.date {
            if !canvas.stamp_date(id, signing_date(date)?) {
                warn!(index, kind = ?entry.kind, "Date ignored for non-date field");
            }
        }
        if let Some(image) = &entry.image {
            let bytes = std::fs::read(base_dir.join(image))?;
            if !canvas.upload_signature_image(id, &bytes)? {
                warn!(index, kind = ?entry.kind, "Image ignored for text field");
            }
        }
    }
    info!(placed = entries.len(), "Fields placed");
    Ok(entries.len())
}

fn open_canvas(args: &FlattenArgs, config: &EditorConfig, store: &mut SessionStore) -> Result<Canvas> {
    let Some(path) = &args.page else {
        let name = args.name.clone().unwrap_or_else(|| "Untitled".to_string());
        return Ok(Canvas::new(config.clone(), name, None));
    };

    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let upload = UploadedFile::new(file_name, bytes);

    let renderer = RasterPageRenderer::new(StubPdfRasterizer, config);
    let mut prepared = UploadFlow::new(&renderer, store).prepare(&upload)?;
    if let Some(name) = &args.name {
        prepared.name = name.clone();
    }
    Ok(Canvas::from_session(config.clone(), store, &prepared))
}

async fn export_with<R: PageRasterizer>(
    canvas: &SharedCanvas,
    rasterizer: R,
    title: &str,
) -> Result<ExportArtifact> {
    let mut writer = PdfWriter::new();
    writer.set_title(title);
    ExportPipeline::new(rasterizer, writer, ImmediateSettle)
        .export(canvas)
        .await
}

#[instrument(skip_all, fields(out = %args.out.display()))]
pub async fn run(args: &FlattenArgs, config: &EditorConfig) -> Result<PathBuf> {
    let mut store = SessionStore::new();
    let mut canvas = open_canvas(args, config, &mut store)?;

    if let Some(path) = &args.fields {
        let entries = parse_fields(&std::fs::read_to_string(path)?)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        place_fields(&mut canvas, &entries, base_dir)?;
    }

    let title = canvas.document_name().to_string();
    let canvas = canvas.into_shared();

    if let Some(path) = &args.suggestions {
        let suggester = CannedSuggester::new(std::fs::read_to_string(path)?);
        let description = args.describe.as_deref().unwrap_or("document");
        suggest_and_import(&canvas, &suggester, description).await;
    }

    let artifact = match &args.font {
        Some(font) => export_with(&canvas, Compositor::new(GlyphFont::open(font)?), &title).await?,
        None => {
            warn!("No --font given; labels and text values are left out");
            export_with(&canvas, Compositor::<GlyphFont>::image_only(), &title).await?
        }
    };
    store.end_session();

    std::fs::create_dir_all(&args.out)?;
    let path = args.out.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)?;
    info!(
        path = %path.display(),
        width_px = artifact.width_px,
        height_px = artifact.height_px,
        "Signed document written"
    );
    Ok(path)
}
