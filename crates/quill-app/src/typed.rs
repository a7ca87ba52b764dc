// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `quill type`: render a typed signature to PNG.

use std::path::PathBuf;

use quill_core::error::{QuillError, Result};
use quill_core::{EditorConfig, InkColor};
use quill_document::{GlyphFont, SignatureSurface, TypedSignature};
use tracing::{info, instrument};

use crate::cli::TypeArgs;

#[instrument(skip_all, fields(font = %args.font.display()))]
pub fn run(args: &TypeArgs, config: &EditorConfig) -> Result<PathBuf> {
    let ink = InkColor::from_name(&args.color)
        .ok_or_else(|| QuillError::ConfigInvalid(format!("unknown ink colour '{}'", args.color)))?;
    let font = GlyphFont::open(&args.font)?;

    let mut typed = TypedSignature::new(font, config);
    typed.set_ink(ink);
    typed.set_name(args.name.as_str());
    let png = typed.export_png()?;

    std::fs::write(&args.out, &png)?;
    info!(
        path = %args.out.display(),
        font_px = typed.font_size(),
        bytes_len = png.len(),
        "Typed signature written"
    );
    Ok(args.out.clone())
}
