// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line definition.
//
//   quill flatten --page contract.pdf --fields fields.json --out signed/
//   quill flatten --fields fields.json --out signed/ --name "Blank form"
//   quill type --name "Ada Lovelace" --font Caveat.ttf --color blue --out sig.png

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Quill headless signer.
#[derive(Parser, Debug)]
#[command(
    name = "quill",
    version,
    about = "Place signature, date, initials and text fields on a page and flatten them to PDF"
)]
pub struct Cli {
    /// Editor configuration (JSON). Defaults apply when omitted or unreadable.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Composite fields onto a page and write a single-page PDF.
    Flatten(FlattenArgs),
    /// Render a typed signature to a transparent PNG.
    Type(TypeArgs),
}

#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// Page to sign (PNG, JPEG, WEBP or PDF). A blank page is used when omitted.
    #[arg(long, value_name = "FILE")]
    pub page: Option<PathBuf>,

    /// JSON array of field placements.
    #[arg(long, value_name = "FILE")]
    pub fields: Option<PathBuf>,

    /// Canned suggestion-service response (JSON) to import before placing fields.
    #[arg(long, value_name = "FILE")]
    pub suggestions: Option<PathBuf>,

    /// Document description handed to the suggestion service.
    #[arg(long, requires = "suggestions")]
    pub describe: Option<String>,

    /// Directory the signed PDF is written to.
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Font for labels and text values. Text is left out without one.
    #[arg(long, value_name = "TTF")]
    pub font: Option<PathBuf>,

    /// Document name used for the output file. Defaults to the page file name.
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct TypeArgs {
    /// Name to render.
    #[arg(long)]
    pub name: String,

    /// Handwriting font (TTF/OTF).
    #[arg(long, value_name = "TTF")]
    pub font: PathBuf,

    /// Ink colour: black, blue or red.
    #[arg(long, default_value = "black")]
    pub color: String,

    /// Output PNG path.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,
}
