// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Quill.

use thiserror::Error;

/// Top-level error type for all Quill operations.
#[derive(Debug, Error)]
pub enum QuillError {
    // -- Document / preview errors --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("page rendering failed: {0}")]
    RenderFailed(String),

    #[error("no page renderer available for this document type")]
    RendererUnavailable,

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("font could not be loaded: {0}")]
    FontError(String),

    // -- Signature capture --
    #[error("nothing has been drawn or typed yet")]
    EmptyCapture,

    #[error("no signature capture is open")]
    NoCaptureOpen,

    // -- Export pipeline --
    #[error("an export is already running")]
    ExportInProgress,

    #[error("there are no fields on the page to export")]
    NothingToExport,

    #[error("rasterization failed: {0}")]
    RasterizeFailed(String),

    #[error("document packaging failed: {0}")]
    PackagingFailed(String),

    #[error("view did not settle for epoch {epoch} within {waited_ms} ms")]
    SettleTimeout { epoch: u64, waited_ms: u64 },

    #[error("frame reporting stopped before epoch {epoch} was rendered")]
    SettleAborted { epoch: u64 },

    // -- Collaborators --
    #[error("field suggestion failed: {0}")]
    Suggestion(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QuillError>;
