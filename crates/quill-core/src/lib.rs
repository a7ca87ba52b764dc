// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quill: Core types, coordinate model, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod human_errors;
pub mod types;

pub use config::{DEFAULT_MAX_PAGE_PIXELS, EditorConfig};
pub use error::QuillError;
pub use geometry::*;
pub use types::*;
