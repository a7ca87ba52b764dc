// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: decoding, fitting, ink tinting, and PNG encoding.

pub mod processor;

pub use processor::{ImageProcessor, encode_png, normalize_to_png, png_data_url, tint_ink};
