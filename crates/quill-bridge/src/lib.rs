// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quill: collaborator seams.
//
// The canvas engine depends only on the traits defined here. Page rendering,
// the AI suggestion service, the settle barrier, rasterization, and document
// packaging are all injected.

pub mod stub;
pub mod suggestion;
pub mod traits;

pub use suggestion::parse_suggestions;
pub use traits::*;
