// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// quill-canvas: The field-placement canvas engine.
//
// Owns the editing state for one page (fields, selection, zoom and pan),
// drives it from pointer events, and flattens it into an export artifact.

pub mod canvas;
pub mod export;
pub mod interaction;
pub mod registry;
pub mod session;
pub mod settle;
pub mod suggestions;
pub mod upload;
pub mod view;

pub use canvas::{Canvas, RESIZE_HANDLE_PX, ScreenRect, SharedCanvas, lock};
pub use export::ExportPipeline;
pub use interaction::{Effect, Interaction, InteractionController, PointerEvent, PointerTarget};
pub use registry::{FieldRegistry, FieldUpdate};
pub use session::{SessionStore, preview_key};
pub use settle::{DelaySettle, FrameReporter, FrameSettle};
pub use suggestions::{import_suggestions, scatter_position, suggest_and_import};
pub use upload::{PreparedDocument, UploadFlow};
pub use view::View;
