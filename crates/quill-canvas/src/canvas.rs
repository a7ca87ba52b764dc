// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canvas: one editing session over a single page. Holds the page raster, its
// fields, the view, the pointer controller and the open capture request.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use quill_bridge::PageScene;
use quill_core::error::{QuillError, Result};
use quill_core::geometry::to_screen;
use quill_core::{
    EditorConfig, Field, FieldId, FieldKind, FieldValue, PageImage, PagePoint, PageSize,
    PaperRect, ScreenPoint, ToolMode, ViewTransform, signing_date_text,
};
use quill_document::image::normalize_to_png;
use tracing::{debug, info, instrument, warn};

use crate::interaction::{Effect, Interaction, InteractionController, PointerEvent, PointerTarget};
use crate::registry::{FieldRegistry, FieldUpdate};
use crate::session::SessionStore;
use crate::upload::PreparedDocument;
use crate::view::View;

/// Side of the square resize handle at a field's bottom-right corner, in
/// screen pixels.
pub const RESIZE_HANDLE_PX: f64 = 12.0;

/// A field's on-screen box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub origin: ScreenPoint,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x <= self.origin.x + self.width
            && point.y <= self.origin.y + self.height
    }
}

/// A canvas shared between the host and async operations. Locks are only
/// held for synchronous sections, never across an await.
pub type SharedCanvas = Arc<Mutex<Canvas>>;

/// Lock a shared canvas. A panic while it was held leaves the data usable.
pub fn lock(canvas: &SharedCanvas) -> MutexGuard<'_, Canvas> {
    canvas.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Canvas {
    config: EditorConfig,
    registry: FieldRegistry,
    view: View,
    controller: InteractionController,
    page: Option<PageImage>,
    natural: PageSize,
    document_name: String,
    paper_origin: ScreenPoint,
    capture: Option<FieldId>,
    exporting: bool,
}

impl Canvas {
    /// Open a canvas over `page`. Without a page the paper is blank at the
    /// configured width and height.
    pub fn new(config: EditorConfig, document_name: impl Into<String>, page: Option<PageImage>) -> Self {
        let natural = match &page {
            Some(page) => page.natural_size(config.paper_width_px),
            None => PageSize::new(config.paper_width_px, config.blank_page_height_px),
        };
        let document_name = document_name.into();
        info!(
            document = %document_name,
            width = natural.width_px,
            height = natural.height_px,
            has_page = page.is_some(),
            "Canvas opened"
        );
        Self {
            registry: FieldRegistry::new(config.placement_limits()),
            view: View::new(&config),
            controller: InteractionController::new(config.auto_open_capture),
            config,
            page,
            natural,
            document_name,
            paper_origin: ScreenPoint::default(),
            capture: None,
            exporting: false,
        }
    }

    pub fn into_shared(self) -> SharedCanvas {
        Arc::new(Mutex::new(self))
    }

    /// Open a canvas for a document prepared by the upload flow.
    pub fn from_session(config: EditorConfig, store: &SessionStore, document: &PreparedDocument) -> Self {
        let page = store.get(document.id).cloned();
        if document.has_preview && page.is_none() {
            warn!(document_id = %document.id, "Preview missing from session store");
        }
        Self::new(config, document.name.clone(), page)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn page(&self) -> Option<&PageImage> {
        self.page.as_ref()
    }

    pub fn natural_size(&self) -> PageSize {
        self.natural
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn interaction(&self) -> &Interaction {
        self.controller.state()
    }

    pub fn tool(&self) -> ToolMode {
        self.controller.tool()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Where the paper's top-left corner sits on screen at identity view.
    pub fn set_paper_origin(&mut self, origin: ScreenPoint) {
        self.paper_origin = origin;
    }

    pub fn paper_rect(&self) -> PaperRect {
        PaperRect::new(
            self.paper_origin,
            self.natural.width_px as f64,
            self.natural.height_px as f64,
        )
    }

    // -- Pointer ------------------------------------------------------------

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Effect> {
        if self.exporting {
            debug!("Pointer event ignored during export");
            return Vec::new();
        }
        let paper = self.paper_rect();
        let effects = self
            .controller
            .handle(event, &mut self.registry, &mut self.view, &paper);
        self.note_capture(&effects);
        effects
    }

    /// Resolve a screen point to the topmost field part under it.
    pub fn hit_test(&self, at: ScreenPoint) -> PointerTarget {
        for field in self.registry.iter().rev() {
            let Some(rect) = self.field_screen_rect(field.id) else {
                continue;
            };
            if !rect.contains(at) {
                continue;
            }
            let corner = ScreenPoint::new(rect.origin.x + rect.width, rect.origin.y + rect.height);
            if corner.x - at.x <= RESIZE_HANDLE_PX && corner.y - at.y <= RESIZE_HANDLE_PX {
                return PointerTarget::ResizeHandle(field.id);
            }
            return PointerTarget::FieldBody(field.id);
        }
        PointerTarget::Background
    }

    pub fn field_screen_rect(&self, id: FieldId) -> Option<ScreenRect> {
        let field = self.registry.get(id)?;
        let view = self.view.transform();
        let paper = self.paper_rect();
        let origin = to_screen(field.position, &view, &paper);
        let far = PagePoint::new(
            field.position.x + field.extent.width,
            field.position.y + field.extent.height,
        );
        let corner = to_screen(far, &view, &paper);
        Some(ScreenRect {
            origin,
            width: corner.x - origin.x,
            height: corner.y - origin.y,
        })
    }

    // -- Fields -------------------------------------------------------------

    /// Add a field from the toolbox: defaults, selected, tool back to select.
    ///
    /// Refused with `ExportInProgress` while an export holds the canvas.
    pub fn add_field(&mut self, kind: FieldKind) -> Result<(FieldId, Vec<Effect>)> {
        if self.exporting {
            debug!(?kind, "Add field ignored during export");
            return Err(QuillError::ExportInProgress);
        }
        let mut effects = self.controller.set_tool(ToolMode::Select);
        let id = self.registry.add(kind);
        effects.push(Effect::SelectionChanged(Some(id)));
        if let Some(prompt) = self.controller.capture_prompt(&self.registry, id) {
            effects.push(prompt);
        }
        self.note_capture(&effects);
        Ok((id, effects))
    }

    /// Place a fully specified field without touching the selection.
    pub fn insert_field(&mut self, field: Field) -> FieldId {
        self.registry.insert(field)
    }

    pub fn remove_field(&mut self, id: FieldId) -> bool {
        if self.capture == Some(id) {
            self.capture = None;
        }
        self.registry.remove(id)
    }

    pub fn update_field(&mut self, id: FieldId, update: FieldUpdate) -> bool {
        self.registry.update(id, update)
    }

    /// Change the selection. Ignored while an export holds the canvas.
    pub fn select(&mut self, id: Option<FieldId>) -> Vec<Effect> {
        if self.exporting {
            debug!("Selection change ignored during export");
            return Vec::new();
        }
        if self.registry.selected() == id || !self.registry.select(id) {
            return Vec::new();
        }
        let mut effects = vec![Effect::SelectionChanged(id)];
        if let Some(prompt) = id.and_then(|id| self.controller.capture_prompt(&self.registry, id)) {
            effects.push(prompt);
        }
        self.note_capture(&effects);
        effects
    }

    pub fn set_tool(&mut self, tool: ToolMode) -> Vec<Effect> {
        self.controller.set_tool(tool)
    }

    /// Stamp `date` into a date field.
    pub fn stamp_date(&mut self, id: FieldId, date: NaiveDate) -> bool {
        if self.registry.get(id).map(|f| f.kind) != Some(FieldKind::Date) {
            return false;
        }
        let text = signing_date_text(date);
        debug!(field_id = %id, %text, "Date stamped");
        self.registry.update(id, FieldUpdate::new().value(FieldValue::Text(text)))
    }

    /// Set the value of a text or date field. Blank text clears it.
    pub fn set_text(&mut self, id: FieldId, text: &str) -> bool {
        match self.registry.get(id) {
            Some(field) if !field.kind.takes_image() => {}
            _ => return false,
        }
        let update = if text.trim().is_empty() {
            FieldUpdate::new().clear_value()
        } else {
            FieldUpdate::new().value(FieldValue::Text(text.to_string()))
        };
        self.registry.update(id, update)
    }

    // -- View ---------------------------------------------------------------

    pub fn zoom_in(&mut self) -> f64 {
        self.view.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.view.zoom_out()
    }

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.view.set_zoom(zoom)
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    // -- Capture ------------------------------------------------------------

    /// The field the signature pad is currently open for.
    pub fn capture_target(&self) -> Option<FieldId> {
        self.capture
    }

    /// Open the signature pad for an image-taking field.
    pub fn open_capture(&mut self, id: FieldId) -> bool {
        match self.registry.get(id) {
            Some(field) if field.kind.takes_image() => {
                self.capture = Some(id);
                debug!(field_id = %id, "Capture opened");
                true
            }
            _ => false,
        }
    }

    /// Assign a captured PNG to the field the pad was opened for and close it.
    #[instrument(skip_all, fields(png_len = png.len()))]
    pub fn save_capture(&mut self, png: Vec<u8>) -> Result<FieldId> {
        let id = self.capture.ok_or(QuillError::NoCaptureOpen)?;
        if png.is_empty() {
            return Err(QuillError::EmptyCapture);
        }
        self.capture = None;
        if !self.registry.update(id, FieldUpdate::new().value(FieldValue::Image(png))) {
            warn!(field_id = %id, "Capture target removed before save");
            return Err(QuillError::NoCaptureOpen);
        }
        info!(field_id = %id, "Signature captured");
        Ok(id)
    }

    /// Close the signature pad without changing any field.
    pub fn cancel_capture(&mut self) {
        self.capture = None;
    }

    /// Use an uploaded image as the value of a signature or initials field.
    /// The image is re-encoded as PNG.
    #[instrument(skip(self, bytes), fields(field_id = %id, bytes_len = bytes.len()))]
    pub fn upload_signature_image(&mut self, id: FieldId, bytes: &[u8]) -> Result<bool> {
        match self.registry.get(id) {
            Some(field) if field.kind.takes_image() => {}
            _ => return Ok(false),
        }
        let png = normalize_to_png(bytes)?;
        if self.capture == Some(id) {
            self.capture = None;
        }
        Ok(self.registry.update(id, FieldUpdate::new().value(FieldValue::Image(png))))
    }

    // -- Rendering ----------------------------------------------------------

    /// Everything a rasterizer needs to draw the page as it currently looks.
    pub fn scene(&self) -> PageScene {
        PageScene {
            page: self.page.clone(),
            size: self.natural,
            fields: self.registry.fields().to_vec(),
            selected: self.registry.selected(),
            caption: self.page.is_none().then(|| self.document_name.clone()),
        }
    }

    // -- Export support -----------------------------------------------------

    pub(crate) fn begin_export(&mut self) -> Result<ExportSnapshot> {
        if self.exporting {
            return Err(QuillError::ExportInProgress);
        }
        if self.registry.is_empty() {
            return Err(QuillError::NothingToExport);
        }
        self.exporting = true;
        let snapshot = ExportSnapshot {
            selected: self.registry.selected(),
            view: self.view.transform(),
            epoch: 0,
        };
        self.controller.cancel();
        self.registry.select(None);
        Ok(ExportSnapshot {
            epoch: self.view.normalize(),
            ..snapshot
        })
    }

    pub(crate) fn end_export(&mut self, snapshot: &ExportSnapshot) {
        let selected = snapshot.selected.filter(|id| self.registry.contains(*id));
        if selected != snapshot.selected {
            debug!("Selected field removed during export");
        }
        self.registry.select(selected);
        self.view.restore(snapshot.view);
        self.exporting = false;
    }

    fn note_capture(&mut self, effects: &[Effect]) {
        for effect in effects {
            if let Effect::OpenCapture(id) = effect {
                self.capture = Some(*id);
            }
        }
    }
}

/// State put aside while an export normalizes the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ExportSnapshot {
    pub selected: Option<FieldId>,
    pub view: ViewTransform,
    pub epoch: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use quill_core::{PageExtent, ScreenDelta};
    use quill_document::image::encode_png;

    fn canvas() -> Canvas {
        Canvas::new(EditorConfig::default(), "NDA.pdf", None)
    }

    #[test]
    fn blank_canvas_uses_configured_paper() {
        let canvas = canvas();
        assert_eq!(canvas.natural_size(), PageSize::new(816, 1056));
        assert_eq!(canvas.scene().caption.as_deref(), Some("NDA.pdf"));
    }

    #[test]
    fn page_sets_natural_size() {
        let page = PageImage {
            bytes: Vec::new(),
            width: 1632,
            height: 1056,
        };
        let canvas = Canvas::new(EditorConfig::default(), "wide.png", Some(page));
        assert_eq!(canvas.natural_size(), PageSize::new(816, 528));
        assert!(canvas.scene().caption.is_none());
    }

    #[test]
    fn add_and_drag_clamps_at_right_edge() {
        let mut canvas = canvas();
        let (id, _) = canvas.add_field(FieldKind::Signature).unwrap();
        canvas.cancel_capture();

        let start = canvas.field_screen_rect(id).unwrap().origin;
        canvas.handle_pointer(PointerEvent::Down {
            target: PointerTarget::FieldBody(id),
            at: start,
        });
        // Half the paper width to the right.
        canvas.handle_pointer(PointerEvent::Move {
            at: start + ScreenDelta::new(408.0, 0.0),
        });
        canvas.handle_pointer(PointerEvent::Up);
        assert_eq!(canvas.registry().get(id).unwrap().position, PagePoint::new(72.0, 35.0));
    }

    #[test]
    fn adding_signature_opens_capture() {
        let mut canvas = canvas();
        canvas.set_tool(ToolMode::Pan);
        let (id, effects) = canvas.add_field(FieldKind::Signature).unwrap();
        assert_eq!(canvas.tool(), ToolMode::Select);
        assert!(effects.contains(&Effect::OpenCapture(id)));
        assert_eq!(canvas.capture_target(), Some(id));

        let (_, effects) = canvas.add_field(FieldKind::Date).unwrap();
        assert!(!effects.iter().any(|e| matches!(e, Effect::OpenCapture(_))));
    }

    #[test]
    fn auto_open_can_be_disabled() {
        let config = EditorConfig {
            auto_open_capture: false,
            ..EditorConfig::default()
        };
        let mut canvas = Canvas::new(config, "a.png", None);
        let (_, effects) = canvas.add_field(FieldKind::Signature).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(canvas.capture_target(), None);
    }

    #[test]
    fn capture_save_and_cancel() {
        let mut canvas = canvas();
        assert!(matches!(canvas.save_capture(vec![1]), Err(QuillError::NoCaptureOpen)));

        let (id, _) = canvas.add_field(FieldKind::Signature).unwrap();
        assert!(matches!(canvas.save_capture(Vec::new()), Err(QuillError::EmptyCapture)));
        assert_eq!(canvas.save_capture(vec![1, 2]).unwrap(), id);
        assert_eq!(
            canvas.registry().get(id).unwrap().value,
            Some(FieldValue::Image(vec![1, 2]))
        );
        assert_eq!(canvas.capture_target(), None);

        assert!(canvas.open_capture(id));
        canvas.cancel_capture();
        assert_eq!(
            canvas.registry().get(id).unwrap().value,
            Some(FieldValue::Image(vec![1, 2]))
        );
    }

    #[test]
    fn capture_only_for_image_fields() {
        let mut canvas = canvas();
        let (id, _) = canvas.add_field(FieldKind::Text).unwrap();
        assert!(!canvas.open_capture(id));
    }

    #[test]
    fn uploaded_signature_is_normalised_to_png() {
        let mut canvas = canvas();
        let (id, _) = canvas.add_field(FieldKind::Initials).unwrap();
        let png = encode_png(&RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))).unwrap();
        assert!(canvas.upload_signature_image(id, &png).unwrap());
        match &canvas.registry().get(id).unwrap().value {
            Some(FieldValue::Image(bytes)) => assert_eq!(&bytes[1..4], b"PNG"),
            other => panic!("unexpected value {other:?}"),
        }
        assert!(canvas.upload_signature_image(id, b"garbage").is_err());
    }

    #[test]
    fn date_stamp_and_text_entry() {
        let mut canvas = canvas();
        let (date, _) = canvas.add_field(FieldKind::Date).unwrap();
        let (text, _) = canvas.add_field(FieldKind::Text).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();

        assert!(canvas.stamp_date(date, day));
        assert!(!canvas.stamp_date(text, day));
        assert_eq!(
            canvas.registry().get(date).unwrap().value,
            Some(FieldValue::Text("Oct 14, 2026".into()))
        );

        assert!(canvas.set_text(text, "Acme Ltd"));
        assert!(canvas.set_text(text, "  "));
        assert!(!canvas.registry().get(text).unwrap().is_filled());
    }

    #[test]
    fn hit_test_finds_handle_body_and_background() {
        let mut canvas = canvas();
        let mut field = Field::new(FieldKind::Text);
        field.position = PagePoint::new(10.0, 10.0);
        field.extent = PageExtent::new(25.0, 5.0);
        let id = canvas.insert_field(field);
        canvas.set_zoom(2.0);

        // Box spans x 163.2..571.2, y 211.2..316.8 at zoom 2.
        assert_eq!(canvas.hit_test(ScreenPoint::new(200.0, 250.0)), PointerTarget::FieldBody(id));
        assert_eq!(canvas.hit_test(ScreenPoint::new(566.0, 312.0)), PointerTarget::ResizeHandle(id));
        assert_eq!(canvas.hit_test(ScreenPoint::new(10.0, 10.0)), PointerTarget::Background);
    }

    #[test]
    fn removing_capture_target_closes_capture() {
        let mut canvas = canvas();
        let (id, _) = canvas.add_field(FieldKind::Signature).unwrap();
        assert!(canvas.remove_field(id));
        assert_eq!(canvas.capture_target(), None);
    }

    #[test]
    fn export_bracket_restores_state() {
        let mut canvas = canvas();
        let (id, _) = canvas.add_field(FieldKind::Text).unwrap();
        canvas.set_zoom(1.7);

        let snapshot = canvas.begin_export().unwrap();
        assert_eq!(snapshot.epoch, 1);
        assert!(canvas.view().transform().is_identity());
        assert_eq!(canvas.registry().selected(), None);
        assert!(matches!(canvas.begin_export(), Err(QuillError::ExportInProgress)));
        assert!(canvas.handle_pointer(PointerEvent::Up).is_empty());

        canvas.end_export(&snapshot);
        assert_eq!(canvas.view().zoom(), 1.7);
        assert_eq!(canvas.registry().selected(), Some(id));
        assert!(!canvas.is_exporting());
    }

    #[test]
    fn hit_test_prefers_topmost_field() {
        let mut canvas = canvas();
        let mut lower = Field::new(FieldKind::Signature);
        lower.position = PagePoint::new(10.0, 10.0);
        let lower = canvas.insert_field(lower);
        let mut upper = Field::new(FieldKind::Text);
        upper.position = PagePoint::new(20.0, 12.0);
        let upper = canvas.insert_field(upper);

        // Inside both boxes: the later field is drawn on top.
        assert_eq!(canvas.hit_test(ScreenPoint::new(200.0, 140.0)), PointerTarget::FieldBody(upper));
        // Only inside the lower one.
        assert_eq!(canvas.hit_test(ScreenPoint::new(90.0, 110.0)), PointerTarget::FieldBody(lower));
    }

    #[test]
    fn add_and_select_are_refused_during_export() {
        let mut canvas = canvas();
        let (first, _) = canvas.add_field(FieldKind::Text).unwrap();
        let (second, _) = canvas.add_field(FieldKind::Date).unwrap();
        let snapshot = canvas.begin_export().unwrap();

        assert!(matches!(
            canvas.add_field(FieldKind::Initials),
            Err(QuillError::ExportInProgress)
        ));
        assert!(canvas.select(Some(first)).is_empty());
        assert_eq!(canvas.registry().selected(), None);
        assert_eq!(canvas.registry().len(), 2);

        canvas.end_export(&snapshot);
        assert_eq!(canvas.registry().selected(), Some(second));
        assert_eq!(canvas.select(Some(first)), vec![Effect::SelectionChanged(Some(first))]);
    }
}
