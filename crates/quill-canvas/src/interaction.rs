// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interaction controller: the pointer-driven state machine behind dragging,
// resizing and panning.
//
// The controller owns no fields. It holds ids and start snapshots, mutates
// the registry and view it is handed, and reports what changed as a list of
// effects for the host to react to.

use quill_core::geometry::to_percent;
use quill_core::{
    FieldId, FieldKind, PageExtent, PagePoint, PaperRect, ScreenDelta, ScreenPoint, ToolMode,
};
use tracing::{debug, instrument};

use crate::registry::FieldRegistry;
use crate::view::View;

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    FieldBody(FieldId),
    ResizeHandle(FieldId),
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { target: PointerTarget, at: ScreenPoint },
    Move { at: ScreenPoint },
    Up,
    Leave,
}

/// Observable outcome of handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SelectionChanged(Option<FieldId>),
    FieldMoved { id: FieldId, position: PagePoint },
    FieldResized { id: FieldId, extent: PageExtent },
    Panned(ScreenDelta),
    /// The host should show the signature pad for this field.
    OpenCapture(FieldId),
    SessionEnded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub field_id: FieldId,
    pub pointer_start: ScreenPoint,
    pub start_position: PagePoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub field_id: FieldId,
    pub pointer_start: ScreenPoint,
    pub start_extent: PageExtent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSession {
    pub pointer_start: ScreenPoint,
    pub pan_start: ScreenDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
    Panning(PanSession),
}

impl Interaction {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    state: Interaction,
    tool: ToolMode,
    auto_open_capture: bool,
}

impl InteractionController {
    pub fn new(auto_open_capture: bool) -> Self {
        Self {
            state: Interaction::Idle,
            tool: ToolMode::Select,
            auto_open_capture,
        }
    }

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    /// Switch tool mode. An active gesture is terminated.
    pub fn set_tool(&mut self, tool: ToolMode) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.state.is_active() {
            self.state = Interaction::Idle;
            effects.push(Effect::SessionEnded);
        }
        if self.tool != tool {
            debug!(?tool, "Tool mode changed");
        }
        self.tool = tool;
        effects
    }

    /// Drop any active gesture without applying further movement.
    pub fn cancel(&mut self) -> Vec<Effect> {
        if self.state.is_active() {
            self.state = Interaction::Idle;
            vec![Effect::SessionEnded]
        } else {
            Vec::new()
        }
    }

    #[instrument(skip_all, fields(event = ?event))]
    pub fn handle(
        &mut self,
        event: PointerEvent,
        registry: &mut FieldRegistry,
        view: &mut View,
        paper: &PaperRect,
    ) -> Vec<Effect> {
        match event {
            PointerEvent::Down { target, at } => self.pointer_down(target, at, registry, view),
            PointerEvent::Move { at } => self.pointer_move(at, registry, view, paper),
            PointerEvent::Up | PointerEvent::Leave => self.cancel(),
        }
    }

    fn pointer_down(
        &mut self,
        target: PointerTarget,
        at: ScreenPoint,
        registry: &mut FieldRegistry,
        view: &View,
    ) -> Vec<Effect> {
        if self.state.is_active() {
            debug!("Pointer down ignored during active gesture");
            return Vec::new();
        }

        let mut effects = Vec::new();
        match (self.tool, target) {
            (ToolMode::Pan, _) => {
                self.state = Interaction::Panning(PanSession {
                    pointer_start: at,
                    pan_start: view.pan(),
                });
            }
            (ToolMode::Select, PointerTarget::Background) => {
                if registry.selected().is_some() {
                    registry.select(None);
                    effects.push(Effect::SelectionChanged(None));
                }
            }
            (ToolMode::Select, PointerTarget::FieldBody(id)) => {
                let Some(field) = registry.get(id) else {
                    return effects;
                };
                self.state = Interaction::Dragging(DragSession {
                    field_id: id,
                    pointer_start: at,
                    start_position: field.position,
                });
                self.select(id, registry, &mut effects);
            }
            (ToolMode::Select, PointerTarget::ResizeHandle(id)) => {
                let Some(field) = registry.get(id) else {
                    return effects;
                };
                self.state = Interaction::Resizing(ResizeSession {
                    field_id: id,
                    pointer_start: at,
                    start_extent: field.extent,
                });
                self.select(id, registry, &mut effects);
            }
        }
        effects
    }

    fn pointer_move(
        &mut self,
        at: ScreenPoint,
        registry: &mut FieldRegistry,
        view: &mut View,
        paper: &PaperRect,
    ) -> Vec<Effect> {
        match self.state {
            Interaction::Idle => Vec::new(),
            Interaction::Dragging(session) => {
                let delta = to_percent(at - session.pointer_start, paper, view.zoom());
                match registry.set_position(session.field_id, session.start_position + delta) {
                    Some(position) => vec![Effect::FieldMoved {
                        id: session.field_id,
                        position,
                    }],
                    None => self.cancel(),
                }
            }
            Interaction::Resizing(session) => {
                let delta = to_percent(at - session.pointer_start, paper, view.zoom());
                match registry.set_extent_anchored(session.field_id, session.start_extent + delta) {
                    Some(extent) => vec![Effect::FieldResized {
                        id: session.field_id,
                        extent,
                    }],
                    None => self.cancel(),
                }
            }
            Interaction::Panning(session) => {
                view.set_pan(session.pan_start);
                view.pan_by(at - session.pointer_start);
                vec![Effect::Panned(view.pan())]
            }
        }
    }

    fn select(&self, id: FieldId, registry: &mut FieldRegistry, effects: &mut Vec<Effect>) {
        if registry.selected() == Some(id) {
            return;
        }
        registry.select(Some(id));
        effects.push(Effect::SelectionChanged(Some(id)));
        if let Some(effect) = self.capture_prompt(registry, id) {
            effects.push(effect);
        }
    }

    /// `OpenCapture` for an unfilled signature field, when auto-open is on.
    pub fn capture_prompt(&self, registry: &FieldRegistry, id: FieldId) -> Option<Effect> {
        let field = registry.get(id)?;
        let wants_ink = field.kind == FieldKind::Signature && !field.is_filled();
        (self.auto_open_capture && self.tool == ToolMode::Select && wants_ink)
            .then_some(Effect::OpenCapture(id))
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(true)
    }
}
