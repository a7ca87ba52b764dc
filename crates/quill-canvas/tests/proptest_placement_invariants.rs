// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Property tests: arbitrary sequences of canvas operations never leave a
// field outside the page, below the minimum size, or with a dangling
// selection.

use proptest::prelude::*;
use quill_canvas::{Canvas, FieldUpdate, PointerEvent, PointerTarget};
use quill_core::geometry::placement_is_valid;
use quill_core::{
    EditorConfig, Field, FieldId, FieldKind, PageExtent, PagePoint, ScreenPoint, ToolMode,
};

#[derive(Debug, Clone)]
enum Op {
    Add(FieldKind),
    Insert { kind: FieldKind, x: f64, y: f64, w: f64, h: f64 },
    Update { slot: usize, x: f64, y: f64, w: f64, h: f64 },
    Remove(usize),
    Select(Option<usize>),
    Drag { slot: usize, dx: f64, dy: f64 },
    Resize { slot: usize, dx: f64, dy: f64 },
    Zoom(f64),
    Tool(bool),
}

fn kind() -> impl Strategy<Value = FieldKind> {
    proptest::sample::select(FieldKind::ALL.to_vec())
}

fn coord() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -300.0f64..300.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        kind().prop_map(Op::Add),
        (kind(), coord(), coord(), coord(), coord())
            .prop_map(|(kind, x, y, w, h)| Op::Insert { kind, x, y, w, h }),
        (0usize..8, coord(), coord(), coord(), coord())
            .prop_map(|(slot, x, y, w, h)| Op::Update { slot, x, y, w, h }),
        (0usize..8).prop_map(Op::Remove),
        proptest::option::of(0usize..8).prop_map(Op::Select),
        (0usize..8, -3000.0f64..3000.0, -3000.0f64..3000.0)
            .prop_map(|(slot, dx, dy)| Op::Drag { slot, dx, dy }),
        (0usize..8, -3000.0f64..3000.0, -3000.0f64..3000.0)
            .prop_map(|(slot, dx, dy)| Op::Resize { slot, dx, dy }),
        (0.1f64..5.0).prop_map(Op::Zoom),
        any::<bool>().prop_map(Op::Tool),
    ]
}

fn slot_id(canvas: &Canvas, slot: usize) -> Option<FieldId> {
    let fields = canvas.registry().fields();
    if fields.is_empty() {
        None
    } else {
        Some(fields[slot % fields.len()].id)
    }
}

fn gesture(canvas: &mut Canvas, target: PointerTarget, dx: f64, dy: f64) {
    let at = ScreenPoint::new(400.0, 400.0);
    canvas.handle_pointer(PointerEvent::Down { target, at });
    canvas.handle_pointer(PointerEvent::Move {
        at: ScreenPoint::new(at.x + dx / 2.0, at.y + dy / 2.0),
    });
    canvas.handle_pointer(PointerEvent::Move {
        at: ScreenPoint::new(at.x + dx, at.y + dy),
    });
    canvas.handle_pointer(PointerEvent::Up);
}

fn apply(canvas: &mut Canvas, op: Op) {
    match op {
        Op::Add(kind) => {
            canvas.add_field(kind).unwrap();
        }
        Op::Insert { kind, x, y, w, h } => {
            let mut field = Field::new(kind);
            field.position = PagePoint::new(x, y);
            field.extent = PageExtent::new(w, h);
            canvas.insert_field(field);
        }
        Op::Update { slot, x, y, w, h } => {
            if let Some(id) = slot_id(canvas, slot) {
                canvas.update_field(
                    id,
                    FieldUpdate::new()
                        .position(PagePoint::new(x, y))
                        .extent(PageExtent::new(w, h)),
                );
            }
        }
        Op::Remove(slot) => {
            if let Some(id) = slot_id(canvas, slot) {
                canvas.remove_field(id);
            }
        }
        Op::Select(slot) => {
            let id = slot.and_then(|slot| slot_id(canvas, slot));
            canvas.select(id);
        }
        Op::Drag { slot, dx, dy } => {
            if let Some(id) = slot_id(canvas, slot) {
                gesture(canvas, PointerTarget::FieldBody(id), dx, dy);
            }
        }
        Op::Resize { slot, dx, dy } => {
            if let Some(id) = slot_id(canvas, slot) {
                gesture(canvas, PointerTarget::ResizeHandle(id), dx, dy);
            }
        }
        Op::Zoom(zoom) => {
            canvas.set_zoom(zoom);
        }
        Op::Tool(pan) => {
            canvas.set_tool(if pan { ToolMode::Pan } else { ToolMode::Select });
        }
    }
}

proptest! {
    #[test]
    fn every_field_stays_on_the_page(ops in proptest::collection::vec(op(), 1..60)) {
        let mut canvas = Canvas::new(EditorConfig::default(), "doc.pdf", None);
        for op in ops {
            apply(&mut canvas, op);
            let limits = *canvas.registry().limits();
            for field in canvas.registry().iter() {
                prop_assert!(
                    placement_is_valid(field.position, field.extent, &limits),
                    "{:?} / {:?}", field.position, field.extent
                );
            }
        }
    }

    #[test]
    fn selection_always_names_a_live_field(ops in proptest::collection::vec(op(), 1..60)) {
        let mut canvas = Canvas::new(EditorConfig::default(), "doc.pdf", None);
        for op in ops {
            apply(&mut canvas, op);
            if let Some(id) = canvas.registry().selected() {
                prop_assert!(canvas.registry().contains(id));
            }
        }
    }

    #[test]
    fn resize_never_moves_the_anchor(
        kind in kind(),
        x in 0.0f64..95.0,
        y in 0.0f64..98.0,
        dx in -5000.0f64..5000.0,
        dy in -5000.0f64..5000.0,
    ) {
        let mut canvas = Canvas::new(EditorConfig::default(), "doc.pdf", None);
        let mut field = Field::new(kind);
        field.position = PagePoint::new(x, y);
        let id = canvas.insert_field(field);
        let before = canvas.registry().get(id).unwrap().position;

        gesture(&mut canvas, PointerTarget::ResizeHandle(id), dx, dy);

        let after = canvas.registry().get(id).unwrap();
        prop_assert_eq!(after.position, before);
        prop_assert!(after.extent.width >= 5.0 && after.extent.height >= 2.0);
        prop_assert!(after.position.x + after.extent.width <= 100.0 + 1e-9);
        prop_assert!(after.position.y + after.extent.height <= 100.0 + 1e-9);
    }

    #[test]
    fn view_reset_is_idempotent(zoom in 0.1f64..5.0, steps in 0usize..20) {
        let mut canvas = Canvas::new(EditorConfig::default(), "doc.pdf", None);
        canvas.set_zoom(zoom);
        for _ in 0..steps {
            canvas.zoom_in();
        }
        canvas.reset_view();
        let once = canvas.view().transform();
        canvas.reset_view();
        prop_assert_eq!(canvas.view().transform(), once);
        prop_assert!(once.is_identity());
    }
}
