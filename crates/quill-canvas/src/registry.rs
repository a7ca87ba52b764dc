// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field registry: the ordered set of placed fields and the single selection.
//
// All geometry written here is clamped, so every field in the registry
// satisfies containment and the minimum-size floors at all times.

use quill_core::geometry::{clamp_extent_at, clamp_placement};
use quill_core::{
    Field, FieldId, FieldKind, FieldValue, InkColor, PageExtent, PagePoint, PlacementLimits,
};
use tracing::{debug, info};

/// Partial update applied by [`FieldRegistry::update`].
///
/// Unset members leave the field untouched. `value` distinguishes "leave
/// alone" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdate {
    pub label: Option<String>,
    pub value: Option<Option<FieldValue>>,
    pub ink_color: Option<InkColor>,
    pub position: Option<PagePoint>,
    pub extent: Option<PageExtent>,
}

impl FieldUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn value(mut self, value: FieldValue) -> Self {
        self.value = Some(Some(value));
        self
    }

    pub fn clear_value(mut self) -> Self {
        self.value = Some(None);
        self
    }

    pub fn ink_color(mut self, color: InkColor) -> Self {
        self.ink_color = Some(color);
        self
    }

    pub fn position(mut self, position: PagePoint) -> Self {
        self.position = Some(position);
        self
    }

    pub fn extent(mut self, extent: PageExtent) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Insertion-ordered fields plus at most one selected id.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<Field>,
    selected: Option<FieldId>,
    limits: PlacementLimits,
}

impl FieldRegistry {
    pub fn new(limits: PlacementLimits) -> Self {
        Self {
            fields: Vec::new(),
            selected: None,
            limits,
        }
    }

    pub fn limits(&self) -> &PlacementLimits {
        &self.limits
    }

    /// Append a field of `kind` with its defaults and select it.
    pub fn add(&mut self, kind: FieldKind) -> FieldId {
        let id = self.insert(Field::new(kind));
        self.selected = Some(id);
        id
    }

    /// Append a fully specified field. Geometry is clamped on the way in and
    /// a colliding id is replaced with a fresh one. Selection is unchanged.
    pub fn insert(&mut self, mut field: Field) -> FieldId {
        if self.contains(field.id) {
            debug!(field_id = %field.id, "Duplicate field id replaced");
            field.id = FieldId::new();
        }
        let (position, extent) = clamp_placement(field.position, field.extent, &self.limits);
        field.position = position;
        field.extent = extent;

        let id = field.id;
        info!(
            field_id = %id,
            kind = ?field.kind,
            x = position.x,
            y = position.y,
            "Field added"
        );
        self.fields.push(field);
        id
    }

    /// Remove a field. Clears the selection when it pointed at `id`.
    pub fn remove(&mut self, id: FieldId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.fields.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        info!(field_id = %id, "Field removed");
        true
    }

    /// Apply a partial update. Position and extent are clamped together.
    pub fn update(&mut self, id: FieldId, update: FieldUpdate) -> bool {
        let limits = self.limits;
        let Some(field) = self.get_mut(id) else {
            return false;
        };
        if let Some(label) = update.label {
            field.label = label;
        }
        if let Some(value) = update.value {
            field.value = value;
        }
        if let Some(color) = update.ink_color {
            field.ink_color = color;
        }
        if update.position.is_some() || update.extent.is_some() {
            let (position, extent) = clamp_placement(
                update.position.unwrap_or(field.position),
                update.extent.unwrap_or(field.extent),
                &limits,
            );
            field.position = position;
            field.extent = extent;
        }
        debug!(field_id = %id, "Field updated");
        true
    }

    /// Move a field, keeping its extent. Returns the clamped position.
    pub fn set_position(&mut self, id: FieldId, position: PagePoint) -> Option<PagePoint> {
        let limits = self.limits;
        let field = self.get_mut(id)?;
        let (position, _) = clamp_placement(position, field.extent, &limits);
        field.position = position;
        Some(position)
    }

    /// Resize a field from its top-left corner, which stays put.
    pub fn set_extent_anchored(&mut self, id: FieldId, extent: PageExtent) -> Option<PageExtent> {
        let limits = self.limits;
        let field = self.get_mut(id)?;
        let extent = clamp_extent_at(field.position, extent, &limits);
        field.extent = extent;
        Some(extent)
    }

    /// Select a field or clear the selection. An unknown id changes nothing
    /// and returns `false`.
    pub fn select(&mut self, id: Option<FieldId>) -> bool {
        match id {
            Some(id) if !self.contains(id) => false,
            _ => {
                self.selected = id;
                true
            }
        }
    }

    pub fn selected(&self) -> Option<FieldId> {
        self.selected
    }

    pub fn selected_field(&self) -> Option<&Field> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    fn get_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: FieldId) -> Option<usize> {
        self.fields.iter().position(|field| field.id == id)
    }

    /// Fields in insertion order, bottom-most first.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
