//! Property-panel edits and gizmo drags

use super::SceneEditor;
use crate::transform::{self, Axis};
use crate::validation::NumericInput;

impl SceneEditor {
    /// Set one position axis from raw input. Records history only if the value changed.
    pub fn set_position<T: NumericInput + ?Sized>(
        &mut self,
        id: &str,
        axis: Axis,
        raw: &T,
    ) -> bool {
        let bounds = self.settings.workspace.clone();
        self.edit_entity(id, |entity| transform::update_position(entity, axis, raw, &bounds))
    }

    /// Set one rotation axis from raw degrees
    pub fn set_rotation_deg<T: NumericInput + ?Sized>(
        &mut self,
        id: &str,
        axis: Axis,
        raw_degrees: &T,
    ) -> bool {
        let limits = self.settings.rotation.clone();
        self.edit_entity(id, |entity| {
            transform::update_rotation_deg(entity, axis, raw_degrees, &limits)
        })
    }

    pub fn set_scale<T: NumericInput + ?Sized>(&mut self, id: &str, axis: Axis, raw: &T) -> bool {
        let limits = self.settings.scale.clone();
        self.edit_entity(id, |entity| transform::update_scale(entity, axis, raw, &limits))
    }

    /// Apply `edit` and keep the pre-edit snapshot as one history entry if it changed anything.
    fn edit_entity(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut crate::entity::Entity) -> bool,
    ) -> bool {
        if self.selection.is_dragging() || !self.registry.contains(id) {
            return false;
        }
        let before = self.snapshot();
        let changed = self.registry.get_mut(id).map(edit).unwrap_or(false);
        if changed {
            self.history.record(before);
            self.emit_transform(id);
            self.commit();
        }
        changed
    }

    // ── Drag ──────────────────────────────────────────────────

    /// Gizmo grabbed the selected entity. The scene is remembered once per drag.
    pub fn begin_drag(&mut self) -> bool {
        if self.selection.selected().is_none() {
            return false;
        }
        if self.drag_start.is_none() {
            self.drag_start = Some(self.snapshot());
        }
        self.selection.set_dragging(true);
        true
    }

    /// Move the dragged entity by a world-space delta
    pub fn drag_translate(&mut self, delta: [f64; 3]) -> bool {
        if !self.selection.is_dragging() {
            return false;
        }
        let Some(id) = self.selection.selected().cloned() else {
            return false;
        };
        let bounds = &self.settings.workspace;
        let moved = self
            .registry
            .get_mut(&id)
            .map(|entity| transform::translate(entity, delta, bounds))
            .unwrap_or(false);
        if moved {
            self.emit_transform(&id);
            self.touch();
        }
        moved
    }

    /// Gizmo released. The drag becomes one history entry unless it moved nothing.
    pub fn end_drag(&mut self) {
        if !self.selection.is_dragging() {
            return;
        }
        self.selection.set_dragging(false);
        let Some(start) = self.drag_start.take() else {
            return;
        };
        if start.matches(&self.registry) {
            return;
        }
        self.history.record(start);
        self.commit();
    }

    /// Abort the drag and put every transform back where it was at drag start.
    pub fn cancel_drag(&mut self) {
        if !self.selection.is_dragging() {
            return;
        }
        self.selection.set_dragging(false);
        let Some(start) = self.drag_start.take() else {
            return;
        };
        for saved in start.entities() {
            if let Some(entity) = self.registry.get_mut(&saved.id) {
                entity.transform = saved.transform.clone();
            }
        }
        if let Some(id) = self.selection.selected().cloned() {
            self.emit_transform(&id);
        }
        self.touch();
    }
}
