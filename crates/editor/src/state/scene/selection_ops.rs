//! Pointer input and explicit selection

use super::SceneEditor;
use crate::entity::Entity;
use crate::state::selection::{SelectionChange, SelectionPhase};
use crate::viewport::{RayHit, ScreenPoint, ViewContext};

impl SceneEditor {
    /// Entities under `point`, nearest first
    pub fn pick(&self, point: ScreenPoint) -> Vec<RayHit> {
        let view = ViewContext {
            camera: &self.camera,
            viewport: self.viewport,
            entities: self.registry.all(),
        };
        self.ray_caster.cast_ray(point, &view)
    }

    /// Update hover highlight. Returns true if the hovered entity changed.
    pub fn pointer_move(&mut self, point: ScreenPoint) -> bool {
        if self.selection.is_dragging() {
            return false;
        }
        let hits = self.pick(point);
        let changed = self.selection.pointer_move(&hits, &mut self.registry);
        if changed {
            self.renderer.request_render();
        }
        changed
    }

    pub fn pointer_down(&mut self, point: ScreenPoint) {
        let now = self.now_ms();
        self.selection.pointer_down(point, now);
    }

    /// Release. Runs click selection only if the press was short and still.
    pub fn pointer_up(&mut self, point: ScreenPoint) -> Option<SelectionChange> {
        let now = self.now_ms();
        if self.selection.pointer_up(point, now, &self.settings.pointer) {
            self.click(point)
        } else {
            None
        }
    }

    /// Raycast selection at `point`
    pub fn click(&mut self, point: ScreenPoint) -> Option<SelectionChange> {
        if self.selection.is_dragging() {
            return None;
        }
        let hits = self.pick(point);
        let change = self.selection.click(&hits, &mut self.registry);
        if change.is_some() {
            self.renderer.request_render();
        }
        self.emit_selection(change.clone());
        change
    }

    /// Select by id, bypassing raycasting. Ignored while dragging.
    pub fn select_object(&mut self, id: &str) -> bool {
        if self.selection.is_dragging() {
            return false;
        }
        let change = self.selection.select(id, &mut self.registry);
        let changed = change.is_some();
        if changed {
            self.renderer.request_render();
        }
        self.emit_selection(change);
        changed
    }

    /// Clear the selection. Ignored while dragging.
    pub fn deselect(&mut self) -> bool {
        let change = self.selection.deselect(&mut self.registry);
        let changed = change.is_some();
        if changed {
            self.renderer.request_render();
        }
        self.emit_selection(change);
        changed
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected().map(String::as_str)
    }

    pub fn selected(&self) -> Option<&Entity> {
        self.selection.selected().and_then(|id| self.registry.get(id))
    }

    pub fn hovered_id(&self) -> Option<&str> {
        self.selection.hovered().map(String::as_str)
    }

    pub fn selection_phase(&self) -> SelectionPhase {
        self.selection.phase()
    }
}
