//! Camera framing and per-frame animation

use shared::CameraState;

use super::SceneEditor;
use crate::viewport::{camera, Aabb};

impl SceneEditor {
    /// Animate the camera to frame the selected entity
    pub fn frame_selected(&mut self) -> bool {
        let Some(entity) = self.selected() else {
            return false;
        };
        let aabb = self.bounds.bounding_box_of(entity);
        self.frame_box(aabb);
        true
    }

    /// Animate the camera to frame every entity
    pub fn frame_all(&mut self) -> bool {
        if self.registry.is_empty() {
            return false;
        }
        let corners: Vec<_> = self
            .registry
            .all()
            .iter()
            .flat_map(|e| {
                let b = self.bounds.bounding_box_of(e);
                [b.min, b.max]
            })
            .collect();
        self.frame_box(Aabb::from_points(corners));
        true
    }

    fn frame_box(&mut self, aabb: Aabb) {
        let target = camera::framing_for(&self.camera, &aabb);
        let now = self.now_ms();
        let duration = self.settings.animation.framing_ms;
        self.animator
            .animate_camera(self.camera.clone(), target, now, duration);
        self.renderer.request_render();
    }

    /// Jump the camera without animating. Invalid states are ignored.
    pub fn set_camera(&mut self, camera_state: CameraState) -> bool {
        if !camera_state.is_valid() {
            return false;
        }
        self.animator.cancel_camera();
        self.camera = camera_state;
        self.renderer.request_render();
        true
    }

    /// Advance animations to `now_ms`. Call once per frame; returns true while
    /// anything moved.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let changed = self
            .animator
            .tick(now_ms, &mut self.camera, &mut self.registry);
        if changed {
            self.renderer.request_render();
        }
        changed
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_active()
    }
}
