//! Collaborators around the edit-session core: picking, camera math and
//! render coalescing. Nothing in here owns scene state.

pub mod camera;
pub mod picking;
pub mod render;

pub use picking::{
    Aabb, BoundingVolumes, BoundsPicker, PrimitiveBounds, Ray, RayCaster, RayHit, ViewContext,
};
pub use render::{FramePump, QueuedFramePump, RenderScheduler, RenderSurface};

/// Pointer position in viewport pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: ScreenPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Size of the drawing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
