//! Render coalescing.
//!
//! Any number of state changes within one tick produce at most one render:
//! `request_render` schedules a single frame callback and ignores further
//! requests until that callback has run.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Draws the current scene. Implemented by the graphics runtime.
pub trait RenderSurface {
    fn render(&self);
}

/// Schedules a one-shot callback before the next paint.
pub trait FramePump {
    fn on_next_frame(&self, callback: Box<dyn FnOnce()>);
}

/// Surface that draws nothing (headless use)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSurface;

impl RenderSurface for NoopSurface {
    fn render(&self) {}
}

/// Frame pump that queues callbacks until the host calls `run_frame`.
#[derive(Clone, Default)]
pub struct QueuedFramePump {
    queue: Rc<RefCell<Vec<Box<dyn FnOnce()>>>>,
}

impl QueuedFramePump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback queued so far. Callbacks scheduled while running
    /// wait for the next frame. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let callbacks = std::mem::take(&mut *self.queue.borrow_mut());
        let count = callbacks.len();
        for callback in callbacks {
            callback();
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FramePump for QueuedFramePump {
    fn on_next_frame(&self, callback: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().push(callback);
    }
}

/// Idempotent-per-tick render requests
pub struct RenderScheduler {
    pending: Rc<Cell<bool>>,
    pump: Rc<dyn FramePump>,
    surface: Rc<dyn RenderSurface>,
}

impl RenderScheduler {
    pub fn new(pump: Rc<dyn FramePump>, surface: Rc<dyn RenderSurface>) -> Self {
        Self {
            pending: Rc::new(Cell::new(false)),
            pump,
            surface,
        }
    }

    /// Fire-and-forget; coalesced with any request already waiting for a frame.
    pub fn request_render(&self) {
        if self.pending.replace(true) {
            return;
        }
        let pending = Rc::clone(&self.pending);
        let surface = Rc::clone(&self.surface);
        self.pump.on_next_frame(Box::new(move || {
            pending.set(false);
            surface.render();
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(Rc::new(QueuedFramePump::new()), Rc::new(NoopSurface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSurface {
        renders: Cell<usize>,
    }

    impl RenderSurface for CountingSurface {
        fn render(&self) {
            self.renders.set(self.renders.get() + 1);
        }
    }

    #[test]
    fn test_requests_coalesce_within_tick() {
        let pump = QueuedFramePump::new();
        let surface = Rc::new(CountingSurface::default());
        let scheduler = RenderScheduler::new(Rc::new(pump.clone()), surface.clone());

        scheduler.request_render();
        scheduler.request_render();
        scheduler.request_render();
        assert_eq!(pump.pending(), 1);
        assert!(scheduler.is_pending());

        assert_eq!(pump.run_frame(), 1);
        assert_eq!(surface.renders.get(), 1);
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_request_after_frame_schedules_again() {
        let pump = QueuedFramePump::new();
        let surface = Rc::new(CountingSurface::default());
        let scheduler = RenderScheduler::new(Rc::new(pump.clone()), surface.clone());

        scheduler.request_render();
        pump.run_frame();
        scheduler.request_render();
        pump.run_frame();
        assert_eq!(surface.renders.get(), 2);
        assert_eq!(pump.run_frame(), 0);
    }
}
