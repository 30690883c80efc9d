//! Timed, cancellable animations.
//!
//! An animation is a start time, a duration and an easing curve. The host
//! drives every running animation by calling [`Animator::tick`] once per frame
//! with the current time; each tick first checks the task's liveness flag and
//! drops the task if it was cancelled.

use std::cell::Cell;
use std::rc::Rc;

use shared::{CameraState, EntityId};

use crate::state::registry::ObjectRegistry;
use crate::viewport::camera;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress in [0, 1] onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Shared liveness flag; clearing it stops the task at its next frame.
#[derive(Debug, Clone)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.set(false);
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone)]
pub struct AnimationTask {
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
    alive: Rc<Cell<bool>>,
}

impl AnimationTask {
    pub fn new(start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            start_ms,
            duration_ms,
            easing,
            alive: Rc::new(Cell::new(true)),
        }
    }

    pub fn handle(&self) -> CancelHandle {
        CancelHandle(Rc::clone(&self.alive))
    }

    pub fn cancel(&self) {
        self.alive.set(false);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Linear progress in [0, 1]. A non-positive duration completes at once.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 || !self.duration_ms.is_finite() {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased progress, or `None` once cancelled.
    pub fn sample(&self, now_ms: f64) -> Option<f64> {
        self.is_alive()
            .then(|| self.easing.apply(self.progress(now_ms)))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

#[derive(Debug, Clone)]
enum Target {
    Camera { from: CameraState, to: CameraState },
    /// Grows `spawn_factor` from 0 to 1
    Spawn { id: EntityId },
}

#[derive(Debug, Clone)]
struct Animation {
    task: AnimationTask,
    target: Target,
}

/// All animations currently in flight
#[derive(Debug, Default)]
pub struct Animator {
    running: Vec<Animation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the camera from `from` to `to`. Replaces any camera animation in flight.
    pub fn animate_camera(
        &mut self,
        from: CameraState,
        to: CameraState,
        now_ms: f64,
        duration_ms: f64,
    ) -> CancelHandle {
        self.cancel_camera();
        let task = AnimationTask::new(now_ms, duration_ms, Easing::EaseInOutCubic);
        let handle = task.handle();
        self.running.push(Animation {
            task,
            target: Target::Camera { from, to },
        });
        handle
    }

    /// Scale-in for a freshly created entity. The entity starts invisible.
    pub fn animate_spawn(
        &mut self,
        id: &str,
        registry: &mut ObjectRegistry,
        now_ms: f64,
        duration_ms: f64,
    ) -> CancelHandle {
        self.cancel_spawn(id);
        if let Some(entity) = registry.get_mut(id) {
            entity.visual.spawn_factor = 0.0;
        }
        let task = AnimationTask::new(now_ms, duration_ms, Easing::EaseOutCubic);
        let handle = task.handle();
        self.running.push(Animation {
            task,
            target: Target::Spawn { id: id.to_string() },
        });
        handle
    }

    pub fn cancel_camera(&mut self) {
        for anim in &self.running {
            if matches!(anim.target, Target::Camera { .. }) {
                anim.task.cancel();
            }
        }
    }

    pub fn cancel_spawn(&mut self, id: &str) {
        for anim in &self.running {
            if matches!(&anim.target, Target::Spawn { id: target } if target == id) {
                anim.task.cancel();
            }
        }
    }

    pub fn cancel_all(&mut self) {
        for anim in &self.running {
            anim.task.cancel();
        }
    }

    /// Any task still alive (cancelled ones are dropped on the next tick)
    pub fn is_active(&self) -> bool {
        self.running.iter().any(|a| a.task.is_alive())
    }

    /// Advance every animation to `now_ms`. Returns true if anything visible changed.
    pub fn tick(
        &mut self,
        now_ms: f64,
        camera_state: &mut CameraState,
        registry: &mut ObjectRegistry,
    ) -> bool {
        let mut changed = false;
        self.running.retain(|anim| {
            let Some(t) = anim.task.sample(now_ms) else {
                // Cancelled spawn: leave the entity at full size
                if let Target::Spawn { id } = &anim.target {
                    if let Some(entity) = registry.get_mut(id) {
                        changed |= entity.visual.spawn_factor != 1.0;
                        entity.visual.spawn_factor = 1.0;
                    }
                }
                return false;
            };
            match &anim.target {
                Target::Camera { from, to } => {
                    *camera_state = camera::lerp(from, to, t);
                    changed = true;
                }
                Target::Spawn { id } => match registry.get_mut(id) {
                    Some(entity) => {
                        entity.visual.spawn_factor = t;
                        changed = true;
                    }
                    None => return false,
                },
            }
            !anim.task.is_finished(now_ms)
        });
        changed
    }
}
