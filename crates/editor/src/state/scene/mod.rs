//! Edit session
//!
//! `SceneEditor` owns the registry, selection, history and camera of one open
//! scene and exposes every user action as a plain method call. An action
//! records history at most once and ends with a coalesced render request.

mod camera_ops;
mod history;
mod object_ops;
mod persistence;
mod selection_ops;
mod transform_ops;

pub use object_ops::AddOutcome;

use std::path::PathBuf;
use std::rc::Rc;

use shared::CameraState;

use crate::animation::Animator;
use crate::clock::{Clock, SystemClock};
use crate::entity::Entity;
use crate::state::history::{HistoryManager, SceneSnapshot};
use crate::state::registry::ObjectRegistry;
use crate::state::selection::{SelectionChange, SelectionManager};
use crate::state::settings::EditorSettings;
use crate::viewport::{
    BoundingVolumes, BoundsPicker, PrimitiveBounds, RayCaster, RenderScheduler, Viewport,
};

/// Change-notification hooks for dependent UI
pub trait EditorObserver {
    /// The selected entity changed (or was cleared)
    fn on_selection_changed(&self, _selected: Option<&Entity>) {}
    /// An entity's transform was edited
    fn on_transform_changed(&self, _entity: &Entity) {}
    /// Entities were added, removed or replaced
    fn on_scene_changed(&self, _object_count: usize) {}
    /// Advisory message for the user (import summary, placement fallback)
    fn on_notice(&self, _message: &str) {}
}

pub struct SceneEditor {
    pub(crate) registry: ObjectRegistry,
    pub(crate) selection: SelectionManager,
    pub(crate) history: HistoryManager,
    pub(crate) camera: CameraState,
    pub(crate) viewport: Viewport,
    pub(crate) settings: EditorSettings,
    pub(crate) animator: Animator,
    pub(crate) renderer: RenderScheduler,
    pub(crate) ray_caster: Box<dyn RayCaster>,
    pub(crate) bounds: Box<dyn BoundingVolumes>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) observers: Vec<Rc<dyn EditorObserver>>,
    /// Scene at drag start, recorded as one history entry when the drag ends
    pub(crate) drag_start: Option<SceneSnapshot>,
    pub(crate) autosave_path: Option<PathBuf>,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl Default for SceneEditor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl SceneEditor {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            selection: SelectionManager::new(),
            history: HistoryManager::new(settings.history.limit),
            camera: CameraState::default(),
            viewport: Viewport::default(),
            settings,
            animator: Animator::new(),
            renderer: RenderScheduler::default(),
            ray_caster: Box::new(BoundsPicker::new()),
            bounds: Box::new(PrimitiveBounds),
            clock: Box::new(SystemClock),
            observers: Vec::new(),
            drag_start: None,
            autosave_path: None,
            version: 0,
        }
    }

    // ── Collaborators ─────────────────────────────────────────

    pub fn with_ray_caster(mut self, ray_caster: Box<dyn RayCaster>) -> Self {
        self.ray_caster = ray_caster;
        self
    }

    pub fn with_bounds(mut self, bounds: Box<dyn BoundingVolumes>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_renderer(mut self, renderer: RenderScheduler) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_autosave_path(mut self, path: PathBuf) -> Self {
        self.autosave_path = Some(path);
        self
    }

    pub fn add_observer(&mut self, observer: Rc<dyn EditorObserver>) {
        self.observers.push(observer);
    }

    // ── Read access ───────────────────────────────────────────

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn objects(&self) -> &[Entity] {
        self.registry.all()
    }

    pub fn object_count(&self) -> usize {
        self.registry.len()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.renderer.request_render();
    }

    pub fn is_dragging(&self) -> bool {
        self.selection.is_dragging()
    }

    // ── Internal plumbing ─────────────────────────────────────

    pub(crate) fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Deep copy of the entities, without camera
    pub(crate) fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(&self.registry, None)
    }

    /// Bump version and schedule a render
    pub(crate) fn touch(&mut self) {
        self.version += 1;
        self.renderer.request_render();
    }

    /// End of a completed user action
    pub(crate) fn commit(&mut self) {
        self.touch();
        for observer in &self.observers {
            observer.on_scene_changed(self.registry.len());
        }
        if self.settings.persistence.autosave {
            self.autosave();
        }
    }

    pub(crate) fn emit_selection(&self, change: Option<SelectionChange>) {
        let Some(change) = change else {
            return;
        };
        let entity = change.current.as_deref().and_then(|id| self.registry.get(id));
        for observer in &self.observers {
            observer.on_selection_changed(entity);
        }
    }

    pub(crate) fn emit_transform(&self, id: &str) {
        if let Some(entity) = self.registry.get(id) {
            for observer in &self.observers {
                observer.on_transform_changed(entity);
            }
        }
    }

    pub(crate) fn emit_notice(&self, message: &str) {
        tracing::info!("{message}");
        for observer in &self.observers {
            observer.on_notice(message);
        }
    }
}
