//! Headless test harness for programmatic scene manipulation.
//!
//! Wraps a `SceneEditor` wired to deterministic collaborators: a manual
//! clock, a ray caster that returns scripted hits, a queued frame pump with a
//! render counter, and an observer that records every notification.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use shared::{EntityId, EntityKind, Transform};

use crate::clock::Clock;
use crate::entity::Entity;
use crate::persistence::{LoadReport, PersistenceError};
use crate::state::scene::{EditorObserver, SceneEditor};
use crate::state::settings::EditorSettings;
use crate::viewport::{
    QueuedFramePump, RayCaster, RayHit, RenderScheduler, RenderSurface, ScreenPoint, ViewContext,
};

/// Clock the test advances by hand
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn set(&self, ms: f64) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

/// Returns whatever hit list the test scripted, regardless of the point
#[derive(Debug, Clone, Default)]
pub struct ScriptedRayCaster(Rc<RefCell<Vec<RayHit>>>);

impl ScriptedRayCaster {
    /// Next casts hit `ids`, nearest first
    pub fn set_hits(&self, ids: &[&str]) {
        *self.0.borrow_mut() = ids
            .iter()
            .enumerate()
            .map(|(i, id)| RayHit {
                id: id.to_string(),
                distance: i as f64 + 1.0,
            })
            .collect();
    }
}

impl RayCaster for ScriptedRayCaster {
    fn cast_ray(&self, _point: ScreenPoint, view: &ViewContext<'_>) -> Vec<RayHit> {
        // Entities that no longer exist cannot be hit
        self.0
            .borrow()
            .iter()
            .filter(|hit| view.entities.iter().any(|e| e.id == hit.id))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct CountingSurface {
    renders: Cell<usize>,
}

impl CountingSurface {
    pub fn renders(&self) -> usize {
        self.renders.get()
    }
}

impl RenderSurface for CountingSurface {
    fn render(&self) {
        self.renders.set(self.renders.get() + 1);
    }
}

/// One observer notification
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SelectionChanged(Option<EntityId>),
    TransformChanged(EntityId),
    SceneChanged(usize),
    Notice(String),
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<EditorEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.borrow().clone()
    }

    pub fn take(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn notices(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                EditorEvent::Notice(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EditorObserver for RecordingObserver {
    fn on_selection_changed(&self, selected: Option<&Entity>) {
        self.events
            .borrow_mut()
            .push(EditorEvent::SelectionChanged(selected.map(|e| e.id.clone())));
    }

    fn on_transform_changed(&self, entity: &Entity) {
        self.events
            .borrow_mut()
            .push(EditorEvent::TransformChanged(entity.id.clone()));
    }

    fn on_scene_changed(&self, object_count: usize) {
        self.events
            .borrow_mut()
            .push(EditorEvent::SceneChanged(object_count));
    }

    fn on_notice(&self, message: &str) {
        self.events
            .borrow_mut()
            .push(EditorEvent::Notice(message.to_string()));
    }
}

/// Headless test harness
pub struct TestHarness {
    pub editor: SceneEditor,
    pub clock: ManualClock,
    pub hits: ScriptedRayCaster,
    pub pump: QueuedFramePump,
    pub surface: Rc<CountingSurface>,
    pub observer: Rc<RecordingObserver>,
}

impl TestHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let clock = ManualClock::default();
        clock.set(1_000.0);
        let hits = ScriptedRayCaster::default();
        let pump = QueuedFramePump::new();
        let surface = Rc::new(CountingSurface::default());
        let observer = Rc::new(RecordingObserver::default());

        let mut editor = SceneEditor::new(settings)
            .with_clock(Box::new(clock.clone()))
            .with_ray_caster(Box::new(hits.clone()))
            .with_renderer(RenderScheduler::new(Rc::new(pump.clone()), surface.clone()));
        editor.add_observer(observer.clone());

        Self {
            editor,
            clock,
            hits,
            pump,
            surface,
            observer,
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Add an entity of `kind` and return its id
    pub fn add(&mut self, kind: EntityKind) -> String {
        self.editor.add_object(kind).id
    }

    pub fn add_box(&mut self) -> String {
        self.add(EntityKind::Box)
    }

    pub fn add_sphere(&mut self) -> String {
        self.add(EntityKind::Sphere)
    }

    pub fn add_cylinder(&mut self) -> String {
        self.add(EntityKind::Cylinder)
    }

    /// Insert an entity directly, bypassing placement and history
    pub fn insert(&mut self, id: &str, kind: EntityKind, position: [f64; 3]) {
        self.editor
            .registry
            .add(Entity::with_id(id.to_string(), kind, Transform::at(position), 0));
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.editor.delete_object(id)
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn clear(&mut self) -> bool {
        self.editor.clear_scene()
    }

    pub fn load_scene_json(&mut self, json: &str) -> Result<LoadReport, PersistenceError> {
        self.editor.import_json(json)
    }

    pub fn export_scene_json(&self) -> String {
        self.editor.export_json().unwrap_or_default()
    }

    // ── Pointer ───────────────────────────────────────────────

    /// Press and release on the same spot with the given entities under the pointer
    pub fn click_on(&mut self, ids: &[&str]) {
        self.hits.set_hits(ids);
        let point = ScreenPoint::new(100.0, 100.0);
        self.editor.pointer_down(point);
        self.clock.advance(50.0);
        self.editor.pointer_up(point);
    }

    pub fn hover(&mut self, ids: &[&str]) -> bool {
        self.hits.set_hits(ids);
        self.editor.pointer_move(ScreenPoint::new(100.0, 100.0))
    }

    /// Drag the selected entity by `delta` in `steps` pointer moves
    pub fn drag_selected(&mut self, delta: [f64; 3], steps: usize) {
        self.editor.begin_drag();
        let steps = steps.max(1);
        let step = delta.map(|d| d / steps as f64);
        for _ in 0..steps {
            self.clock.advance(16.0);
            self.editor.drag_translate(step);
        }
        self.editor.end_drag();
    }

    // ── Frames ────────────────────────────────────────────────

    /// Advance the clock, tick animations and flush pending frame callbacks
    pub fn frame(&mut self, elapsed_ms: f64) -> usize {
        self.clock.advance(elapsed_ms);
        let now = self.clock.now_ms();
        self.editor.tick(now);
        self.pump.run_frame()
    }

    pub fn render_count(&self) -> usize {
        self.surface.renders()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn object_count(&self) -> usize {
        self.editor.object_count()
    }

    pub fn selected(&self) -> Option<String> {
        self.editor.selected_id().map(str::to_string)
    }

    pub fn position_of(&self, id: &str) -> Option<[f64; 3]> {
        self.editor.get(id).map(Entity::position)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
