use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use scene_editor_lib::clock::Clock;
use scene_editor_lib::command::execute_json;
use scene_editor_lib::shortcuts::Modifiers;
use scene_editor_lib::state::EditorSettings;
use scene_editor_lib::transform::Axis;
use scene_editor_lib::viewport::{
    QueuedFramePump, RenderScheduler, RenderSurface, ScreenPoint, Viewport,
};
use scene_editor_lib::{EditorObserver, Entity, SceneEditor};
use shared::EntityKind;

/// Initialize WASM module with panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("Scene editor WASM initialized");
}

/// `Date.now()`
struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Call a JS callback, logging (not propagating) anything it throws
fn call(callback: &RefCell<Option<js_sys::Function>>, args: &[JsValue]) {
    let Some(f) = callback.borrow().clone() else {
        return;
    };
    let result = match args {
        [] => f.call0(&JsValue::NULL),
        [a] => f.call1(&JsValue::NULL, a),
        [a, b, ..] => f.call2(&JsValue::NULL, a, b),
    };
    if let Err(err) = result {
        web_sys::console::error_1(&err);
    }
}

/// Forwards renders to a JS draw function
#[derive(Default)]
struct JsSurface {
    draw: RefCell<Option<js_sys::Function>>,
}

impl RenderSurface for JsSurface {
    fn render(&self) {
        call(&self.draw, &[]);
    }
}

/// Forwards editor notifications to JS callbacks
#[derive(Default)]
struct JsObserver {
    selection: RefCell<Option<js_sys::Function>>,
    transform: RefCell<Option<js_sys::Function>>,
    notice: RefCell<Option<js_sys::Function>>,
}

fn entity_value(entity: &Entity) -> serde_json::Value {
    serde_json::json!({
        "id": entity.id,
        "type": entity.kind,
        "name": entity.name,
        "position": entity.position(),
        "rotation_deg": entity.rotation_degrees(),
        "scale": entity.scale(),
        "color": entity.color,
    })
}

fn entity_json(entity: &Entity) -> JsValue {
    JsValue::from_str(&entity_value(entity).to_string())
}

impl EditorObserver for JsObserver {
    fn on_selection_changed(&self, selected: Option<&Entity>) {
        let arg = selected.map(entity_json).unwrap_or(JsValue::NULL);
        call(&self.selection, &[arg]);
    }

    fn on_transform_changed(&self, entity: &Entity) {
        call(&self.transform, &[entity_json(entity)]);
    }

    fn on_notice(&self, message: &str) {
        call(&self.notice, &[JsValue::from_str(message)]);
    }
}

/// Browser-facing edit session. The page calls `frame` from
/// `requestAnimationFrame` and forwards pointer and keyboard events.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: SceneEditor,
    pump: QueuedFramePump,
    surface: Rc<JsSurface>,
    observer: Rc<JsObserver>,
}

#[wasm_bindgen]
impl WasmEditor {
    /// `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WasmEditor, JsError> {
        let settings = if settings_json.trim().is_empty() {
            EditorSettings::default()
        } else {
            serde_json::from_str(settings_json)
                .map_err(|e| JsError::new(&format!("Invalid settings: {e}")))?
        };
        let pump = QueuedFramePump::new();
        let surface = Rc::new(JsSurface::default());
        let observer = Rc::new(JsObserver::default());

        let mut editor = SceneEditor::new(settings)
            .with_clock(Box::new(JsClock))
            .with_renderer(RenderScheduler::new(Rc::new(pump.clone()), surface.clone()));
        editor.add_observer(observer.clone());

        Ok(Self {
            editor,
            pump,
            surface,
            observer,
        })
    }

    // ── Callbacks ─────────────────────────────────────────────

    pub fn on_render(&self, f: js_sys::Function) {
        *self.surface.draw.borrow_mut() = Some(f);
    }

    pub fn on_selection_changed(&self, f: js_sys::Function) {
        *self.observer.selection.borrow_mut() = Some(f);
    }

    pub fn on_transform_changed(&self, f: js_sys::Function) {
        *self.observer.transform.borrow_mut() = Some(f);
    }

    pub fn on_notice(&self, f: js_sys::Function) {
        *self.observer.notice.borrow_mut() = Some(f);
    }

    /// Advance animations and run pending frame callbacks. Returns true while
    /// the page should keep requesting frames.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.editor.tick(now_ms);
        self.pump.run_frame();
        self.editor.is_animating() || self.pump.pending() > 0
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.editor.set_viewport(Viewport::new(width, height));
    }

    // ── Objects ───────────────────────────────────────────────

    /// Add `"box"`, `"sphere"` or `"cylinder"`; returns the new id
    pub fn add_object(&mut self, kind: &str) -> Result<String, JsError> {
        let kind: EntityKind = kind.parse()?;
        Ok(self.editor.add_object(kind).id)
    }

    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selected()
    }

    pub fn duplicate_selected(&mut self) -> Option<String> {
        self.editor.duplicate_selected().map(|o| o.id)
    }

    pub fn clear(&mut self) -> bool {
        self.editor.clear_scene()
    }

    pub fn object_count(&self) -> usize {
        self.editor.object_count()
    }

    /// Scene outliner contents as a JSON array
    pub fn objects_json(&self) -> String {
        let objects: Vec<serde_json::Value> =
            self.editor.objects().iter().map(entity_value).collect();
        serde_json::Value::Array(objects).to_string()
    }

    /// Property-panel edits; `value` is the raw text of the input field
    pub fn set_position(&mut self, id: &str, axis: &str, value: &str) -> Result<bool, JsError> {
        let axis = parse_axis(axis)?;
        Ok(self.editor.set_position(id, axis, value))
    }

    pub fn set_rotation(&mut self, id: &str, axis: &str, degrees: &str) -> Result<bool, JsError> {
        let axis = parse_axis(axis)?;
        Ok(self.editor.set_rotation_deg(id, axis, degrees))
    }

    pub fn set_scale(&mut self, id: &str, axis: &str, value: &str) -> Result<bool, JsError> {
        let axis = parse_axis(axis)?;
        Ok(self.editor.set_scale(id, axis, value))
    }

    // ── Selection and gizmo ───────────────────────────────────

    pub fn select(&mut self, id: &str) -> bool {
        self.editor.select_object(id)
    }

    pub fn deselect(&mut self) -> bool {
        self.editor.deselect()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.editor.selected_id().map(str::to_string)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.editor.pointer_move(ScreenPoint::new(x, y))
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.editor.pointer_down(ScreenPoint::new(x, y));
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        self.editor.pointer_up(ScreenPoint::new(x, y));
    }

    pub fn begin_drag(&mut self) -> bool {
        self.editor.begin_drag()
    }

    pub fn drag_by(&mut self, dx: f64, dy: f64, dz: f64) -> bool {
        self.editor.drag_translate([dx, dy, dz])
    }

    pub fn end_drag(&mut self) {
        self.editor.end_drag();
    }

    pub fn key_down(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        self.editor.handle_key(
            key,
            Modifiers {
                ctrl,
                shift,
                alt,
                meta,
            },
        )
    }

    // ── History ───────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    // ── Persistence ───────────────────────────────────────────

    pub fn export_json(&self) -> Result<String, JsError> {
        Ok(self.editor.export_json()?)
    }

    /// Returns the load report as JSON
    pub fn import_json(&mut self, text: &str) -> Result<String, JsError> {
        let report = self.editor.import_json(text)?;
        serde_json::to_string(&report).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Run one JSON command; returns the response as JSON
    pub fn execute(&mut self, command_json: &str) -> Result<String, JsError> {
        let response = execute_json(&mut self.editor, command_json).map_err(|e| JsError::new(&e))?;
        serde_json::to_string(&response).map_err(|e| JsError::new(&e.to_string()))
    }
}

fn parse_axis(axis: &str) -> Result<Axis, JsError> {
    axis.parse().map_err(|e: String| JsError::new(&e))
}
