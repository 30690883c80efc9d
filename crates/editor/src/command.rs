//! JSON command protocol for scripted editing.
//!
//! Every editor action is reachable as a tagged JSON object, so a scene can be
//! built from a command file or driven from the browser console.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::EntityKind;

use crate::placement::{PlacementOptions, PlacementRequest};
use crate::state::scene::SceneEditor;
use crate::transform::Axis;

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Add an entity. Placement options default to the editor settings.
    AddObject {
        #[serde(rename = "type")]
        kind: EntityKind,
        #[serde(default)]
        position: Option<[f64; 3]>,
        #[serde(default)]
        options: Option<PlacementOptions>,
    },
    /// Delete an entity by ID
    DeleteObject {
        id: String,
    },
    /// Select an entity by ID.
    Select {
        id: String,
    },
    /// Clear selection.
    Deselect,
    /// Set one axis of the position; `value` may be a number or a string.
    SetPosition {
        id: String,
        axis: Axis,
        value: serde_json::Value,
    },
    /// Set one axis of the rotation, in degrees.
    SetRotation {
        id: String,
        axis: Axis,
        value: serde_json::Value,
    },
    SetScale {
        id: String,
        axis: Axis,
        value: serde_json::Value,
    },
    Rename {
        id: String,
        name: String,
    },
    /// Set the color as 0xRRGGBB.
    SetColor {
        id: String,
        color: u32,
    },
    /// Duplicate the selected entity.
    Duplicate,
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    /// Clear the entire scene.
    Clear,
    /// Inspect the scene: list all entities.
    Inspect,
    /// Export the scene as JSON.
    ExportScene,
    /// Replace the scene with a document (object or legacy array).
    ImportScene {
        scene: serde_json::Value,
    },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the editor.
pub fn execute_command(editor: &mut SceneEditor, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::AddObject {
            kind,
            position,
            options,
        } => {
            let mut request = PlacementRequest::new(kind);
            if let Some(position) = position {
                request = request.at(position);
            }
            let outcome = editor.add_object_with(request, options);
            CommandResponse::ok_with_data(json!({
                "id": outcome.id,
                "position": outcome.placement.position,
                "position_adjusted": outcome.placement.needs_notice(),
            }))
        }

        AgentCommand::DeleteObject { id } => {
            let removed = editor.delete_object(&id);
            CommandResponse::ok_with_data(json!({ "removed": removed }))
        }

        AgentCommand::Select { id } => {
            if editor.get(&id).is_none() {
                return CommandResponse::err(format!("Object not found: {id}"));
            }
            editor.select_object(&id);
            CommandResponse::ok_with_data(json!({ "selected": id }))
        }

        AgentCommand::Deselect => {
            let changed = editor.deselect();
            CommandResponse::ok_with_data(json!({ "deselected": changed }))
        }

        AgentCommand::SetPosition { id, axis, value } => {
            transform_response(editor, &id, |e| e.set_position(&id, axis, &value))
        }

        AgentCommand::SetRotation { id, axis, value } => {
            transform_response(editor, &id, |e| e.set_rotation_deg(&id, axis, &value))
        }

        AgentCommand::SetScale { id, axis, value } => {
            transform_response(editor, &id, |e| e.set_scale(&id, axis, &value))
        }

        AgentCommand::Rename { id, name } => {
            if editor.get(&id).is_none() {
                return CommandResponse::err(format!("Object not found: {id}"));
            }
            let changed = editor.rename_object(&id, &name);
            CommandResponse::ok_with_data(json!({ "changed": changed }))
        }

        AgentCommand::SetColor { id, color } => {
            if editor.get(&id).is_none() {
                return CommandResponse::err(format!("Object not found: {id}"));
            }
            if color > 0xFF_FFFF {
                return CommandResponse::err(format!("Color out of range: {color:#x}"));
            }
            let changed = editor.set_color(&id, color);
            CommandResponse::ok_with_data(json!({ "changed": changed }))
        }

        AgentCommand::Duplicate => match editor.duplicate_selected() {
            Some(outcome) => CommandResponse::ok_with_data(json!({ "id": outcome.id })),
            None => CommandResponse::err("Nothing selected"),
        },

        AgentCommand::Undo => {
            let success = editor.undo();
            CommandResponse::ok_with_data(json!({ "undone": success }))
        }

        AgentCommand::Redo => {
            let success = editor.redo();
            CommandResponse::ok_with_data(json!({ "redone": success }))
        }

        AgentCommand::Clear => {
            editor.clear_scene();
            CommandResponse::ok()
        }

        AgentCommand::Inspect => {
            let objects: Vec<serde_json::Value> = editor
                .objects()
                .iter()
                .map(|e| {
                    json!({
                        "id": e.id,
                        "type": e.kind,
                        "name": e.name,
                        "position": e.position(),
                        "rotation_deg": e.rotation_degrees(),
                        "scale": e.scale(),
                        "color": e.color,
                    })
                })
                .collect();
            CommandResponse::ok_with_data(json!({
                "object_count": objects.len(),
                "objects": objects,
                "selected": editor.selected_id(),
                "can_undo": editor.can_undo(),
                "can_redo": editor.can_redo(),
            }))
        }

        AgentCommand::ExportScene => match editor.export_json() {
            Ok(json) => CommandResponse::ok_with_data(json!({ "scene_json": json })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::ImportScene { scene } => match editor.import_json(&scene.to_string()) {
            Ok(report) => CommandResponse::ok_with_data(json!({
                "loaded": report.loaded_count,
                "skipped": report.skipped_count,
                "camera_restored": report.camera_restored,
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },
    }
}

fn transform_response(
    editor: &mut SceneEditor,
    id: &str,
    apply: impl FnOnce(&mut SceneEditor) -> bool,
) -> CommandResponse {
    if editor.get(id).is_none() {
        return CommandResponse::err(format!("Object not found: {id}"));
    }
    let changed = apply(editor);
    match editor.get(id) {
        Some(e) => CommandResponse::ok_with_data(json!({
            "changed": changed,
            "position": e.position(),
            "rotation_deg": e.rotation_degrees(),
            "scale": e.scale(),
        })),
        None => CommandResponse::err(format!("Object not found: {id}")),
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(editor: &mut SceneEditor, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    editor: &mut SceneEditor,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}
