//! Scene document codec.
//!
//! Serialization is a straight mapping of the registry onto `SceneDocument`.
//! Deserialization is schema-tolerant: it accepts the versioned object form or
//! a bare legacy array, validates every record on its own, skips the ones that
//! fail and clamps the ones that pass through the same validators used while
//! editing. A document that cannot be parsed at all leaves the scene untouched.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use shared::{CameraState, EntityKind, ObjectRecord, SceneDocument, DOCUMENT_VERSION};

use crate::entity::{default_name, Entity};
use crate::state::registry::ObjectRegistry;
use crate::state::selection::{SelectionChange, SelectionManager};
use crate::state::settings::EditorSettings;
use crate::validation::{
    clamp_position, clamp_rotation, clamp_scale, degrees_to_radians, leading_numbers,
    number_array, radians_to_degrees, validate_rotation,
};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("document is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported document shape: {0}")]
    InvalidShape(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single object record was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NotAnObject,
    MissingType,
    UnknownType(String),
    InvalidPosition,
    InvalidRotation,
    InvalidScale,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotAnObject => f.write_str("record is not an object"),
            RejectReason::MissingType => f.write_str("missing type"),
            RejectReason::UnknownType(t) => write!(f, "unknown type '{t}'"),
            RejectReason::InvalidPosition => f.write_str("position is not 3 finite numbers"),
            RejectReason::InvalidRotation => {
                f.write_str("rotation does not start with 3 finite numbers")
            }
            RejectReason::InvalidScale => f.write_str("scale is not 3 finite numbers"),
        }
    }
}

/// Outcome of a load, surfaced to the user as one aggregate notice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded_count: usize,
    pub skipped_count: usize,
    pub camera_restored: bool,
}

impl LoadReport {
    pub fn summary(&self) -> String {
        if self.skipped_count == 0 {
            format!("Loaded {} objects", self.loaded_count)
        } else {
            format!(
                "Loaded {} objects, skipped {} invalid entries",
                self.loaded_count, self.skipped_count
            )
        }
    }
}

/// A fully validated document, ready to swap into the registry
#[derive(Debug, Clone)]
pub struct ParsedScene {
    pub entities: Vec<Entity>,
    /// Index in the source array and the reason, for every skipped record
    pub skipped: Vec<(usize, RejectReason)>,
    /// Present only if the document had a camera block with valid fields
    pub camera: Option<CameraState>,
}

// ── Serialize ─────────────────────────────────────────────

pub fn to_record(entity: &Entity) -> ObjectRecord {
    ObjectRecord {
        kind: entity.kind,
        id: entity.id.clone(),
        name: entity.name.clone(),
        position: entity.transform.position,
        rotation: entity.transform.rotation,
        scale: entity.transform.scale,
        color: entity.color,
    }
}

pub fn serialize(
    entities: &[Entity],
    camera: Option<&CameraState>,
    timestamp: i64,
) -> SceneDocument {
    SceneDocument {
        version: DOCUMENT_VERSION.to_string(),
        timestamp,
        objects: entities.iter().map(to_record).collect(),
        camera: camera.cloned(),
    }
}

pub fn to_json(document: &SceneDocument) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(document)?)
}

// ── Deserialize ───────────────────────────────────────────

/// Parse and validate `text` without touching any editor state.
pub fn parse_document(
    text: &str,
    settings: &EditorSettings,
    now_ms: i64,
) -> Result<ParsedScene, PersistenceError> {
    let limit = settings.persistence.max_document_bytes;
    if text.len() > limit {
        return Err(PersistenceError::TooLarge {
            size: text.len(),
            limit,
        });
    }

    let value: Value = serde_json::from_str(text)?;
    let (records, camera_value) = match &value {
        Value::Array(items) => (items, None),
        Value::Object(map) => match map.get("objects") {
            Some(Value::Array(items)) => (items, map.get("camera")),
            Some(_) => {
                return Err(PersistenceError::InvalidShape(
                    "\"objects\" is not an array".to_string(),
                ))
            }
            None => {
                return Err(PersistenceError::InvalidShape(
                    "missing \"objects\" array".to_string(),
                ))
            }
        },
        _ => {
            return Err(PersistenceError::InvalidShape(
                "expected an object or an array".to_string(),
            ))
        }
    };

    let mut entities = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        match parse_record(record, settings, now_ms) {
            Ok(mut entity) => {
                if !seen_ids.insert(entity.id.clone()) {
                    let fresh = uuid::Uuid::new_v4().to_string();
                    tracing::warn!(
                        "Duplicate id {} at record {index}, reassigned to {fresh}",
                        entity.id
                    );
                    entity.id = fresh;
                    seen_ids.insert(entity.id.clone());
                }
                entities.push(entity);
            }
            Err(reason) => {
                tracing::warn!("Skipping record {index}: {reason}");
                skipped.push((index, reason));
            }
        }
    }

    Ok(ParsedScene {
        entities,
        skipped,
        camera: camera_value.and_then(parse_camera),
    })
}

/// Validate one record and rebuild it as an in-bounds entity.
pub fn parse_record(
    value: &Value,
    settings: &EditorSettings,
    now_ms: i64,
) -> Result<Entity, RejectReason> {
    let map = value.as_object().ok_or(RejectReason::NotAnObject)?;

    let kind = match map.get("type").and_then(Value::as_str) {
        Some(t) => t
            .parse::<EntityKind>()
            .map_err(|e| RejectReason::UnknownType(e.0))?,
        None => return Err(RejectReason::MissingType),
    };
    let position = map
        .get("position")
        .and_then(number_array::<3>)
        .ok_or(RejectReason::InvalidPosition)?;
    let scale = map
        .get("scale")
        .and_then(number_array::<3>)
        .ok_or(RejectReason::InvalidScale)?;
    let rotation = map
        .get("rotation")
        .and_then(leading_numbers::<3>)
        .ok_or(RejectReason::InvalidRotation)?;

    let id = match map.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };

    let mut entity = Entity::with_id(id, kind, shared::Transform::new(), now_ms);
    if let Some(name) = map.get("name").and_then(Value::as_str) {
        entity.name = name.to_string();
    } else {
        entity.name = default_name(kind, &entity.id);
    }
    if let Some(color) = map.get("color").and_then(parse_color) {
        entity.color = color;
    }

    entity.transform.position = clamp_position(position, &settings.workspace);
    entity.transform.scale = clamp_scale(scale, &settings.scale);
    let degrees = radians_to_degrees(rotation);
    entity.transform.rotation = if validate_rotation(degrees, &settings.rotation) {
        rotation
    } else {
        degrees_to_radians(clamp_rotation(degrees, &settings.rotation))
    };

    Ok(entity)
}

/// Integer 0xRRGGBB, or a `"#rrggbb"` / `"0xrrggbb"` string
fn parse_color(value: &Value) -> Option<u32> {
    let raw = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => {
            let hex = s
                .strip_prefix('#')
                .or_else(|| s.strip_prefix("0x"))
                .unwrap_or(s);
            u64::from_str_radix(hex, 16).ok()?
        }
        _ => return None,
    };
    u32::try_from(raw).ok().filter(|c| *c <= 0xFF_FFFF)
}

/// Camera block with finite 3-vectors and a field of view in (0, 180)
pub fn parse_camera(value: &Value) -> Option<CameraState> {
    let camera = CameraState {
        position: value.get("position").and_then(number_array::<3>)?,
        target: value.get("target").and_then(number_array::<3>)?,
        fov: value.get("fov").and_then(Value::as_f64)?,
    };
    camera.is_valid().then_some(camera)
}

/// Replace the registry with a parsed scene. Selection is cleared first so no
/// stale id survives the swap.
pub fn apply_parsed(
    parsed: ParsedScene,
    registry: &mut ObjectRegistry,
    selection: &mut SelectionManager,
    camera: &mut CameraState,
) -> (LoadReport, Option<SelectionChange>) {
    let change = selection.reset(registry);
    let report = LoadReport {
        loaded_count: parsed.entities.len(),
        skipped_count: parsed.skipped.len(),
        camera_restored: parsed.camera.is_some(),
    };
    registry.replace_all(parsed.entities);
    if let Some(restored) = parsed.camera {
        *camera = restored;
    }
    (report, change)
}

/// Parse `text` and, only if that succeeds, fully replace the registry contents.
pub fn deserialize(
    text: &str,
    registry: &mut ObjectRegistry,
    selection: &mut SelectionManager,
    camera: &mut CameraState,
    settings: &EditorSettings,
    now_ms: i64,
) -> Result<LoadReport, PersistenceError> {
    let parsed = parse_document(text, settings, now_ms)?;
    let (report, _) = apply_parsed(parsed, registry, selection, camera);
    tracing::info!("{}", report.summary());
    Ok(report)
}
