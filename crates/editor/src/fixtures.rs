//! Factory functions for creating test data.
//!
//! Entities, records and documents in the shapes the editor reads and writes,
//! plus a few deliberately malformed ones for import tests.

use serde_json::{json, Value};
use shared::*;

use crate::entity::Entity;

// ── Entity factories ────────────────────────────────────────────

/// Entity of `kind` with a fixed id at `position`
pub fn entity_at(id: &str, kind: EntityKind, position: [f64; 3]) -> Entity {
    Entity::with_id(id.to_string(), kind, Transform::at(position), 0)
}

/// Unit box resting on the ground at the origin
pub fn ground_box(id: &str) -> Entity {
    entity_at(id, EntityKind::Box, [0.0, 0.5, 0.0])
}

/// Entity with every persisted field set to a non-default value
pub fn styled_entity(id: &str, kind: EntityKind) -> Entity {
    let mut e = entity_at(id, kind, [2.0, 1.5, -3.0]);
    e.name = format!("Styled {id}");
    e.transform.rotation = [0.1, 0.2, 0.3];
    e.transform.scale = [1.5, 0.5, 2.0];
    e.color = 0xabcdef;
    e
}

// ── Record factories ────────────────────────────────────────────

pub fn record(id: &str, kind: EntityKind, position: [f64; 3]) -> ObjectRecord {
    ObjectRecord {
        kind,
        id: id.to_string(),
        name: format!("{} {id}", kind.label()),
        position,
        rotation: [0.0; 3],
        scale: [1.0; 3],
        color: kind.default_color(),
    }
}

/// Record as raw JSON, ready to be broken by the caller
pub fn record_json(id: &str, kind: EntityKind, position: [f64; 3]) -> Value {
    serde_json::to_value(record(id, kind, position)).unwrap_or(Value::Null)
}

/// A record whose position has only two components
pub fn short_position_record(id: &str) -> Value {
    let mut value = record_json(id, EntityKind::Box, [0.0, 0.5, 0.0]);
    value["position"] = json!([1, 2]);
    value
}

/// A record of a kind the editor does not know
pub fn unknown_kind_record(id: &str) -> Value {
    let mut value = record_json(id, EntityKind::Box, [0.0, 0.5, 0.0]);
    value["type"] = json!("torus");
    value
}

// ── Document factories ──────────────────────────────────────────

/// Versioned document holding `objects`
pub fn document(objects: Vec<ObjectRecord>) -> SceneDocument {
    SceneDocument {
        objects,
        ..SceneDocument::default()
    }
}

/// Versioned document text from raw record values
pub fn document_json(objects: Vec<Value>, camera: Option<Value>) -> String {
    let mut doc = json!({
        "version": DOCUMENT_VERSION,
        "timestamp": 0,
        "objects": objects,
    });
    if let Some(camera) = camera {
        doc["camera"] = camera;
    }
    doc.to_string()
}

/// Legacy bare-array document text
pub fn legacy_json(objects: Vec<Value>) -> String {
    Value::Array(objects).to_string()
}

pub fn camera_json(position: [f64; 3], target: [f64; 3], fov: f64) -> Value {
    json!({ "position": position, "target": target, "fov": fov })
}

/// Three objects spread along X
pub fn three_object_scene() -> SceneDocument {
    document(vec![
        record("box1", EntityKind::Box, [-3.0, 0.5, 0.0]),
        record("sphere1", EntityKind::Sphere, [0.0, 0.5, 0.0]),
        record("cyl1", EntityKind::Cylinder, [3.0, 0.5, 0.0]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_object_scene() {
        let doc = three_object_scene();
        assert_eq!(doc.objects.len(), 3);
        assert_eq!(doc.version, DOCUMENT_VERSION);
    }

    #[test]
    fn test_broken_records() {
        assert_eq!(short_position_record("x")["position"], json!([1, 2]));
        assert_eq!(unknown_kind_record("x")["type"], "torus");
        assert_eq!(record_json("x", EntityKind::Sphere, [0.0; 3])["type"], "sphere");
    }

    #[test]
    fn test_document_json_camera() {
        let text = document_json(vec![], Some(camera_json([1.0, 2.0, 3.0], [0.0; 3], 45.0)));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["camera"]["fov"], 45.0);
    }
}
