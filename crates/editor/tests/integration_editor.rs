//! Integration tests for the edit session: placement, transform edits and
//! history through the public `SceneEditor` API.

use scene_editor_lib::entity::Entity;
use scene_editor_lib::placement::{PlacementOptions, PlacementRequest, PlacementStatus};
use scene_editor_lib::state::{EditorSettings, HistoryManager, ObjectRegistry, SceneSnapshot};
use scene_editor_lib::transform::{self, Axis};
use scene_editor_lib::viewport::{BoundingVolumes, PrimitiveBounds};
use scene_editor_lib::SceneEditor;
use shared::{EntityKind, Transform};

fn assert_same(a: &[Entity], b: &[Entity]) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert!(x.same_content(y), "{x:?} != {y:?}");
    }
}

#[test]
fn test_scenario_two_boxes() {
    let mut e = SceneEditor::default();
    let first = e.add_object(EntityKind::Box);
    assert_eq!(e.objects().len(), 1);
    let p = e.get(&first.id).unwrap().position();
    assert!((p[0]).abs() < 1e-9 && (p[1] - 0.5).abs() < 1e-9 && p[2].abs() < 1e-9);

    let options = PlacementOptions {
        check_overlap: true,
        grid_size: 1.0,
        ..Default::default()
    };
    let second = e.add_object_with(PlacementRequest::new(EntityKind::Box), Some(options));
    let q = e.get(&second.id).unwrap().position();
    assert_ne!(q, [0.0, 0.5, 0.0]);

    let bounds = PrimitiveBounds;
    let a = bounds.bounding_box_of(e.get(&first.id).unwrap());
    let b = bounds.bounding_box_of(e.get(&second.id).unwrap());
    assert!(!a.intersects(&b));
}

#[test]
fn test_placement_keeps_anchor_without_collision() {
    let mut e = SceneEditor::default();
    let out = e.add_object_with(
        PlacementRequest::new(EntityKind::Sphere).at([5.0, 0.5, 5.0]),
        None,
    );
    assert_eq!(out.placement.status, PlacementStatus::Anchor);
    assert_eq!(e.get(&out.id).unwrap().position(), [5.0, 0.5, 5.0]);
}

#[test]
fn test_scale_always_within_limits() {
    let mut e = SceneEditor::default();
    let id = e.add_object(EntityKind::Box).id;
    for raw in ["-5", "0", "1e9", "abc", "", "NaN", "3.5"] {
        for axis in Axis::all() {
            e.set_scale(&id, axis, raw);
            for v in e.get(&id).unwrap().scale() {
                assert!((0.1..=10.0).contains(&v), "{raw} gave {v}");
            }
        }
    }
    e.set_scale(&id, Axis::X, "-5");
    assert_eq!(e.get(&id).unwrap().scale()[0], 0.1);
}

#[test]
fn test_rotation_minus_thirty_is_three_thirty() {
    let mut e = SceneEditor::default();
    let id = e.add_object(EntityKind::Cylinder).id;
    for axis in Axis::all() {
        e.set_rotation_deg(&id, axis, "-30");
        let deg = e.get(&id).unwrap().rotation_degrees()[axis.index()];
        assert!((deg - 330.0).abs() < 1e-9);
    }
}

#[test]
fn test_record_undo_restores_pre_record_state() {
    let mut registry = ObjectRegistry::new();
    registry.add(Entity::with_id("a".into(), EntityKind::Box, Transform::new(), 0));
    let before = registry.all().to_vec();

    let mut history = HistoryManager::new(10);
    history.record(SceneSnapshot::capture(&registry, None));
    transform::update_position(registry.get_mut("a").unwrap(), Axis::X, "7", &Default::default());

    let restored = history.undo(SceneSnapshot::capture(&registry, None)).unwrap();
    assert_same(restored.entities(), &before);
}

#[test]
fn test_undo_redo_round_trip() {
    let mut e = SceneEditor::default();
    let id = e.add_object(EntityKind::Box).id;
    e.set_position(&id, Axis::Z, "4");
    let pre_undo = e.objects().to_vec();

    assert!(e.undo());
    assert!(e.redo());
    assert_same(e.objects(), &pre_undo);
}

#[test]
fn test_history_bound_evicts_oldest() {
    let limit = 10;
    let mut settings = EditorSettings::default();
    settings.history.limit = limit;
    let mut e = SceneEditor::new(settings);

    // State k has k entities; record() is called before each add
    for _ in 0..limit + 5 {
        e.add_object(EntityKind::Box);
    }
    assert_eq!(e.history().undo_len(), limit);

    for _ in 0..limit {
        assert!(e.undo());
    }
    assert!(!e.can_undo());
    // Oldest five snapshots (0..=4 entities) were evicted
    assert_eq!(e.object_count(), 5);
}

#[test]
fn test_edit_after_undo_clears_redo() {
    let mut e = SceneEditor::default();
    e.add_object(EntityKind::Box);
    e.add_object(EntityKind::Box);
    e.undo();
    assert!(e.can_redo());
    e.add_object(EntityKind::Sphere);
    assert!(!e.can_redo());
}

#[test]
fn test_delete_then_undo_restores_entity() {
    let mut e = SceneEditor::default();
    let id = e.add_object(EntityKind::Sphere).id;
    e.set_color(&id, 0x00ff00);
    assert!(e.delete_object(&id));
    assert!(e.undo());
    let restored = e.get(&id).unwrap();
    assert_eq!(restored.color, 0x00ff00);
    // Selection never survives a snapshot swap
    assert!(e.selected_id().is_none());
}

#[test]
fn test_positions_clamped_to_workspace() {
    let mut e = SceneEditor::default();
    let id = e.add_object(EntityKind::Box).id;
    e.set_position(&id, Axis::X, "1000");
    e.set_position(&id, Axis::Y, "-3");
    assert_eq!(e.get(&id).unwrap().position(), [50.0, 0.0, 0.0]);

    e.begin_drag();
    e.drag_translate([100.0, 0.0, 0.0]);
    e.end_drag();
    assert_eq!(e.get(&id).unwrap().position()[0], 50.0);
}

#[test]
fn test_duplicate_during_drag_keeps_history_linear() {
    let mut e = SceneEditor::default();
    let source = e.add_object(EntityKind::Cylinder).id;
    let entries = e.history().undo_len();

    assert!(e.begin_drag());
    e.drag_translate([2.0, 0.0, 2.0]);
    let copy = e.duplicate_selected().unwrap().id;
    assert_eq!(e.history().undo_len(), entries + 2);
    assert_eq!(e.selected_id(), Some(copy.as_str()));

    e.cancel_drag();
    assert_eq!(e.get(&source).unwrap().position(), [2.0, 0.5, 2.0]);
    assert_ne!(e.get(&copy).unwrap().position(), [2.0, 0.5, 2.0]);

    assert!(e.undo());
    assert_eq!(e.object_count(), 1);
    assert!(e.undo());
    assert_eq!(e.get(&source).unwrap().position(), [0.0, 0.5, 0.0]);
}
