//! Integration tests for TestHarness.
//!
//! Pointer, drag, observer and render behaviour through the headless harness.

use scene_editor_lib::harness::{EditorEvent, TestHarness};
use scene_editor_lib::state::SelectionPhase;
use shared::EntityKind;

#[test]
fn test_harness_undo_redo_cycle() {
    let mut h = TestHarness::new();
    h.add_box();
    h.add_sphere();
    assert_eq!(h.object_count(), 2);

    assert!(h.undo());
    assert_eq!(h.object_count(), 1);
    assert!(h.undo());
    assert_eq!(h.object_count(), 0);
    assert!(!h.undo()); // nothing to undo

    assert!(h.redo());
    assert!(h.redo());
    assert_eq!(h.object_count(), 2);
    assert!(!h.redo()); // nothing to redo
}

#[test]
fn test_click_on_selected_never_changes_selection() {
    let mut h = TestHarness::new();
    h.insert("a", EntityKind::Box, [0.0, 0.5, 0.0]);
    h.insert("b", EntityKind::Box, [0.0, 0.5, -3.0]);
    h.editor.select_object("a");

    // "b" is nearer, but the selected entity is under the pointer too
    h.click_on(&["b", "a"]);
    assert_eq!(h.selected().as_deref(), Some("a"));

    h.click_on(&["b"]);
    assert_eq!(h.selected().as_deref(), Some("b"));

    h.click_on(&[]);
    assert!(h.selected().is_none());
}

#[test]
fn test_slow_press_is_not_a_click() {
    let mut h = TestHarness::new();
    h.insert("a", EntityKind::Box, [0.0, 0.5, 0.0]);
    h.hits.set_hits(&["a"]);

    let p = scene_editor_lib::viewport::ScreenPoint::new(10.0, 10.0);
    h.editor.pointer_down(p);
    h.clock.advance(500.0);
    assert!(h.editor.pointer_up(p).is_none());
    assert!(h.selected().is_none());
}

#[test]
fn test_hover_skips_selection() {
    let mut h = TestHarness::new();
    h.insert("a", EntityKind::Box, [0.0, 0.5, 0.0]);
    h.insert("b", EntityKind::Box, [3.0, 0.5, 0.0]);

    assert!(h.hover(&["a"]));
    assert_eq!(h.editor.selection_phase(), SelectionPhase::Hovering("a".into()));

    h.editor.select_object("a");
    h.hover(&["a"]);
    assert!(h.editor.hovered_id().is_none());
    h.hover(&["b"]);
    assert_eq!(h.editor.hovered_id(), Some("b"));
}

#[test]
fn test_drag_is_one_undo_step() {
    let mut h = TestHarness::new();
    let id = h.add_box();
    let before = h.editor.history().undo_len();

    h.drag_selected([4.0, 0.0, 2.0], 20);
    let moved = h.position_of(&id).unwrap();
    assert!((moved[0] - 4.0).abs() < 1e-9);
    assert!((moved[2] - 2.0).abs() < 1e-9);
    assert_eq!(h.editor.history().undo_len(), before + 1);

    assert!(h.undo());
    assert_eq!(h.position_of(&id), Some([0.0, 0.5, 0.0]));
}

#[test]
fn test_deselect_ignored_during_drag() {
    let mut h = TestHarness::new();
    let id = h.add_box();
    h.editor.begin_drag();
    h.click_on(&[]);
    assert!(!h.editor.deselect());
    assert_eq!(h.selected(), Some(id));
    h.editor.end_drag();
}

#[test]
fn test_observer_sees_selection_and_transform() {
    let mut h = TestHarness::new();
    let id = h.add_box();
    let events = h.observer.take();
    assert!(events.contains(&EditorEvent::SelectionChanged(Some(id.clone()))));
    assert!(events.contains(&EditorEvent::SceneChanged(1)));

    h.editor
        .set_position(&id, scene_editor_lib::transform::Axis::X, "2.5");
    assert!(h
        .observer
        .take()
        .contains(&EditorEvent::TransformChanged(id.clone())));

    h.editor.deselect();
    assert_eq!(h.observer.take(), vec![EditorEvent::SelectionChanged(None)]);
}

#[test]
fn test_renders_coalesce_per_frame() {
    let mut h = TestHarness::new();
    h.add_box();
    h.add_sphere();
    h.add_cylinder();
    assert_eq!(h.render_count(), 0);
    h.frame(16.0);
    assert_eq!(h.render_count(), 1);

    // Spawn animations keep requesting frames until they finish
    h.frame(16.0);
    assert_eq!(h.render_count(), 2);
    h.frame(1_000.0);
    h.frame(16.0);
    let settled = h.render_count();
    h.frame(16.0);
    assert_eq!(h.render_count(), settled);
    assert!(!h.editor.is_animating());
}

#[test]
fn test_spawn_animation_scales_in() {
    let mut h = TestHarness::new();
    let id = h.add_box();
    assert_eq!(h.editor.get(&id).unwrap().visual.spawn_factor, 0.0);
    h.frame(150.0);
    let mid = h.editor.get(&id).unwrap().visual.spawn_factor;
    assert!(mid > 0.0 && mid < 1.0);
    h.frame(500.0);
    assert_eq!(h.editor.get(&id).unwrap().visual.spawn_factor, 1.0);
}

#[test]
fn test_placement_exhaustion_emits_notice() {
    let mut settings = scene_editor_lib::state::EditorSettings::default();
    settings.workspace.min = [0.0, 0.0, 0.0];
    settings.workspace.max = [0.0, 50.0, 0.0];
    let mut h = TestHarness::with_settings(settings);
    h.add_box();
    h.observer.take();

    let out = h.editor.add_object(EntityKind::Box);
    assert!(out.placement.needs_notice());
    assert_eq!(out.placement.position, [0.0, 0.5, 0.0]);
    assert_eq!(h.observer.notices().len(), 1);
}
