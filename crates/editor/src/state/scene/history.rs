//! Undo/redo functionality

use super::SceneEditor;
use crate::state::history::SceneSnapshot;

impl SceneEditor {
    /// Save the current state to the undo stack. Call once per logical action.
    /// A drag still in progress is committed first as its own entry.
    pub fn record(&mut self) {
        self.end_drag();
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    /// Undo last change
    pub fn undo(&mut self) -> bool {
        if self.selection.is_dragging() {
            return false;
        }
        let with_camera = self.history.peek_undo().is_some_and(|s| s.camera().is_some());
        let current = SceneSnapshot::capture(&self.registry, with_camera.then_some(&self.camera));
        match self.history.undo(current) {
            Some(previous) => {
                self.load_snapshot(previous);
                tracing::debug!("Undo ({} left)", self.history.undo_len());
                true
            }
            None => false,
        }
    }

    /// Redo last undone change
    pub fn redo(&mut self) -> bool {
        if self.selection.is_dragging() {
            return false;
        }
        let with_camera = self.history.peek_redo().is_some_and(|s| s.camera().is_some());
        let current = SceneSnapshot::capture(&self.registry, with_camera.then_some(&self.camera));
        match self.history.redo(current) {
            Some(next) => {
                self.load_snapshot(next);
                tracing::debug!("Redo ({} left)", self.history.redo_len());
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Swap the whole registry for `snapshot`. Selection is cleared first.
    pub(crate) fn load_snapshot(&mut self, snapshot: SceneSnapshot) {
        self.animator.cancel_all();
        self.drag_start = None;
        let change = self.selection.reset(&mut self.registry);
        let (entities, camera) = snapshot.into_parts();
        self.registry.replace_all(entities);
        if let Some(camera) = camera {
            self.camera = camera;
        }
        self.emit_selection(change);
        self.commit();
    }
}

#[cfg(test)]
mod tests {
    use shared::EntityKind;

    use super::*;
    use crate::state::settings::EditorSettings;

    fn same(a: &SceneEditor, b: &[crate::entity::Entity]) -> bool {
        a.objects().len() == b.len() && a.objects().iter().zip(b).all(|(x, y)| x.same_content(y))
    }

    #[test]
    fn test_record_then_undo_restores() {
        let mut e = SceneEditor::default();
        e.add_object(EntityKind::Box);
        let before = e.objects().to_vec();

        e.record();
        e.registry.clear();
        assert!(e.undo());
        assert!(same(&e, &before));
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut e = SceneEditor::default();
        e.add_object(EntityKind::Box);
        e.add_object(EntityKind::Sphere);
        let after = e.objects().to_vec();

        assert!(e.undo());
        assert_eq!(e.object_count(), 1);
        assert!(e.redo());
        assert!(same(&e, &after));
        assert!(!e.redo());
    }

    #[test]
    fn test_undo_clears_selection() {
        let mut e = SceneEditor::default();
        e.add_object(EntityKind::Box);
        let id = e.add_object(EntityKind::Box).id;
        assert_eq!(e.selected_id(), Some(id.as_str()));
        e.undo();
        assert!(e.selected_id().is_none());
    }

    #[test]
    fn test_history_limit_from_settings() {
        let mut settings = EditorSettings::default();
        settings.history.limit = 3;
        let mut e = SceneEditor::new(settings);
        for _ in 0..8 {
            e.add_object(EntityKind::Box);
        }
        assert_eq!(e.history.undo_len(), 3);
        for _ in 0..3 {
            assert!(e.undo());
        }
        assert!(!e.undo());
        assert_eq!(e.object_count(), 5);
    }
}
