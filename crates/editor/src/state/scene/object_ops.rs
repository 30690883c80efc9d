//! Create, delete, duplicate and restyle entities

use glam::DVec3;
use shared::{EntityKind, Transform};

use super::SceneEditor;
use crate::entity::Entity;
use crate::placement::{self, Placement, PlacementOptions, PlacementRequest};
use crate::viewport::Aabb;

/// Result of adding an entity
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub id: String,
    pub placement: Placement,
}

impl SceneEditor {
    /// Add an entity of `kind` using the configured placement defaults
    pub fn add_object(&mut self, kind: EntityKind) -> AddOutcome {
        self.add_object_with(PlacementRequest::new(kind), None)
    }

    /// Add an entity, overriding placement options for this call only
    pub fn add_object_with(
        &mut self,
        request: PlacementRequest,
        options: Option<PlacementOptions>,
    ) -> AddOutcome {
        let kind = request.kind;
        self.spawn(request, options, |position, now| {
            Entity::new(kind, Transform::at(position), now)
        })
    }

    /// Copy the selected entity next to the original. Returns `None` with nothing selected.
    pub fn duplicate_selected(&mut self) -> Option<AddOutcome> {
        let id = self.selection.selected()?.clone();
        let source = self.registry.get(&id)?.clone();

        let geometry = self
            .bounds
            .bounding_box_of(&source)
            .recentered(DVec3::ZERO);
        let request = PlacementRequest::new(source.kind)
            .at(source.transform.position)
            .with_geometry(geometry);

        let outcome = self.spawn(request, None, |position, now| {
            let mut copy = Entity::new(source.kind, source.transform.clone(), now);
            copy.transform.position = position;
            copy.name = format!("{} copy", source.name);
            copy.color = source.color;
            copy
        });
        tracing::info!("Duplicated {id} as {}", outcome.id);
        Some(outcome)
    }

    fn spawn(
        &mut self,
        request: PlacementRequest,
        options: Option<PlacementOptions>,
        build: impl FnOnce([f64; 3], i64) -> Entity,
    ) -> AddOutcome {
        let options = options.unwrap_or_else(|| self.settings.placement.clone());
        let existing: Vec<Aabb> = self
            .registry
            .all()
            .iter()
            .map(|e| self.bounds.bounding_box_of(e))
            .collect();
        let placement = placement::place(&request, &existing, &options, &self.settings.workspace);

        self.record();
        let now = self.now_ms();
        let entity = build(placement.position, now as i64);
        let id = entity.id.clone();
        self.registry.add(entity);
        tracing::info!("Added {} {id} at {:?}", request.kind, placement.position);

        let spawn_ms = self.settings.animation.spawn_ms;
        self.animator
            .animate_spawn(&id, &mut self.registry, now, spawn_ms);
        let change = self.selection.select(&id, &mut self.registry);
        self.emit_selection(change);

        if placement.needs_notice() {
            self.emit_notice(
                "Position adjusted: no free spot found, the new object may overlap others",
            );
        }
        self.commit();
        AddOutcome { id, placement }
    }

    /// Remove an entity. Unknown ids are ignored.
    pub fn delete_object(&mut self, id: &str) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        self.record();
        let change = self.selection.forget(id);
        self.animator.cancel_spawn(id);
        self.registry.remove(id);
        tracing::info!("Deleted {id}");
        self.emit_selection(change);
        self.commit();
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selection.selected().cloned() {
            Some(id) => self.delete_object(&id),
            None => false,
        }
    }

    /// Remove every entity. A no-op on an empty scene.
    pub fn clear_scene(&mut self) -> bool {
        if self.registry.is_empty() {
            return false;
        }
        self.record();
        let change = self.selection.reset(&mut self.registry);
        for id in self.registry.ids() {
            self.animator.cancel_spawn(&id);
        }
        self.registry.clear();
        tracing::info!("Scene cleared");
        self.emit_selection(change);
        self.commit();
        true
    }

    /// Rename an entity. Blank names are rejected.
    pub fn rename_object(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        match self.registry.get(id) {
            Some(entity) if !name.is_empty() && entity.name != name => {}
            _ => return false,
        }
        self.record();
        if let Some(entity) = self.registry.get_mut(id) {
            entity.name = name.to_string();
        }
        self.commit();
        true
    }

    /// Set the 0xRRGGBB color of an entity
    pub fn set_color(&mut self, id: &str, color: u32) -> bool {
        if color > 0xFF_FFFF {
            return false;
        }
        match self.registry.get(id) {
            Some(entity) if entity.color != color => {}
            _ => return false,
        }
        self.record();
        if let Some(entity) = self.registry.get_mut(id) {
            entity.color = color;
        }
        self.commit();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementStatus;

    fn editor() -> SceneEditor {
        SceneEditor::default()
    }

    #[test]
    fn test_add_default_box() {
        let mut e = editor();
        let out = e.add_object(EntityKind::Box);
        assert_eq!(e.object_count(), 1);
        assert_eq!(e.get(&out.id).unwrap().position(), [0.0, 0.5, 0.0]);
        assert_eq!(e.selection.selected(), Some(&out.id));
        assert!(e.history.can_undo());
    }

    #[test]
    fn test_second_add_moves_off_first() {
        let mut e = editor();
        e.add_object(EntityKind::Box);
        let options = PlacementOptions {
            check_overlap: true,
            grid_size: 1.0,
            snap_to_grid: false,
        };
        let out = e.add_object_with(PlacementRequest::new(EntityKind::Box), Some(options));
        assert_ne!(e.get(&out.id).unwrap().position(), [0.0, 0.5, 0.0]);
        assert!(matches!(out.placement.status, PlacementStatus::Relocated { .. }));
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut e = editor();
        let out = e.add_object(EntityKind::Sphere);
        assert!(e.delete_selected());
        assert!(e.get(&out.id).is_none());
        assert!(e.selection.selected().is_none());
        assert!(!e.delete_object("missing"));
    }

    #[test]
    fn test_duplicate_copies_style() {
        let mut e = editor();
        let out = e.add_object(EntityKind::Cylinder);
        e.set_color(&out.id, 0x112233);
        let copy = e.duplicate_selected().unwrap();
        let copied = e.get(&copy.id).unwrap();
        assert_eq!(copied.color, 0x112233);
        assert_eq!(copied.kind, EntityKind::Cylinder);
        assert!(copied.name.ends_with(" copy"));
        assert_ne!(copied.position(), [0.0, 0.5, 0.0]);
        assert_eq!(e.selection.selected(), Some(&copy.id));
    }

    #[test]
    fn test_rename_and_color_validation() {
        let mut e = editor();
        let out = e.add_object(EntityKind::Box);
        assert!(!e.rename_object(&out.id, "   "));
        assert!(e.rename_object(&out.id, " Crate "));
        assert_eq!(e.get(&out.id).unwrap().name, "Crate");
        assert!(!e.rename_object(&out.id, "Crate"));
        assert!(!e.set_color(&out.id, 0x1000000));
    }

    #[test]
    fn test_clear_scene() {
        let mut e = editor();
        assert!(!e.clear_scene());
        e.add_object(EntityKind::Box);
        e.add_object(EntityKind::Box);
        assert!(e.clear_scene());
        assert_eq!(e.object_count(), 0);
        assert!(e.selection.selected().is_none());
    }
}
