use shared::EntityId;

use crate::entity::Entity;

/// Ordered collection of the entities that exist in the scene.
///
/// A pure container: no validation happens here. Insertion order only keeps
/// iteration stable.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    entities: Vec<Entity>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity. An entity whose id is already present replaces the old
    /// one in place, so the registry never holds duplicate ids.
    pub fn add(&mut self, entity: Entity) {
        if let Some(existing) = self.get_mut(&entity.id) {
            *existing = entity;
        } else {
            self.entities.push(entity);
        }
    }

    /// Remove by id. Returns the removed entity, or `None` if absent.
    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        let pos = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(pos))
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Read-only view in insertion order
    pub fn all(&self) -> &[Entity] {
        &self.entities
    }

    /// Swap the whole contents in one step.
    pub fn replace_all(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id.clone()).collect()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }
}
