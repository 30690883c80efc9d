//! Bounded linear undo/redo over whole-scene snapshots.

use std::collections::VecDeque;

use shared::CameraState;

use crate::entity::{Entity, Highlight};
use crate::state::registry::ObjectRegistry;

/// Immutable deep copy of the scene at one instant
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    entities: Vec<Entity>,
    camera: Option<CameraState>,
}

impl SceneSnapshot {
    /// Copy every entity (highlights and spawn animation state are dropped).
    pub fn capture(registry: &ObjectRegistry, camera: Option<&CameraState>) -> Self {
        let entities = registry
            .all()
            .iter()
            .cloned()
            .map(|mut e| {
                e.visual.highlight = Highlight::None;
                e.visual.spawn_factor = 1.0;
                e
            })
            .collect();
        Self {
            entities,
            camera: camera.cloned(),
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn camera(&self) -> Option<&CameraState> {
        self.camera.as_ref()
    }

    pub fn into_parts(self) -> (Vec<Entity>, Option<CameraState>) {
        (self.entities, self.camera)
    }

    /// Entity-for-entity equality with the registry, ignoring visual state
    pub fn matches(&self, registry: &ObjectRegistry) -> bool {
        self.entities.len() == registry.len()
            && self
                .entities
                .iter()
                .zip(registry.all())
                .all(|(a, b)| a.same_content(b))
    }
}

/// Undo and redo stacks, each holding at most `limit` snapshots
#[derive(Debug)]
pub struct HistoryManager {
    undo_stack: VecDeque<SceneSnapshot>,
    redo_stack: VecDeque<SceneSnapshot>,
    limit: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(50)
    }
}

impl HistoryManager {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Push the state as it was before a new action. Invalidates the redo branch.
    pub fn record(&mut self, current: SceneSnapshot) {
        push_bounded(&mut self.undo_stack, current, self.limit);
        self.redo_stack.clear();
        tracing::debug!("History recorded ({} undo entries)", self.undo_stack.len());
    }

    /// Returns the snapshot to load, after parking `current` on the redo stack.
    /// `None` (and no change) if there is nothing to undo.
    pub fn undo(&mut self, current: SceneSnapshot) -> Option<SceneSnapshot> {
        let previous = self.undo_stack.pop_back()?;
        push_bounded(&mut self.redo_stack, current, self.limit);
        Some(previous)
    }

    /// Mirror of `undo`.
    pub fn redo(&mut self, current: SceneSnapshot) -> Option<SceneSnapshot> {
        let next = self.redo_stack.pop_back()?;
        push_bounded(&mut self.undo_stack, current, self.limit);
        Some(next)
    }

    /// Snapshot the next `undo` would load
    pub fn peek_undo(&self) -> Option<&SceneSnapshot> {
        self.undo_stack.back()
    }

    pub fn peek_redo(&self) -> Option<&SceneSnapshot> {
        self.redo_stack.back()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<SceneSnapshot>, snapshot: SceneSnapshot, limit: usize) {
    stack.push_back(snapshot);
    while stack.len() > limit {
        stack.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{EntityKind, Transform};

    fn registry_with(n: usize) -> ObjectRegistry {
        let mut r = ObjectRegistry::new();
        for i in 0..n {
            r.add(Entity::with_id(format!("e{i}"), EntityKind::Box, Transform::new(), 0));
        }
        r
    }

    fn snap(r: &ObjectRegistry) -> SceneSnapshot {
        SceneSnapshot::capture(r, None)
    }

    #[test]
    fn test_initial_empty() {
        let h = HistoryManager::default();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.limit(), 50);
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut h = HistoryManager::new(5);
        let r = registry_with(1);
        assert!(h.undo(snap(&r)).is_none());
        assert!(h.redo(snap(&r)).is_none());
        assert_eq!(h.redo_len(), 0);
        assert_eq!(h.undo_len(), 0);
    }

    #[test]
    fn test_undo_redo_exchange() {
        let mut h = HistoryManager::new(5);
        let before = registry_with(1);
        let after = registry_with(2);

        h.record(snap(&before));
        let loaded = h.undo(snap(&after)).unwrap();
        assert!(loaded.matches(&before));
        assert!(h.can_redo());

        let loaded = h.redo(snap(&before)).unwrap();
        assert!(loaded.matches(&after));
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut h = HistoryManager::new(5);
        let r = registry_with(1);
        h.record(snap(&r));
        h.undo(snap(&r));
        assert!(h.can_redo());
        h.record(snap(&r));
        assert!(!h.can_redo());
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let mut h = HistoryManager::new(3);
        for n in 0..5 {
            h.record(snap(&registry_with(n)));
        }
        assert_eq!(h.undo_len(), 3);

        let current = registry_with(5);
        let a = h.undo(snap(&current)).unwrap();
        let b = h.undo(a.clone()).unwrap();
        let c = h.undo(b.clone()).unwrap();
        assert_eq!(a.entities().len(), 4);
        assert_eq!(b.entities().len(), 3);
        assert_eq!(c.entities().len(), 2);
        assert!(h.undo(c).is_none());
    }

    #[test]
    fn test_capture_drops_highlight() {
        let mut r = registry_with(1);
        r.get_mut("e0").unwrap().visual.highlight = Highlight::Selected;
        let s = snap(&r);
        assert_eq!(s.entities()[0].visual.highlight, Highlight::None);
        assert!(s.matches(&r));
    }
}
