//! Single-object selection state machine.
//!
//! Tracks at most one selected and one hovered entity (never the same one),
//! plus the `dragging` flag owned by the transform gizmo. Highlights on the
//! registry's entities are kept in sync with every transition.

use shared::EntityId;

use crate::entity::Highlight;
use crate::state::registry::ObjectRegistry;
use crate::state::settings::PointerSettings;
use crate::viewport::{RayHit, ScreenPoint};

/// Coarse view of the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Hovering(EntityId),
    Selected(EntityId),
}

/// Emitted whenever the selected entity changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<EntityId>,
    pub current: Option<EntityId>,
}

#[derive(Debug, Clone, Copy)]
struct PointerPress {
    point: ScreenPoint,
    time_ms: f64,
}

#[derive(Debug, Default)]
pub struct SelectionManager {
    selected: Option<EntityId>,
    hovered: Option<EntityId>,
    dragging: bool,
    press: Option<PointerPress>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&EntityId> {
        self.hovered.as_ref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Set by the gizmo collaborator at drag start/end
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn phase(&self) -> SelectionPhase {
        match (&self.selected, &self.hovered) {
            (Some(id), _) => SelectionPhase::Selected(id.clone()),
            (None, Some(id)) => SelectionPhase::Hovering(id.clone()),
            (None, None) => SelectionPhase::Idle,
        }
    }

    // ── Pointer-driven transitions ────────────────────────────

    /// Pointer moved: hover the nearest hit unless it is the selection.
    /// Returns true if the hovered entity changed.
    pub fn pointer_move(&mut self, hits: &[RayHit], registry: &mut ObjectRegistry) -> bool {
        if self.dragging {
            return false;
        }
        let target = hits
            .first()
            .map(|hit| hit.id.clone())
            .filter(|id| self.selected.as_ref() != Some(id));
        self.set_hover(target, registry)
    }

    /// Click: a hit on the current selection (anywhere in the hit list) is a no-op,
    /// a hit elsewhere selects the nearest entity, a miss deselects.
    pub fn click(
        &mut self,
        hits: &[RayHit],
        registry: &mut ObjectRegistry,
    ) -> Option<SelectionChange> {
        if self.dragging {
            return None;
        }
        if let Some(selected) = &self.selected {
            if hits.iter().any(|hit| &hit.id == selected) {
                return None;
            }
        }
        match hits.first() {
            Some(hit) => {
                let id = hit.id.clone();
                self.select(&id, registry)
            }
            None => self.deselect(registry),
        }
    }

    pub fn pointer_down(&mut self, point: ScreenPoint, time_ms: f64) {
        self.press = Some(PointerPress { point, time_ms });
    }

    /// Whether the press that ends here counts as a click rather than a drag.
    pub fn pointer_up(
        &mut self,
        point: ScreenPoint,
        time_ms: f64,
        thresholds: &PointerSettings,
    ) -> bool {
        let Some(press) = self.press.take() else {
            return false;
        };
        time_ms - press.time_ms < thresholds.click_max_ms
            && press.point.distance_to(point) < thresholds.click_max_px
    }

    // ── Explicit transitions ──────────────────────────────────

    /// Force `Selected(id)`, bypassing raycasting. Unknown ids are ignored.
    pub fn select(&mut self, id: &str, registry: &mut ObjectRegistry) -> Option<SelectionChange> {
        if !registry.contains(id) || self.is_selected(id) {
            return None;
        }
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        let previous = self.selected.take();
        if let Some(prev) = &previous {
            apply_highlight(registry, prev, Highlight::None);
        }
        apply_highlight(registry, id, Highlight::Selected);
        self.selected = Some(id.to_string());
        tracing::debug!("Selected {id}");
        Some(SelectionChange {
            previous,
            current: self.selected.clone(),
        })
    }

    /// Back to `Idle`. Ignored while a drag is in progress.
    pub fn deselect(&mut self, registry: &mut ObjectRegistry) -> Option<SelectionChange> {
        if self.dragging {
            return None;
        }
        let previous = self.selected.take()?;
        apply_highlight(registry, &previous, Highlight::None);
        tracing::debug!("Deselected {previous}");
        Some(SelectionChange {
            previous: Some(previous),
            current: None,
        })
    }

    /// Drop every reference to `id` (the entity is going away).
    pub fn forget(&mut self, id: &str) -> Option<SelectionChange> {
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        if self.is_selected(id) {
            self.dragging = false;
            return Some(SelectionChange {
                previous: self.selected.take(),
                current: None,
            });
        }
        None
    }

    /// Unconditional reset before the registry contents are swapped out.
    pub fn reset(&mut self, registry: &mut ObjectRegistry) -> Option<SelectionChange> {
        if let Some(id) = self.hovered.take() {
            apply_highlight(registry, &id, Highlight::None);
        }
        self.dragging = false;
        self.press = None;
        let previous = self.selected.take()?;
        apply_highlight(registry, &previous, Highlight::None);
        Some(SelectionChange {
            previous: Some(previous),
            current: None,
        })
    }

    fn set_hover(&mut self, target: Option<EntityId>, registry: &mut ObjectRegistry) -> bool {
        if self.hovered == target {
            return false;
        }
        if let Some(old) = self.hovered.take() {
            apply_highlight(registry, &old, Highlight::None);
        }
        if let Some(id) = &target {
            apply_highlight(registry, id, Highlight::Hover);
        }
        self.hovered = target;
        true
    }
}

fn apply_highlight(registry: &mut ObjectRegistry, id: &str, highlight: Highlight) {
    if let Some(entity) = registry.get_mut(id) {
        if entity.visual.supports_highlight {
            entity.visual.highlight = highlight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use shared::{EntityKind, Transform};

    fn registry(ids: &[&str]) -> ObjectRegistry {
        let mut r = ObjectRegistry::new();
        for id in ids {
            r.add(Entity::with_id(id.to_string(), EntityKind::Box, Transform::new(), 0));
        }
        r
    }

    fn hits(ids: &[&str]) -> Vec<RayHit> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| RayHit {
                id: id.to_string(),
                distance: i as f64 + 1.0,
            })
            .collect()
    }

    #[test]
    fn test_initial_idle() {
        let s = SelectionManager::new();
        assert_eq!(s.phase(), SelectionPhase::Idle);
        assert!(s.selected().is_none());
    }

    #[test]
    fn test_click_selects_nearest() {
        let mut r = registry(&["a", "b"]);
        let mut s = SelectionManager::new();
        let change = s.click(&hits(&["b", "a"]), &mut r).unwrap();
        assert_eq!(change.current.as_deref(), Some("b"));
        assert_eq!(r.get("b").unwrap().visual.highlight, Highlight::Selected);
    }

    #[test]
    fn test_click_on_selected_is_noop_even_if_behind() {
        let mut r = registry(&["a", "b"]);
        let mut s = SelectionManager::new();
        s.select("a", &mut r);
        assert!(s.click(&hits(&["b", "a"]), &mut r).is_none());
        assert!(s.is_selected("a"));
    }

    #[test]
    fn test_click_miss_deselects() {
        let mut r = registry(&["a"]);
        let mut s = SelectionManager::new();
        s.select("a", &mut r);
        let change = s.click(&[], &mut r).unwrap();
        assert_eq!(change.previous.as_deref(), Some("a"));
        assert_eq!(s.phase(), SelectionPhase::Idle);
        assert_eq!(r.get("a").unwrap().visual.highlight, Highlight::None);
    }

    #[test]
    fn test_select_switches_highlight() {
        let mut r = registry(&["a", "b"]);
        let mut s = SelectionManager::new();
        s.select("a", &mut r);
        let change = s.select("b", &mut r).unwrap();
        assert_eq!(change.previous.as_deref(), Some("a"));
        assert_eq!(r.get("a").unwrap().visual.highlight, Highlight::None);
        assert_eq!(r.get("b").unwrap().visual.highlight, Highlight::Selected);
        assert!(s.select("b", &mut r).is_none());
        assert!(s.select("missing", &mut r).is_none());
    }

    #[test]
    fn test_hover_never_equals_selection() {
        let mut r = registry(&["a", "b"]);
        let mut s = SelectionManager::new();
        assert!(s.pointer_move(&hits(&["a"]), &mut r));
        assert_eq!(s.phase(), SelectionPhase::Hovering("a".to_string()));
        assert_eq!(r.get("a").unwrap().visual.highlight, Highlight::Hover);

        s.select("a", &mut r);
        assert!(s.hovered().is_none());

        s.pointer_move(&hits(&["a"]), &mut r);
        assert!(s.hovered().is_none());
        s.pointer_move(&hits(&["b"]), &mut r);
        assert_eq!(s.hovered().map(String::as_str), Some("b"));
        s.pointer_move(&[], &mut r);
        assert!(s.hovered().is_none());
        assert_eq!(r.get("b").unwrap().visual.highlight, Highlight::None);
    }

    #[test]
    fn test_dragging_blocks_pointer_and_deselect() {
        let mut r = registry(&["a", "b"]);
        let mut s = SelectionManager::new();
        s.select("a", &mut r);
        s.set_dragging(true);
        assert!(!s.pointer_move(&hits(&["b"]), &mut r));
        assert!(s.click(&[], &mut r).is_none());
        assert!(s.deselect(&mut r).is_none());
        assert!(s.is_selected("a"));

        // Explicit selection still wins
        assert!(s.select("b", &mut r).is_some());
    }

    #[test]
    fn test_unsupported_highlight_left_alone() {
        let mut r = registry(&["a"]);
        r.get_mut("a").unwrap().visual.supports_highlight = false;
        let mut s = SelectionManager::new();
        s.select("a", &mut r);
        assert!(s.is_selected("a"));
        assert_eq!(r.get("a").unwrap().visual.highlight, Highlight::None);
    }

    #[test]
    fn test_click_vs_drag_thresholds() {
        let t = PointerSettings::default();
        let mut s = SelectionManager::new();

        s.pointer_down(ScreenPoint::new(10.0, 10.0), 1000.0);
        assert!(s.pointer_up(ScreenPoint::new(12.0, 11.0), 1150.0, &t));

        s.pointer_down(ScreenPoint::new(10.0, 10.0), 1000.0);
        assert!(!s.pointer_up(ScreenPoint::new(10.0, 10.0), 1250.0, &t));

        s.pointer_down(ScreenPoint::new(10.0, 10.0), 1000.0);
        assert!(!s.pointer_up(ScreenPoint::new(20.0, 10.0), 1050.0, &t));

        // Release without a press
        assert!(!s.pointer_up(ScreenPoint::new(0.0, 0.0), 0.0, &t));
    }

    #[test]
    fn test_forget_and_reset() {
        let mut r = registry(&["a", "b"]);
        let mut s = SelectionManager::new();
        s.select("a", &mut r);
        s.pointer_move(&hits(&["b"]), &mut r);
        assert!(s.forget("b").is_none());
        assert!(s.hovered().is_none());
        assert!(s.forget("a").is_some());
        assert!(s.selected().is_none());

        s.select("b", &mut r);
        s.set_dragging(true);
        let change = s.reset(&mut r).unwrap();
        assert_eq!(change.previous.as_deref(), Some("b"));
        assert!(!s.is_dragging());
    }
}
