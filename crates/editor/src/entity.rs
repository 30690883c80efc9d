//! Editable scene entities.

use shared::{EntityId, EntityKind, Transform};

/// Highlight currently applied to an entity by the selection manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Hover,
    Selected,
}

/// Render-side state. Never persisted, never compared for history equality.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    /// Whether the entity's material can show a highlight; fixed at creation
    pub supports_highlight: bool,
    pub highlight: Highlight,
    /// Multiplier applied on top of `scale` while the spawn animation runs
    pub spawn_factor: f64,
}

impl VisualState {
    /// Initial state for a freshly built entity of `kind`
    pub fn for_kind(kind: EntityKind) -> Self {
        Self {
            supports_highlight: kind.supports_highlight(),
            highlight: Highlight::None,
            spawn_factor: 1.0,
        }
    }
}

/// One editable primitive mesh
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    /// Position, rotation (radians) and scale
    pub transform: Transform,
    /// 0xRRGGBB
    pub color: u32,
    /// Creation time, epoch ms. Informational only.
    pub created_at: i64,
    pub visual: VisualState,
}

impl Entity {
    /// Create an entity with a fresh id, default name and kind color.
    pub fn new(kind: EntityKind, transform: Transform, created_at: i64) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        Self::with_id(id, kind, transform, created_at)
    }

    pub fn with_id(id: EntityId, kind: EntityKind, transform: Transform, created_at: i64) -> Self {
        let name = default_name(kind, &id);
        Self {
            id,
            kind,
            name,
            transform,
            color: kind.default_color(),
            created_at,
            visual: VisualState::for_kind(kind),
        }
    }

    pub fn position(&self) -> [f64; 3] {
        self.transform.position
    }

    pub fn rotation_degrees(&self) -> [f64; 3] {
        self.transform.rotation.map(f64::to_degrees)
    }

    pub fn scale(&self) -> [f64; 3] {
        self.transform.scale
    }

    /// Same identity and persisted fields; visual state is ignored.
    pub fn same_content(&self, other: &Entity) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.name == other.name
            && self.transform == other.transform
            && self.color == other.color
    }
}

/// `"{Kind}-{first 8 chars of id}"`
pub fn default_name(kind: EntityKind, id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    format!("{}-{}", kind.label(), prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_uses_id_prefix() {
        let e = Entity::with_id(
            "1234567890ab".to_string(),
            EntityKind::Sphere,
            Transform::new(),
            0,
        );
        assert_eq!(e.name, "Sphere-12345678");
        assert_eq!(e.color, EntityKind::Sphere.default_color());
    }

    #[test]
    fn test_new_generates_unique_ids() {
        let a = Entity::new(EntityKind::Box, Transform::new(), 0);
        let b = Entity::new(EntityKind::Box, Transform::new(), 0);
        assert_ne!(a.id, b.id);
        assert!(a.name.starts_with("Box-"));
    }

    #[test]
    fn test_same_content_ignores_visual_state() {
        let a = Entity::new(EntityKind::Cylinder, Transform::new(), 5);
        let mut b = a.clone();
        b.visual.highlight = Highlight::Selected;
        b.visual.spawn_factor = 0.2;
        assert!(a.same_content(&b));
        b.transform.position[0] = 1.0;
        assert!(!a.same_content(&b));
    }

    #[test]
    fn test_visual_state_set_from_kind() {
        for &kind in EntityKind::all() {
            let e = Entity::new(kind, Transform::new(), 0);
            assert_eq!(e.visual.supports_highlight, kind.supports_highlight());
            assert_eq!(e.visual.highlight, Highlight::None);
            assert_eq!(e.visual.spawn_factor, 1.0);
        }
    }

    #[test]
    fn test_rotation_degrees() {
        let mut e = Entity::new(EntityKind::Box, Transform::new(), 0);
        e.transform.rotation = [std::f64::consts::FRAC_PI_2, 0.0, 0.0];
        assert!((e.rotation_degrees()[0] - 90.0).abs() < 1e-9);
    }
}
