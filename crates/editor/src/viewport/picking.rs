use glam::{DQuat, DVec3, EulerRot};
use shared::{CameraState, EntityId};

use super::camera;
use super::{ScreenPoint, Viewport};
use crate::entity::Entity;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: DVec3, half: DVec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing all points
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    /// Center of the bounding box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Strict overlap on every axis. Boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Same extents moved so the center sits at `center`
    pub fn recentered(&self, center: DVec3) -> Self {
        Self::from_center_half_extents(center, self.size() * 0.5)
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let inv_dir = DVec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Bounding-volume query used by overlap search and camera framing.
pub trait BoundingVolumes {
    fn bounding_box_of(&self, entity: &Entity) -> Aabb;
}

/// World-space boxes derived from each kind's intrinsic extents, scale and rotation
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveBounds;

impl BoundingVolumes for PrimitiveBounds {
    fn bounding_box_of(&self, entity: &Entity) -> Aabb {
        let t = &entity.transform;
        let half = DVec3::from(entity.kind.half_extents()) * DVec3::from(t.scale);
        let center = DVec3::from(t.position);
        if t.rotation.iter().all(|r| *r == 0.0) {
            return Aabb::from_center_half_extents(center, half);
        }

        let rot = DQuat::from_euler(EulerRot::XYZ, t.rotation[0], t.rotation[1], t.rotation[2]);
        let corners = (0..8).map(|i| {
            let corner = DVec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            );
            center + rot * corner
        });
        Aabb::from_points(corners)
    }
}

/// One ray intersection, nearest first in a `cast_ray` result
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub id: EntityId,
    pub distance: f64,
}

/// What a ray caster needs to know about the current view
pub struct ViewContext<'a> {
    pub camera: &'a CameraState,
    pub viewport: Viewport,
    pub entities: &'a [Entity],
}

/// Given a screen point, return intersected entities ordered by distance.
pub trait RayCaster {
    fn cast_ray(&self, point: ScreenPoint, view: &ViewContext<'_>) -> Vec<RayHit>;
}

/// Ray caster that unprojects through the camera and slab-tests bounding boxes
pub struct BoundsPicker<B: BoundingVolumes = PrimitiveBounds> {
    bounds: B,
}

impl BoundsPicker<PrimitiveBounds> {
    pub fn new() -> Self {
        Self {
            bounds: PrimitiveBounds,
        }
    }
}

impl Default for BoundsPicker<PrimitiveBounds> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BoundingVolumes> BoundsPicker<B> {
    pub fn with_bounds(bounds: B) -> Self {
        Self { bounds }
    }
}

impl<B: BoundingVolumes> RayCaster for BoundsPicker<B> {
    fn cast_ray(&self, point: ScreenPoint, view: &ViewContext<'_>) -> Vec<RayHit> {
        let ray = camera::screen_ray(view.camera, point, view.viewport);
        let mut hits: Vec<RayHit> = view
            .entities
            .iter()
            .filter_map(|entity| {
                let aabb = self.bounds.bounding_box_of(entity);
                ray_aabb(&ray, &aabb).map(|distance| RayHit {
                    id: entity.id.clone(),
                    distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{EntityKind, Transform};

    fn unit_box_at(id: &str, pos: [f64; 3]) -> Entity {
        Entity::with_id(id.to_string(), EntityKind::Box, Transform::at(pos), 0)
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let aabb = Aabb::from_center_half_extents(DVec3::ZERO, DVec3::splat(0.5));
        let hit = Ray {
            origin: DVec3::new(0.0, 0.0, 5.0),
            direction: DVec3::new(0.0, 0.0, -1.0),
        };
        assert!((ray_aabb(&hit, &aabb).unwrap() - 4.5).abs() < 1e-9);

        let miss = Ray {
            origin: DVec3::new(3.0, 0.0, 5.0),
            direction: DVec3::new(0.0, 0.0, -1.0),
        };
        assert!(ray_aabb(&miss, &aabb).is_none());
    }

    #[test]
    fn test_touching_boxes_do_not_intersect() {
        let a = Aabb::from_center_half_extents(DVec3::ZERO, DVec3::splat(0.5));
        let b = Aabb::from_center_half_extents(DVec3::new(1.0, 0.0, 0.0), DVec3::splat(0.5));
        let c = Aabb::from_center_half_extents(DVec3::new(0.9, 0.0, 0.0), DVec3::splat(0.5));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_primitive_bounds_scale_and_rotation() {
        let mut e = unit_box_at("a", [0.0, 0.5, 0.0]);
        e.transform.scale = [2.0, 1.0, 1.0];
        let aabb = PrimitiveBounds.bounding_box_of(&e);
        assert!((aabb.size().x - 2.0).abs() < 1e-9);

        e.transform.scale = [1.0, 1.0, 1.0];
        e.transform.rotation = [0.0, std::f64::consts::FRAC_PI_4, 0.0];
        let rotated = PrimitiveBounds.bounding_box_of(&e);
        assert!((rotated.size().x - 2.0_f64.sqrt()).abs() < 1e-9);
        assert!((rotated.size().y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_picker_orders_by_distance() {
        let camera = CameraState {
            position: [0.0, 0.5, 10.0],
            target: [0.0, 0.5, 0.0],
            fov: 50.0,
        };
        let entities = vec![
            unit_box_at("far", [0.0, 0.5, 0.0]),
            unit_box_at("near", [0.0, 0.5, 4.0]),
        ];
        let view = ViewContext {
            camera: &camera,
            viewport: Viewport::new(800.0, 600.0),
            entities: &entities,
        };
        let hits = BoundsPicker::new().cast_ray(ScreenPoint::new(400.0, 300.0), &view);
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);

        let none = BoundsPicker::new().cast_ray(ScreenPoint::new(0.0, 0.0), &view);
        assert!(none.is_empty());
    }
}
