use glam::{DMat4, DVec3, DVec4};
use shared::CameraState;

use super::picking::{Aabb, Ray};
use super::{ScreenPoint, Viewport};

const NEAR: f64 = 0.1;
const FAR: f64 = 1000.0;

/// Camera position in world space
pub fn eye_position(camera: &CameraState) -> DVec3 {
    DVec3::from(camera.position)
}

/// View matrix (world -> camera)
pub fn view_matrix(camera: &CameraState) -> DMat4 {
    DMat4::look_at_rh(eye_position(camera), DVec3::from(camera.target), DVec3::Y)
}

/// Projection matrix (camera -> clip), `fov` is vertical and in degrees
pub fn projection_matrix(camera: &CameraState, aspect: f64) -> DMat4 {
    DMat4::perspective_rh_gl(camera.fov.to_radians(), aspect, NEAR, FAR)
}

/// Combined view-projection matrix
pub fn view_projection(camera: &CameraState, aspect: f64) -> DMat4 {
    projection_matrix(camera, aspect) * view_matrix(camera)
}

/// Project a 3D point to screen coordinates (origin top-left)
pub fn project(camera: &CameraState, point: DVec3, viewport: Viewport) -> Option<ScreenPoint> {
    let vp = view_projection(camera, viewport.aspect());
    let p = vp * point.extend(1.0);
    if p.w <= 0.0 {
        return None;
    }
    let ndc = p.truncate() / p.w;
    Some(ScreenPoint::new(
        (ndc.x + 1.0) * 0.5 * viewport.width,
        (1.0 - ndc.y) * 0.5 * viewport.height,
    ))
}

/// Cast a ray from a screen position into the 3D scene
pub fn screen_ray(camera: &CameraState, point: ScreenPoint, viewport: Viewport) -> Ray {
    // Screen → NDC
    let ndc_x = point.x / viewport.width * 2.0 - 1.0;
    let ndc_y = 1.0 - point.y / viewport.height * 2.0;

    let vp_inv = view_projection(camera, viewport.aspect()).inverse();

    let near_world = vp_inv * DVec4::new(ndc_x, ndc_y, -1.0, 1.0);
    let far_world = vp_inv * DVec4::new(ndc_x, ndc_y, 1.0, 1.0);

    let near = near_world.truncate() / near_world.w;
    let far = far_world.truncate() / far_world.w;

    Ray {
        origin: eye_position(camera),
        direction: (far - near).normalize_or_zero(),
    }
}

/// Camera looking at `aabb` from the current viewing direction, far enough
/// back that the whole box fits the vertical field of view.
pub fn framing_for(camera: &CameraState, aabb: &Aabb) -> CameraState {
    let center = aabb.center();
    let radius = (aabb.size().length() * 0.5).max(0.5);
    let half_fov = (camera.fov.to_radians() * 0.5).max(0.01);
    let distance = (radius / half_fov.sin() * 1.2).max(2.0);

    let mut direction = (eye_position(camera) - DVec3::from(camera.target)).normalize_or_zero();
    if direction == DVec3::ZERO {
        direction = DVec3::new(0.0, 0.5, 1.0).normalize();
    }

    CameraState {
        position: (center + direction * distance).to_array(),
        target: center.to_array(),
        fov: camera.fov,
    }
}

/// Interpolate position, target and fov
pub fn lerp(from: &CameraState, to: &CameraState, t: f64) -> CameraState {
    let mix = |a: [f64; 3], b: [f64; 3]| DVec3::from(a).lerp(DVec3::from(b), t).to_array();
    CameraState {
        position: mix(from.position, to.position),
        target: mix(from.target, to.target),
        fov: from.fov + (to.fov - from.fov) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_camera() -> CameraState {
        CameraState {
            position: [0.0, 0.0, 10.0],
            target: [0.0, 0.0, 0.0],
            fov: 60.0,
        }
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let ray = screen_ray(
            &front_camera(),
            ScreenPoint::new(50.0, 50.0),
            Viewport::new(100.0, 100.0),
        );
        assert!((ray.direction - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
        assert_eq!(ray.origin, DVec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn test_project_target_to_center() {
        let p = project(&front_camera(), DVec3::ZERO, Viewport::new(200.0, 100.0)).unwrap();
        assert!((p.x - 100.0).abs() < 1e-6);
        assert!((p.y - 50.0).abs() < 1e-6);
        let behind = DVec3::new(0.0, 0.0, 20.0);
        assert!(project(&front_camera(), behind, Viewport::new(200.0, 100.0)).is_none());
    }

    #[test]
    fn test_framing_keeps_direction() {
        let aabb = Aabb::from_center_half_extents(DVec3::new(3.0, 0.5, 0.0), DVec3::splat(0.5));
        let framed = framing_for(&front_camera(), &aabb);
        assert_eq!(framed.target, [3.0, 0.5, 0.0]);
        assert!((framed.position[0] - 3.0).abs() < 1e-9);
        assert!(framed.position[2] > 0.0);
        assert_eq!(framed.fov, 60.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = front_camera();
        let mut b = front_camera();
        b.position = [10.0, 0.0, 0.0];
        b.fov = 40.0;
        assert_eq!(lerp(&a, &b, 0.0), a);
        assert_eq!(lerp(&a, &b, 1.0), b);
        assert_eq!(lerp(&a, &b, 0.5).fov, 50.0);
    }
}
