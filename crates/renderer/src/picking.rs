//! Ray picking of placed objects for pointer hover and click.

use engine_core::{PickBounds, Transform};
use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::camera::CameraController;

/// A ray in world space. `direction` is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Ray from the camera through a cursor position in window pixels.
    pub fn from_screen(camera: &CameraController, cursor: Vec2, viewport: Vec2) -> Self {
        let ndc = Vec2::new(
            2.0 * cursor.x / viewport.x.max(1.0) - 1.0,
            1.0 - 2.0 * cursor.y / viewport.y.max(1.0),
        );
        let inv: Mat4 = camera.view_projection_matrix().inverse();
        let near = inv * ndc.extend(0.0).extend(1.0);
        let far = inv * ndc.extend(1.0).extend(1.0);
        let near = near.xyz() / near.w;
        let far = far.xyz() / far.w;
        Ray::new(near, far - near)
    }
}

/// Result of a pick query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit<K> {
    /// The object that was hit.
    pub key: K,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
}

/// Distance along `ray` to an oriented box, or `None` on a miss.
pub fn intersect_box(ray: &Ray, pose: &Transform, bounds: &PickBounds) -> Option<f32> {
    // Move the ray into the box's local frame, where the box is axis aligned.
    let inv_rot = pose.rotation.inverse();
    let scale = pose.scale.max(Vec3::splat(f32::EPSILON));
    let origin = inv_rot * (ray.origin - pose.position) / scale;
    let dir = inv_rot * ray.direction / scale;

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, h) = (origin[axis], dir[axis], bounds.half_extents[axis]);
        if d.abs() < 1e-8 {
            if o.abs() > h {
                return None;
            }
            continue;
        }
        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        return None;
    }
    // Local t equals world t: the direction was transformed, not renormalized.
    Some(t_min.max(0.0))
}

/// Nearest hit among `candidates`.
pub fn pick_nearest<K: Copy>(
    ray: &Ray,
    candidates: impl IntoIterator<Item = (K, Transform, PickBounds)>,
) -> Option<PickHit<K>> {
    candidates
        .into_iter()
        .filter_map(|(key, pose, bounds)| {
            intersect_box(ray, &pose, &bounds).map(|distance| PickHit {
                key,
                distance,
                point: ray.point_at(distance),
            })
        })
        .min_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraTarget, Smoothing};

    fn unit_box() -> PickBounds {
        PickBounds::new(Vec3::splat(0.5))
    }

    #[test]
    fn ray_hits_box_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let d = intersect_box(&ray, &Transform::default(), &unit_box());
        assert!((d.unwrap_or(f32::NAN) - 4.5).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_box_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(intersect_box(&ray, &Transform::default(), &unit_box()).is_none());
    }

    #[test]
    fn rotated_box_respects_orientation() {
        // A thin slab rotated a quarter turn about Y now spans Z instead of X.
        let pose = Transform::from_position_yaw(Vec3::ZERO, std::f32::consts::FRAC_PI_2);
        let slab = PickBounds::new(Vec3::new(1.0, 0.5, 0.05));
        let along_z = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let d = intersect_box(&along_z, &pose, &slab).unwrap_or(f32::NAN);
        assert!((d - 4.0).abs() < 1e-4);
    }

    #[test]
    fn nearest_candidate_wins() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);
        let hit = pick_nearest(
            &ray,
            [
                ("far", Transform::from_position(Vec3::new(0.0, 0.0, -2.0)), unit_box()),
                ("near", Transform::from_position(Vec3::new(0.0, 0.0, 2.0)), unit_box()),
            ],
        );
        assert_eq!(hit.map(|h| h.key), Some("near"));
    }

    #[test]
    fn screen_centre_ray_follows_view_direction() {
        let cam = CameraController::new(
            CameraTarget::new(Vec3::new(5.0, 4.0, 5.0), Vec3::new(0.0, 0.8, 0.0)),
            Smoothing::default(),
            50.0,
        );
        let ray = Ray::from_screen(&cam, Vec2::new(640.0, 360.0), Vec2::new(1280.0, 720.0));
        let expected = (cam.look_at() - cam.position()).normalize();
        assert!(ray.direction.dot(expected) > 0.9999);
    }
}
