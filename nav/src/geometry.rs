//! Pure geometry helpers shared by the scanner, input adapters, and resolver.
//!
//! Everything here is stateless. "Planar" means the XZ plane; Y is up.

use nalgebra as na;

use crate::collision::{
    settings::DIST_EPS,
    types::{Quat, Vec2, Vec3},
};
use crate::constants::YAW_EPS;

/// Drop the vertical component.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Project a world position onto the XZ plane as a 2D vector `(x, z)`.
#[inline]
pub fn to_planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Planar (XZ) distance between two world positions (meters).
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    (to_planar(b) - to_planar(a)).norm()
}

/// A finite line segment in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    #[inline]
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Closest point on the segment to `p` (clamped, never beyond either endpoint).
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        closest_point_on_segment(p, self.start, self.end)
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).norm()
    }
}

/// Closest point to `p` on the finite segment `a..b`.
///
/// A degenerate segment (`a == b`) returns `a`.
pub fn closest_point_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= DIST_EPS * DIST_EPS {
        return a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Planar unit direction from `zone` toward `target`: the way the target has to be pushed
/// *from*, so standing further along it puts the target between the agent and the zone.
///
/// Returns `None` when the two positions coincide in the plane.
pub fn push_direction(target: Vec3, zone: Vec3) -> Option<Vec3> {
    flatten(target - zone).try_normalize(DIST_EPS)
}

/// Segment behind `target` (as seen from `zone`) where an agent can line up a push.
///
/// Starts `offset` meters past the target along the zone→target line and extends a further
/// `length` meters.
pub fn interception_segment(target: Vec3, push_dir: Vec3, offset: f32, length: f32) -> Segment {
    let start = target + push_dir * offset;
    Segment::new(start, start + push_dir * length)
}

/// Planar unit vector perpendicular to `dir` (rotated +90° about Y).
#[inline]
pub fn perpendicular(dir: Vec3) -> Vec3 {
    Vec3::new(-dir.z, 0.0, dir.x)
}

/// Point `lateral` meters to the side of `origin`, perpendicular to `dir`, on whichever side
/// is nearer to `toward`. Ties go to the +90° side.
pub fn perpendicular_offset_point(origin: Vec3, dir: Vec3, lateral: f32, toward: Vec3) -> Vec3 {
    let side = perpendicular(dir);
    let left = origin + side * lateral;
    let right = origin - side * lateral;
    if (toward - right).norm_squared() < (toward - left).norm_squared() {
        right
    } else {
        left
    }
}

/// Yaw (radians about +Y) that faces the planar direction `xz`, or `None` if too small.
///
/// Convention: forward is -Z, so yaw = atan2(-x, -z).
pub fn yaw_from_xz(xz: Vec2) -> Option<f32> {
    if xz.norm_squared() > YAW_EPS {
        return Some((-xz[0]).atan2(-xz[1]));
    }

    None
}

/// Yaw-only rotation facing the planar part of `dir`, or `None` if it has no planar part.
pub fn facing_from_direction(dir: Vec3) -> Option<Quat> {
    yaw_from_xz(to_planar(dir)).map(|yaw| Quat::from_axis_angle(&na::Vector3::y_axis(), yaw))
}

/// Rotate a 2D input axis `(x = right, y = forward)` into a normalized planar world direction.
///
/// `body_rotation` is the body's fixed yaw; the zero axis maps to the zero vector.
pub fn world_direction_from_axis(axis: Vec2, body_rotation: &Quat) -> Vec3 {
    let local = Vec3::new(axis.x, 0.0, axis.y);
    flatten(body_rotation * local)
        .try_normalize(DIST_EPS)
        .unwrap_or_else(Vec3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0))]
    #[case(Vec3::new(15.0, 0.0, 3.0), Vec3::new(10.0, 0.0, 0.0))]
    #[case(Vec3::new(4.0, 0.0, 7.0), Vec3::new(4.0, 0.0, 0.0))]
    fn closest_point_is_clamped_to_segment(#[case] p: Vec3, #[case] expected: Vec3) {
        let seg = Segment::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(seg.closest_point(p), expected, epsilon = 1.0e-6);
    }

    #[test]
    fn closest_point_on_degenerate_segment_is_start() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(closest_point_on_segment(Vec3::zeros(), a, a), a);
    }

    #[test]
    fn closest_point_never_leaves_segment() {
        let seg = Segment::new(Vec3::new(1.0, 0.0, -2.0), Vec3::new(-3.0, 0.0, 4.0));
        for i in -20..=20 {
            for j in -20..=20 {
                let p = Vec3::new(i as f32 * 0.7, 0.0, j as f32 * 0.9);
                let c = seg.closest_point(p);
                let along = (c - seg.start).norm() + (seg.end - c).norm();
                assert_relative_eq!(along, seg.length(), epsilon = 1.0e-4);
            }
        }
    }

    #[test]
    fn interception_segment_extends_past_target() {
        let target = Vec3::new(10.0, 0.0, 10.0);
        let dir = push_direction(target, Vec3::zeros()).expect("distinct points");
        let seg = interception_segment(target, dir, 2.0, 2.0);

        assert_relative_eq!((seg.start - target).norm(), 2.0, epsilon = 1.0e-5);
        assert_relative_eq!((seg.end - target).norm(), 4.0, epsilon = 1.0e-5);
        // Further from the zone than the target itself.
        assert!(seg.start.norm() > target.norm());
    }

    #[test]
    fn push_direction_ignores_height_and_rejects_coincident() {
        let d = push_direction(Vec3::new(3.0, 5.0, 4.0), Vec3::zeros()).expect("distinct");
        assert_relative_eq!(d, Vec3::new(0.6, 0.0, 0.8), epsilon = 1.0e-6);
        assert!(push_direction(Vec3::new(1.0, 4.0, 1.0), Vec3::new(1.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn perpendicular_offset_picks_nearer_side() {
        let origin = Vec3::zeros();
        let dir = Vec3::x();
        let up_side = perpendicular_offset_point(origin, dir, 2.0, Vec3::new(0.0, 0.0, 5.0));
        let down_side = perpendicular_offset_point(origin, dir, 2.0, Vec3::new(0.0, 0.0, -5.0));

        assert_relative_eq!(up_side, Vec3::new(0.0, 0.0, 2.0), epsilon = 1.0e-6);
        assert_relative_eq!(down_side, Vec3::new(0.0, 0.0, -2.0), epsilon = 1.0e-6);
    }

    #[test]
    fn axis_maps_forward_to_positive_z() {
        let dir = world_direction_from_axis(Vec2::new(0.0, 1.0), &Quat::identity());
        assert_relative_eq!(dir, Vec3::z(), epsilon = 1.0e-6);
        assert_eq!(
            world_direction_from_axis(Vec2::zeros(), &Quat::identity()),
            Vec3::zeros()
        );
    }

    #[test]
    fn yaw_faces_minus_z_at_zero() {
        assert_relative_eq!(yaw_from_xz(Vec2::new(0.0, -1.0)).unwrap_or(1.0), 0.0);
        assert!(yaw_from_xz(Vec2::zeros()).is_none());
    }
}
