/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- walls (immutable arena geometry and the probe seam)
- narrow_phase (parry3d shape casts)
- resolver (probe-and-slide)
- higher-level agent and scanner code
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Vec2 = na::Vector2<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Build a translation-only isometry at `pos`.
#[inline]
pub fn iso_at(pos: Vec3) -> Iso {
    Iso::from_parts(
        na::Translation3::new(pos.x, pos.y, pos.z),
        na::UnitQuaternion::identity(),
    )
}

/// Capsule dimensions for agent bodies.
///
/// `half_height` is the half-length of the cylinder section (aligned with +Y),
/// so the total capsule height is `2*half_height + 2*radius`.
/// `center_offset` is the capsule center relative to the body origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub half_height: f32,
    pub center_offset: Vec3,
}

impl CapsuleSpec {
    #[inline]
    pub fn new(radius: f32, half_height: f32) -> Self {
        Self {
            radius,
            half_height,
            center_offset: Vec3::zeros(),
        }
    }

    /// Half of the capsule's full vertical extent (cylinder half plus one cap).
    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.half_height + self.radius
    }

    /// World-space capsule center for a body standing at `origin`.
    #[inline]
    pub fn center(&self, origin: Vec3) -> Vec3 {
        origin + self.center_offset
    }

    pub fn is_valid(&self) -> bool {
        self.radius.is_finite()
            && self.half_height.is_finite()
            && self.radius > 0.0
            && self.half_height >= 0.0
    }
}

/// Result of a successful probe (shape cast) against walls.
#[derive(Clone, Copy, Debug)]
pub struct ProbeHit {
    /// World-space surface normal of the struck obstacle, facing the prober.
    pub normal: Vec3,
    /// Distance travelled along the probe direction before contact (meters).
    pub distance: f32,
}

/// Minimal kinematic state the resolver needs from a body.
#[derive(Clone, Copy, Debug)]
pub struct BodyState {
    /// Body origin in world space.
    pub position: Vec3,
    pub capsule: CapsuleSpec,
}
