//! Immutable arena wall geometry and the collision probe seam.
//!
//! Walls are described by schema-agnostic [`WallDef`]s (typically sourced from config), then
//! built once into a [`WallSet`] that answers forward capsule probes. Only walls live here:
//! agents and targets are never part of the set, so a probe can never strike them.
//!
//! Conventions
//! - Units are meters.
//! - Rotation is a unit quaternion.
//! - For planes, the normal is derived from the pose as `rotation * +Y`, and
//!   `dist = dot(normal, translation) + offset_along_normal`.

use nalgebra as na;
use rapier3d::parry::shape::{HalfSpace, SharedShape};

use super::{
    narrow_phase,
    types::{CapsuleSpec, Iso, ProbeHit, Quat, Vec3},
};

/// Anything that can answer "would this capsule strike a wall if it moved along `dir`?".
///
/// The resolver only talks to walls through this trait.
pub trait CollisionProbe {
    /// Sweep `capsule` from `center` along the unit vector `dir` for at most `max_dist`
    /// meters. Returns the nearest hit, if any.
    fn cast_capsule(
        &self,
        capsule: &CapsuleSpec,
        center: Vec3,
        dir: Vec3,
        max_dist: f32,
    ) -> Option<ProbeHit>;
}

/// Canonical definition of one immutable wall collider.
#[derive(Clone, Debug)]
pub struct WallDef {
    /// Stable unique identifier used to ensure deterministic build order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation.
    pub rotation: Quat,
    pub shape: WallShapeDef,
}

/// Supported wall shapes.
#[derive(Clone, Debug)]
pub enum WallShapeDef {
    /// Infinite plane (half-space). The solid side is behind `rotation * +Y`.
    Plane { offset_along_normal: f32 },

    /// Oriented cuboid with given half-extents.
    Cuboid { half_extents: Vec3 },

    /// Rounded cuboid; `border_radius` rounds all edges/corners.
    RoundCuboid {
        half_extents: Vec3,
        border_radius: f32,
    },

    /// Y-aligned cylinder (posts, pillars).
    CylinderY { radius: f32, half_height: f32 },

    /// Y-aligned capsule.
    CapsuleY { radius: f32, half_height: f32 },

    /// Sphere/ball.
    Sphere { radius: f32 },
}

struct BuiltWall {
    id: u32,
    iso: Iso,
    shape: SharedShape,
}

/// Walls built for queries. Cheap to probe; never mutated after construction.
#[derive(Default)]
pub struct WallSet {
    walls: Vec<BuiltWall>,
}

impl WallSet {
    /// Build a wall set from a list of definitions.
    ///
    /// The input is sorted by `id` before insertion so equal inputs always probe identically.
    pub fn build(mut defs: Vec<WallDef>) -> Self {
        defs.sort_by_key(|d| d.id);
        let walls = defs.iter().map(build_wall).collect();
        Self { walls }
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Identifiers of the built walls, in probe order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.walls.iter().map(|w| w.id)
    }
}

impl CollisionProbe for WallSet {
    fn cast_capsule(
        &self,
        capsule: &CapsuleSpec,
        center: Vec3,
        dir: Vec3,
        max_dist: f32,
    ) -> Option<ProbeHit> {
        let mut best: Option<ProbeHit> = None;
        for wall in &self.walls {
            if let Some(hit) = narrow_phase::cast_capsule_against(
                center,
                capsule,
                dir,
                max_dist,
                &wall.iso,
                &*wall.shape,
            ) {
                if best.is_none_or(|b| hit.distance < b.distance) {
                    best = Some(hit);
                }
            }
        }
        best
    }
}

fn build_wall(def: &WallDef) -> BuiltWall {
    let pose = Iso::from_parts(na::Translation3::from(def.translation), def.rotation);

    let (iso, shape) = match &def.shape {
        WallShapeDef::Plane {
            offset_along_normal,
        } => {
            // n = R * +Y; the plane satisfies n ⋅ x = dist.
            let n = def.rotation * Vec3::y();
            let dist = n.dot(&def.translation) + *offset_along_normal;
            let unit_n = na::Unit::new_normalize(n);

            // Place the half-space at `n * dist` with identity rotation so its local normal
            // is the world normal.
            let iso = Iso::from_parts(
                na::Translation3::from(unit_n.into_inner() * dist),
                Quat::identity(),
            );
            (iso, SharedShape::new(HalfSpace::new(unit_n)))
        }
        WallShapeDef::Cuboid { half_extents } => (
            pose,
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
        ),
        WallShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => (
            pose,
            SharedShape::round_cuboid(
                half_extents.x,
                half_extents.y,
                half_extents.z,
                *border_radius,
            ),
        ),
        WallShapeDef::CylinderY {
            radius,
            half_height,
        } => (pose, SharedShape::cylinder(*half_height, *radius)),
        WallShapeDef::CapsuleY {
            radius,
            half_height,
        } => (pose, SharedShape::capsule_y(*half_height, *radius)),
        WallShapeDef::Sphere { radius } => (pose, SharedShape::ball(*radius)),
    };

    BuiltWall {
        id: def.id,
        iso,
        shape,
    }
}

/// Convenience: a vertical plane wall whose solid side lies beyond `point` along `-inward`.
///
/// `inward` is the horizontal direction pointing from the wall into the play area.
pub fn vertical_plane_wall(id: u32, point: Vec3, inward: Vec3) -> WallDef {
    let inward = Vec3::new(inward.x, 0.0, inward.z);
    // A horizontal vector is never opposite +Y, so this only falls back for a zero `inward`.
    let rotation = Quat::rotation_between(&Vec3::y(), &inward).unwrap_or_else(Quat::identity);
    WallDef {
        id,
        translation: point,
        rotation,
        shape: WallShapeDef::Plane {
            offset_along_normal: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn capsule() -> CapsuleSpec {
        CapsuleSpec::new(0.5, 0.5)
    }

    #[test]
    fn plane_wall_is_hit_head_on() {
        // Wall at x = 5, facing -X (into the arena).
        let walls = WallSet::build(vec![vertical_plane_wall(
            1,
            Vec3::new(5.0, 0.0, 0.0),
            -Vec3::x(),
        )]);

        let hit = walls
            .cast_capsule(&capsule(), Vec3::zeros(), Vec3::x(), 10.0)
            .expect("wall should be struck");

        // Capsule radius 0.5 touches the plane after 4.5m.
        assert_relative_eq!(hit.distance, 4.5, epsilon = 1.0e-3);
        assert_relative_eq!(hit.normal, -Vec3::x(), epsilon = 1.0e-3);
    }

    #[test]
    fn moving_away_from_wall_never_hits() {
        let walls = WallSet::build(vec![vertical_plane_wall(
            1,
            Vec3::new(5.0, 0.0, 0.0),
            -Vec3::x(),
        )]);
        assert!(
            walls
                .cast_capsule(&capsule(), Vec3::zeros(), -Vec3::x(), 10.0)
                .is_none()
        );
    }

    #[test]
    fn nearest_of_several_walls_wins() {
        let walls = WallSet::build(vec![
            vertical_plane_wall(2, Vec3::new(8.0, 0.0, 0.0), -Vec3::x()),
            WallDef {
                id: 1,
                translation: Vec3::new(3.0, 0.0, 0.0),
                rotation: Quat::identity(),
                shape: WallShapeDef::Cuboid {
                    half_extents: Vec3::new(0.5, 2.0, 2.0),
                },
            },
        ]);

        let hit = walls
            .cast_capsule(&capsule(), Vec3::zeros(), Vec3::x(), 20.0)
            .expect("cuboid should be struck");
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1.0e-3);
    }

    #[test]
    fn build_orders_by_id() {
        let walls = WallSet::build(vec![
            vertical_plane_wall(7, Vec3::new(8.0, 0.0, 0.0), -Vec3::x()),
            vertical_plane_wall(3, Vec3::new(-8.0, 0.0, 0.0), Vec3::x()),
        ]);
        assert_eq!(walls.ids().collect::<Vec<_>>(), vec![3, 7]);
    }
}
