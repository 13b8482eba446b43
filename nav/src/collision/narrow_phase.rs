use rapier3d::parry::{
    query::{self, ShapeCastOptions},
    shape::{self as pshape, Shape as _},
};

use super::types::{CapsuleSpec, Iso, ProbeHit, Vec3, iso_at};

/// Sweep a Y-aligned capsule from `center` along the unit vector `dir` for at most `max_dist`
/// meters and report the first contact with `wall`.
///
/// Returns the surface normal on the wall (facing the capsule, opposing the motion) and the
/// distance travelled before contact.
pub fn cast_capsule_against(
    center: Vec3,
    capsule: &CapsuleSpec,
    dir: Vec3,
    max_dist: f32,
    wall_iso: &Iso,
    wall: &dyn pshape::Shape,
) -> Option<ProbeHit> {
    let shape = pshape::Capsule::new_y(capsule.half_height, capsule.radius);
    cast_against(center, &shape, dir, max_dist, wall_iso, wall)
}

/// Sweep a ball of `radius` from `center` along `dir` against a static ball of
/// `other_radius` at `other_center`.
pub fn cast_ball_against_ball(
    center: Vec3,
    radius: f32,
    dir: Vec3,
    max_dist: f32,
    other_center: Vec3,
    other_radius: f32,
) -> Option<ProbeHit> {
    let moving = pshape::Ball::new(radius);
    let other = pshape::Ball::new(other_radius);
    cast_against(center, &moving, dir, max_dist, &iso_at(other_center), &other)
}

fn cast_against(
    center: Vec3,
    moving: &dyn pshape::Shape,
    dir: Vec3,
    max_dist: f32,
    other_iso: &Iso,
    other: &dyn pshape::Shape,
) -> Option<ProbeHit> {
    if max_dist <= 0.0 || dir.norm_squared() <= f32::EPSILON {
        return None;
    }

    // Velocity is a unit vector, so time of impact reads directly as meters.
    let mut opts = ShapeCastOptions::with_max_time_of_impact(max_dist);
    opts.stop_at_penetration = true;

    let Ok(Some(hit)) = query::cast_shapes(
        &iso_at(center),
        &dir,
        moving,
        other_iso,
        &Vec3::zeros(),
        other,
        opts,
    ) else {
        return None;
    };

    // normal1 points out of the moving shape toward the obstacle (local space of an
    // unrotated shape, so also world space). The surface normal we want faces back.
    let mut normal = -hit.normal1.into_inner();
    if normal.dot(&dir) > 0.0 {
        normal = -normal;
    }

    Some(ProbeHit {
        normal,
        distance: hit.time_of_impact,
    })
}
