use log::trace;

use super::{
    settings::{DIST_EPS, MIN_MOVE, MIN_SLIDE_KEEP, ResolverSettings},
    types::{BodyState, ProbeHit, Vec3},
    walls::CollisionProbe,
};
use crate::geometry::flatten;

/// Outcome of one resolved movement step.
#[derive(Clone, Copy, Debug)]
pub struct StepResolution {
    /// Position delta to apply to the body this step.
    pub delta: Vec3,
    /// Whether the forward probe struck a wall.
    pub hit_wall: bool,
    /// Slide iterations spent (0 when unobstructed).
    pub iterations: u32,
}

impl StepResolution {
    #[inline]
    pub fn moved(&self) -> bool {
        self.delta.norm_squared() > DIST_EPS * DIST_EPS
    }

    fn unobstructed(delta: Vec3) -> Self {
        Self {
            delta,
            hit_wall: false,
            iterations: 0,
        }
    }
}

/// Resolve one physics step of movement for a body against walls.
///
/// `direction` is a world-space direction (only its XZ part is used; it is renormalized).
/// A zero direction is valid and yields a zero delta.
///
/// Algorithm:
/// - Probe the capsule forward for half its extent plus the step length.
/// - No hit: apply `direction * speed * dt` as-is.
/// - Hit: iterate at most `max_iterations` times. Each iteration pushes slightly off the
///   flattened wall normal, damps the remaining travel by how head-on the contact is, then
///   slides the remainder along the wall, probing again for corners.
/// - Anything left after the last iteration is dropped; the body simply under-moves.
///
/// The returned delta is never longer than the unobstructed displacement.
pub fn resolve_step(
    probe: &impl CollisionProbe,
    body: &BodyState,
    direction: Vec3,
    speed: f32,
    dt: f32,
    settings: &ResolverSettings,
) -> StepResolution {
    let dir = match flatten(direction).try_normalize(DIST_EPS) {
        Some(d) => d,
        None => return StepResolution::unobstructed(Vec3::zeros()),
    };
    let step_len = speed.max(0.0) * dt.max(0.0);
    if step_len <= MIN_MOVE {
        return StepResolution::unobstructed(Vec3::zeros());
    }

    let capsule = body.capsule;
    let lead = capsule.half_extent();
    let center = capsule.center(body.position);

    let Some(first_hit) = probe.cast_capsule(&capsule, center, dir, lead + step_len) else {
        return StepResolution::unobstructed(dir * step_len);
    };

    let mut delta = Vec3::zeros();
    let mut remaining = step_len;
    let mut slide_dir = dir;
    let mut hit: ProbeHit = first_hit;
    let mut iterations = 0;

    while iterations < settings.max_iterations && remaining > MIN_MOVE {
        iterations += 1;

        let Some(normal) = flatten(hit.normal).try_normalize(DIST_EPS) else {
            break;
        };

        // Share of the probe that was clear before contact; that share of the remaining
        // travel is partly spent pushing off the wall.
        let probe_len = lead + remaining;
        let fraction = (hit.distance / probe_len).clamp(0.0, 1.0);
        let nudge = remaining * fraction * settings.normal_nudge_factor;
        delta += normal * nudge;
        remaining -= nudge;

        remaining *= slide_keep(normal, slide_dir, settings.max_shove_angle_deg);

        // Slide: drop the into-wall component and keep going along the surface.
        let along = slide_dir - normal * slide_dir.dot(&normal);
        let Some(next_dir) = along.try_normalize(DIST_EPS) else {
            trace!("head-on contact, no slide direction");
            break;
        };
        slide_dir = next_dir;

        match probe.cast_capsule(&capsule, center + delta, slide_dir, lead + remaining) {
            Some(next_hit) => {
                trace!(
                    "slide iteration {iterations} blocked again at {:.3}m",
                    next_hit.distance
                );
                hit = next_hit;
            }
            None => {
                delta += slide_dir * remaining;
                remaining = 0.0;
            }
        }
    }

    if remaining > MIN_MOVE && iterations >= settings.max_iterations {
        trace!("slide iteration cap reached, dropping {remaining:.4}m");
    }

    StepResolution {
        delta,
        hit_wall: true,
        iterations,
    }
}

/// Momentum kept after a wall contact.
///
/// `incidence` is the angle between the motion and the into-wall direction (0° = head-on).
/// It is capped at `max_shove_angle_deg` and normalized so head-on maps to 1 and a glance at
/// or beyond the cap maps to 0, then shaped by `(1 - n)^0.5 * 0.9 + 0.1`.
pub fn slide_keep(wall_normal: Vec3, motion_dir: Vec3, max_shove_angle_deg: f32) -> f32 {
    let into_wall = -wall_normal;
    let cos = into_wall.dot(&motion_dir).clamp(-1.0, 1.0);
    let incidence = cos.acos().to_degrees();
    let cap = max_shove_angle_deg.max(DIST_EPS);
    let head_on = 1.0 - incidence.min(cap) / cap;
    (1.0 - head_on).sqrt() * (1.0 - MIN_SLIDE_KEEP) + MIN_SLIDE_KEEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{
        settings::DEFAULT_MAX_ITERATIONS,
        types::CapsuleSpec,
        walls::{WallSet, vertical_plane_wall},
    };
    use approx::assert_relative_eq;

    const SPEED: f32 = 5.0;
    const DT: f32 = 0.02;

    fn body_at(x: f32, z: f32) -> BodyState {
        BodyState {
            position: Vec3::new(x, 0.0, z),
            capsule: CapsuleSpec::new(0.5, 0.5),
        }
    }

    /// Wall at x = 2, solid beyond it.
    fn east_wall() -> WallSet {
        WallSet::build(vec![vertical_plane_wall(
            1,
            Vec3::new(2.0, 0.0, 0.0),
            -Vec3::x(),
        )])
    }

    #[test]
    fn open_floor_moves_full_step() {
        let walls = WallSet::default();
        let res = resolve_step(
            &walls,
            &body_at(0.0, 0.0),
            Vec3::z(),
            SPEED,
            DT,
            &ResolverSettings::default(),
        );
        assert!(!res.hit_wall);
        assert_eq!(res.iterations, 0);
        assert_relative_eq!(res.delta, Vec3::new(0.0, 0.0, 0.1), epsilon = 1.0e-6);
    }

    #[test]
    fn zero_direction_is_no_movement() {
        let res = resolve_step(
            &east_wall(),
            &body_at(0.0, 0.0),
            Vec3::zeros(),
            SPEED,
            DT,
            &ResolverSettings::default(),
        );
        assert!(!res.moved());
    }

    #[test]
    fn vertical_component_is_ignored() {
        let walls = WallSet::default();
        let res = resolve_step(
            &walls,
            &body_at(0.0, 0.0),
            Vec3::new(0.0, 3.0, 4.0),
            SPEED,
            DT,
            &ResolverSettings::default(),
        );
        assert_relative_eq!(res.delta.y, 0.0);
        assert_relative_eq!(res.delta.norm(), SPEED * DT, epsilon = 1.0e-6);
    }

    #[test]
    fn head_on_hit_converges_and_never_overshoots() {
        // Body 0.6m from the wall's surface contact, moving straight in.
        let res = resolve_step(
            &east_wall(),
            &body_at(0.9, 0.0),
            Vec3::x(),
            SPEED,
            DT,
            &ResolverSettings::default(),
        );
        assert!(res.hit_wall);
        assert!(res.iterations <= 4);
        assert!(res.delta.norm() <= SPEED * DT + 1.0e-6);
        // Never pushed into the wall.
        assert!(res.delta.x <= 1.0e-6);
    }

    #[test]
    fn glancing_hit_slides_along_wall() {
        let diag = Vec3::new(1.0, 0.0, 1.0).normalize();
        let res = resolve_step(
            &east_wall(),
            &body_at(0.9, 0.0),
            diag,
            SPEED,
            DT,
            &ResolverSettings::default(),
        );
        assert!(res.hit_wall);
        assert!(res.delta.z > 0.0, "should keep sliding along +Z");
        assert!(res.delta.x <= 1.0e-6, "should not move into the wall");
        assert!(res.delta.norm() <= SPEED * DT + 1.0e-6);
    }

    #[test]
    fn corner_is_bounded_by_iteration_cap() {
        let walls = WallSet::build(vec![
            vertical_plane_wall(1, Vec3::new(2.0, 0.0, 0.0), -Vec3::x()),
            vertical_plane_wall(2, Vec3::new(0.0, 0.0, 2.0), -Vec3::z()),
        ]);
        let diag = Vec3::new(1.0, 0.0, 1.0).normalize();
        let res = resolve_step(
            &walls,
            &body_at(1.0, 1.0),
            diag,
            SPEED,
            DT,
            &ResolverSettings::default(),
        );
        assert!(res.hit_wall);
        assert!(res.iterations <= DEFAULT_MAX_ITERATIONS);
        assert!(res.delta.norm() <= SPEED * DT + 1.0e-6);
    }

    #[test]
    fn slide_keep_is_bounded_between_head_on_and_glance() {
        let n = -Vec3::x();
        assert_relative_eq!(slide_keep(n, Vec3::x(), 45.0), MIN_SLIDE_KEEP, epsilon = 1.0e-5);
        assert_relative_eq!(slide_keep(n, Vec3::z(), 45.0), 1.0, epsilon = 1.0e-5);

        let shallow = Vec3::new(1.0, 0.0, 0.2).normalize();
        let steep = Vec3::new(1.0, 0.0, 0.8).normalize();
        assert!(slide_keep(n, shallow, 45.0) < slide_keep(n, steep, 45.0));
    }
}
