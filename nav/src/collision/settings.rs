/*!
Movement resolver settings and tolerances.

These values centralize the parameters used by the probe-and-slide resolver.
Keeping them together makes tuning easier and keeps every agent (human or COM)
on the same locomotion rules.

Notes
- Distances are in meters, time in seconds, angles in degrees.
- Favor practical world-space tolerances over machine epsilon.
- Per-arena overrides come from config; these are the defaults.
*/

use serde::Deserialize;

/// Maximum number of slide iterations per resolved step.
pub const DEFAULT_MAX_ITERATIONS: u32 = 4;

/// Minimum movement considered meaningful (meters).
/// Remaining travel below this ends the slide loop.
pub const MIN_MOVE: f32 = 1.0e-5;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Share of the pre-contact travel converted into a push away from the wall.
/// Increase if agents get stuck when sliding.
pub const DEFAULT_NORMAL_NUDGE_FACTOR: f32 = 0.1;

/// Incidence angle (from head-on) at or beyond which a wall contact counts as a pure glance.
pub const DEFAULT_MAX_SHOVE_ANGLE_DEG: f32 = 45.0;

/// Momentum kept on a perfectly head-on contact.
pub const MIN_SLIDE_KEEP: f32 = 0.1;

/// Per-step facing interpolation toward the input direction (0..1).
pub const DEFAULT_FACING_SLERP: f32 = 0.3;

/// Default run speed in meters per second.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 5.0;

/// Resolver tuning, shared by every agent in an arena.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub max_iterations: u32,
    pub normal_nudge_factor: f32,
    pub max_shove_angle_deg: f32,
    pub facing_slerp: f32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            normal_nudge_factor: DEFAULT_NORMAL_NUDGE_FACTOR,
            max_shove_angle_deg: DEFAULT_MAX_SHOVE_ANGLE_DEG,
            facing_slerp: DEFAULT_FACING_SLERP,
        }
    }
}

impl ResolverSettings {
    /// Returns the name of the first out-of-range field, if any.
    pub fn first_invalid(&self) -> Option<&'static str> {
        if self.max_iterations == 0 {
            return Some("max_iterations");
        }
        if !(0.0..=1.0).contains(&self.normal_nudge_factor) {
            return Some("normal_nudge_factor");
        }
        if !(self.max_shove_angle_deg > 0.0 && self.max_shove_angle_deg <= 90.0) {
            return Some("max_shove_angle_deg");
        }
        if !(0.0..=1.0).contains(&self.facing_slerp) {
            return Some("facing_slerp");
        }
        None
    }
}
