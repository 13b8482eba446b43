//! COM target selection and interception geometry.
//!
//! A scan picks one target among the registry's candidates and turns it into a single world
//! point to move toward. Scans are cheap (O(candidates)) but are still rate-limited by a
//! per-agent [`ScanTimer`]; between scans the last point is reused verbatim.
//!
//! Selection order (single source of truth):
//! 1. smallest straight-line distance from the candidate to the agent's own score zone,
//! 2. then smallest straight-line distance from the candidate to the agent,
//! 3. then registry order.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::{
    arena::Arena,
    collision::{narrow_phase::cast_ball_against_ball, settings::DIST_EPS, types::Vec3},
    constants::{
        ARRIVAL_BUFFER, DEFLECT_DISTANCE, INTERCEPT_LENGTH, INTERCEPT_OFFSET, SCAN_INTERVAL_SECS,
        TARGET_RADIUS, VERTICAL_BUFFER,
    },
    geometry::{
        Segment, flatten, interception_segment, perpendicular_offset_point, planar_distance,
        push_direction,
    },
    targets::{TargetId, TargetObject},
};

/// Scanner tuning. Defaults come from [`crate::constants`].
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    pub scan_interval_secs: f32,
    pub arrival_buffer: f32,
    pub vertical_buffer: f32,
    pub intercept_offset: f32,
    pub intercept_length: f32,
    pub deflect_distance: f32,
    pub target_radius: f32,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            scan_interval_secs: SCAN_INTERVAL_SECS,
            arrival_buffer: ARRIVAL_BUFFER,
            vertical_buffer: VERTICAL_BUFFER,
            intercept_offset: INTERCEPT_OFFSET,
            intercept_length: INTERCEPT_LENGTH,
            deflect_distance: DEFLECT_DISTANCE,
            target_radius: TARGET_RADIUS,
        }
    }
}

impl ScannerSettings {
    /// Returns the name of the first out-of-range field, if any.
    pub fn first_invalid(&self) -> Option<&'static str> {
        let checks = [
            ("scan_interval_secs", self.scan_interval_secs > 0.0),
            ("arrival_buffer", self.arrival_buffer >= 0.0),
            ("vertical_buffer", self.vertical_buffer > 0.0),
            ("intercept_offset", self.intercept_offset >= 0.0),
            ("intercept_length", self.intercept_length >= 0.0),
            ("deflect_distance", self.deflect_distance > 0.0),
            ("target_radius", self.target_radius >= 0.0),
        ];
        // NaN fails every comparison above, so it is reported too.
        checks.iter().find(|(_, ok)| !ok).map(|(name, _)| *name)
    }
}

/// How a scan arrived at its point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AimKind {
    /// Line up behind the target on the interception segment.
    Intercept,
    /// Going straight for the segment would bump the target from the wrong side; go around.
    Deflect,
    /// Already lined up: close in on the target itself.
    Close,
    /// Nothing in the registry; stay put.
    HoldPosition,
    /// Nothing eligible; head back to spawn.
    ReturnToSpawn,
}

impl AimKind {
    /// Whether a mover should stop once within the arrival buffer of a point of this kind.
    ///
    /// `Close` points are driven through to make contact, and `Deflect` points are reached so
    /// the next scan sees a clear route.
    pub fn stops_on_arrival(self) -> bool {
        !matches!(self, AimKind::Close | AimKind::Deflect)
    }
}

/// Result of one scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanOutcome {
    pub point: Vec3,
    pub target: Option<TargetId>,
    pub kind: AimKind,
}

/// What the scanner needs to know about the requesting agent.
#[derive(Clone, Copy, Debug)]
pub struct ScanAgent {
    pub position: Vec3,
    pub zone_position: Vec3,
    pub spawn_position: Vec3,
    /// Radius of the agent's body, used when probing for a wrong-side bump.
    pub probe_radius: f32,
}

/// Interception geometry for one target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interception {
    /// Planar unit direction from the score zone toward the target.
    pub push_dir: Vec3,
    pub segment: Segment,
    /// Agent position projected onto `segment`.
    pub point: Vec3,
}

#[derive(Clone, Debug, Default)]
pub struct TargetScanner {
    settings: ScannerSettings,
}

impl TargetScanner {
    pub fn new(settings: ScannerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScannerSettings {
        &self.settings
    }

    /// Pick a world point for `agent` to move toward. Never fails.
    ///
    /// - Empty registry: the agent's current position (hold still).
    /// - No eligible candidate: the agent's spawn position.
    /// - Otherwise: the aim point for the selected candidate (see [`Self::aim`]).
    pub fn compute_target_position(
        &self,
        arena: &Arena,
        agent: &ScanAgent,
        candidates: &[TargetObject],
    ) -> ScanOutcome {
        if candidates.is_empty() {
            return ScanOutcome {
                point: agent.position,
                target: None,
                kind: AimKind::HoldPosition,
            };
        }

        match self.select(arena, agent, candidates) {
            Some(target) => {
                let (point, kind) = self.aim(agent, target.position);
                ScanOutcome {
                    point,
                    target: Some(target.id),
                    kind,
                }
            }
            None => ScanOutcome {
                point: agent.spawn_position,
                target: None,
                kind: AimKind::ReturnToSpawn,
            },
        }
    }

    /// Whether `candidate` may be chased at all: active, roughly level with the agent (not
    /// airborne or falling), and still inside the play radius.
    pub fn is_eligible(&self, arena: &Arena, agent_pos: Vec3, candidate: &TargetObject) -> bool {
        candidate.active
            && (candidate.position.y - agent_pos.y).abs() < self.settings.vertical_buffer
            && arena.contains(candidate.position)
    }

    /// Best eligible candidate under the selection order, if any.
    pub fn select<'a>(
        &self,
        arena: &Arena,
        agent: &ScanAgent,
        candidates: &'a [TargetObject],
    ) -> Option<&'a TargetObject> {
        candidates
            .iter()
            .filter(|c| self.is_eligible(arena, agent.position, c))
            .min_by(|a, b| compare_candidates(agent, a, b))
    }

    /// Interception geometry for a target at `target`, or `None` if the target sits on the
    /// agent's own score zone (no push direction).
    pub fn interception(&self, agent: &ScanAgent, target: Vec3) -> Option<Interception> {
        let push_dir = push_direction(target, agent.zone_position)?;
        let segment = interception_segment(
            target,
            push_dir,
            self.settings.intercept_offset,
            self.settings.intercept_length,
        );
        Some(Interception {
            push_dir,
            segment,
            point: segment.closest_point(agent.position),
        })
    }

    /// Turn a chosen target position into the point to move toward.
    pub fn aim(&self, agent: &ScanAgent, target: Vec3) -> (Vec3, AimKind) {
        let Some(icpt) = self.interception(agent, target) else {
            return (target, AimKind::Close);
        };

        if planar_distance(agent.position, icpt.point) <= self.settings.arrival_buffer {
            return (target, AimKind::Close);
        }

        if self.would_bump_target(agent, target, icpt.point) {
            let deflect = perpendicular_offset_point(
                target,
                icpt.push_dir,
                self.settings.deflect_distance,
                agent.position,
            );
            return (deflect, AimKind::Deflect);
        }

        (icpt.point, AimKind::Intercept)
    }

    /// Sweep the agent's body straight toward `point` (in the target's horizontal plane) and
    /// report whether it strikes the target first.
    fn would_bump_target(&self, agent: &ScanAgent, target: Vec3, point: Vec3) -> bool {
        let to_point = flatten(point - agent.position);
        let dist = to_point.norm();
        if dist <= DIST_EPS {
            return false;
        }
        let origin = Vec3::new(agent.position.x, target.y, agent.position.z);
        cast_ball_against_ball(
            origin,
            agent.probe_radius,
            to_point / dist,
            dist,
            target,
            self.settings.target_radius,
        )
        .is_some()
    }
}

fn compare_candidates(agent: &ScanAgent, a: &TargetObject, b: &TargetObject) -> Ordering {
    let zone_a = (a.position - agent.zone_position).norm();
    let zone_b = (b.position - agent.zone_position).norm();
    let agent_a = (a.position - agent.position).norm();
    let agent_b = (b.position - agent.position).norm();
    zone_a.total_cmp(&zone_b).then(agent_a.total_cmp(&agent_b))
}

/// Per-agent re-plan timer: accumulate `dt`, fire once the interval has elapsed, restart.
///
/// A fresh timer (and one that was [`reset`](Self::reset)) fires on its first poll.
#[derive(Clone, Copy, Debug)]
pub struct ScanTimer {
    interval: f32,
    elapsed: f32,
    due: bool,
}

impl ScanTimer {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            interval: interval_secs,
            elapsed: 0.0,
            due: true,
        }
    }

    /// Advance by `dt` and report whether a scan should run now.
    pub fn poll(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        if self.due || self.elapsed >= self.interval {
            self.due = false;
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    /// Make the next poll fire immediately.
    pub fn reset(&mut self) {
        self.due = true;
        self.elapsed = 0.0;
    }
}
