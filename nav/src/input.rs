//! Movement sources: where an agent's per-step 2D movement vector and kick edge come from.
//!
//! Both variants produce the same [`MovementInput`]; the agent does not know which one it is
//! driven by beyond [`AgentKind`] for logging.

use log::debug;
use serde::Deserialize;

use crate::{
    arena::{Arena, ZoneLocation},
    collision::{
        settings::DIST_EPS,
        types::{Quat, Vec2, Vec3},
    },
    geometry::flatten,
    scanner::{ScanAgent, ScanOutcome, ScanTimer, ScannerSettings, TargetScanner},
    targets::TargetObject,
};

/// Which kind of source drives an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Human,
    Com,
}

/// One step's worth of input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementInput {
    /// Body-local movement axis (`x` = right, `y` = forward), length at most 1.
    pub axis: Vec2,
    /// Kick edge: `true` only on the step the kick was requested.
    pub kick: bool,
    /// Scan performed during this poll, if any.
    pub scan: Option<ScanOutcome>,
}

impl Default for MovementInput {
    fn default() -> Self {
        Self {
            axis: Vec2::zeros(),
            kick: false,
            scan: None,
        }
    }
}

/// Read-only view of the world a source may consult while polling.
#[derive(Clone, Copy)]
pub struct SourceContext<'a> {
    pub arena: &'a Arena,
    pub candidates: &'a [TargetObject],
    pub position: Vec3,
    pub body_rotation: Quat,
    pub zone: ZoneLocation,
    pub probe_radius: f32,
}

pub trait MovementSource {
    fn kind(&self) -> AgentKind;

    /// Produce this step's input. Disabled sources return zero input and never scan.
    fn poll(&mut self, ctx: &SourceContext<'_>, dt: f32) -> MovementInput;

    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;

    /// Forget any per-round state (last goal, held buttons).
    fn reset(&mut self);
}

/// A device-independent action map: the movement axis and the kick button.
pub trait ActionBinding {
    /// Raw movement axis; need not be normalized.
    fn move_axis(&self) -> Vec2;

    fn kick_held(&self) -> bool;

    /// Called when the owning source is enabled or disabled.
    fn set_active(&mut self, _active: bool) {}
}

/// Human-driven source: passes the bound axis through and turns the kick button into an edge.
pub struct HumanInput<B> {
    binding: B,
    enabled: bool,
    kick_was_held: bool,
}

impl<B: ActionBinding> HumanInput<B> {
    pub fn new(binding: B) -> Self {
        Self {
            binding,
            enabled: true,
            kick_was_held: false,
        }
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut B {
        &mut self.binding
    }
}

impl<B: ActionBinding> MovementSource for HumanInput<B> {
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }

    fn poll(&mut self, _ctx: &SourceContext<'_>, _dt: f32) -> MovementInput {
        if !self.enabled {
            return MovementInput::default();
        }

        let held = self.binding.kick_held();
        let kick = held && !self.kick_was_held;
        self.kick_was_held = held;

        MovementInput {
            axis: clamp_unit(self.binding.move_axis()),
            kick,
            scan: None,
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.kick_was_held = false;
        self.binding.set_active(enabled);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn reset(&mut self) {
        self.kick_was_held = false;
    }
}

/// COM source: re-plans with a [`TargetScanner`] on a fixed cadence and steers toward the last
/// chosen point. Never kicks.
pub struct TargetScannerInput {
    scanner: TargetScanner,
    timer: ScanTimer,
    last: Option<ScanOutcome>,
    enabled: bool,
}

impl TargetScannerInput {
    pub fn new(settings: ScannerSettings) -> Self {
        Self {
            timer: ScanTimer::new(settings.scan_interval_secs),
            scanner: TargetScanner::new(settings),
            last: None,
            enabled: true,
        }
    }

    fn scan(&self, ctx: &SourceContext<'_>) -> ScanOutcome {
        let agent = ScanAgent {
            position: ctx.position,
            zone_position: ctx.zone.score,
            spawn_position: ctx.zone.spawn,
            probe_radius: ctx.probe_radius,
        };
        self.scanner
            .compute_target_position(ctx.arena, &agent, ctx.candidates)
    }
}

impl MovementSource for TargetScannerInput {
    fn kind(&self) -> AgentKind {
        AgentKind::Com
    }

    fn poll(&mut self, ctx: &SourceContext<'_>, dt: f32) -> MovementInput {
        if !self.enabled {
            return MovementInput::default();
        }

        let mut scan = None;
        if self.timer.poll(dt) {
            let outcome = self.scan(ctx);
            let changed = self
                .last
                .is_none_or(|prev| prev.target != outcome.target || prev.kind != outcome.kind);
            if changed {
                debug!(
                    "scan: {:?} target={:?} point=({:.2}, {:.2}, {:.2})",
                    outcome.kind, outcome.target, outcome.point.x, outcome.point.y, outcome.point.z
                );
            }
            self.last = Some(outcome);
            scan = Some(outcome);
        }

        let axis = match self.last {
            Some(outcome) => self.steer(ctx, &outcome),
            None => Vec2::zeros(),
        };

        MovementInput {
            axis,
            // COMs never kick.
            kick: false,
            scan,
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.timer.reset();
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn reset(&mut self) {
        self.last = None;
        self.timer.reset();
    }
}

impl TargetScannerInput {
    /// Body-local axis pointing at the scan point. Zero once within the arrival buffer, unless
    /// the point is one to drive through.
    fn steer(&self, ctx: &SourceContext<'_>, outcome: &ScanOutcome) -> Vec2 {
        let to_goal = flatten(outcome.point - ctx.position);
        if outcome.kind.stops_on_arrival()
            && to_goal.norm() <= self.scanner.settings().arrival_buffer
        {
            return Vec2::zeros();
        }
        let Some(world_dir) = to_goal.try_normalize(DIST_EPS) else {
            return Vec2::zeros();
        };
        let local = ctx.body_rotation.inverse_transform_vector(&world_dir);
        clamp_unit(Vec2::new(local.x, local.z))
    }
}

fn clamp_unit(axis: Vec2) -> Vec2 {
    let len = axis.norm();
    if !len.is_finite() {
        return Vec2::zeros();
    }
    if len > 1.0 { axis / len } else { axis }
}
