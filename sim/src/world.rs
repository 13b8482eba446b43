//! One headless match: agents, the marble pool, the round clock, and the scoreboard,
//! advanced together on a fixed tick.
//!
//! Marbles get a deliberately crude treatment (planar drift with friction, contact pushes,
//! kick impulses); only the agents go through the navigation core.

use log::{debug, info};
use nav::{
    Agent, AgentKind, Arena, ConfigError, GamePhase, HumanInput, MovementSource, NavConfig,
    PlayerZone, StepContext, TargetRegistry, TargetScannerInput, Vec3,
    constants::TARGET_RADIUS, geometry::flatten, geometry::planar_distance,
};
use serde_json::{Value, json};

use crate::{
    game::{ROUND_SECS, RoundClock, ScoreBoard},
    script::{ScriptClock, ScriptedBinding},
    spawner::{Spawner, SpawnerSettings},
};

#[derive(Clone, Copy, Debug)]
pub struct MatchSettings {
    pub round_secs: f32,
    /// How long a kick animation lasts before the agent is told it completed.
    pub kick_secs: f32,
    /// Planar reach of a kick in front of the agent (meters).
    pub kick_range: f32,
    /// Speed added to a kicked marble along the kicker's facing (m/s).
    pub kick_force: f32,
    pub target_radius: f32,
    /// Fraction of marble speed lost per second.
    pub friction: f32,
    /// Marbles past the play radius fall at this speed (m/s) ...
    pub fall_speed: f32,
    /// ... and leave play below this height.
    pub water_line: f32,
    /// Planar distance from a score position that counts as scored.
    pub score_radius: f32,
    pub spawner: SpawnerSettings,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            round_secs: ROUND_SECS,
            kick_secs: 0.5,
            kick_range: 1.5,
            kick_force: 2.0,
            target_radius: TARGET_RADIUS,
            friction: 0.8,
            fall_speed: 9.0,
            water_line: -2.0,
            score_radius: 2.0,
            spawner: SpawnerSettings::default(),
        }
    }
}

struct Slot {
    agent: Agent,
    /// Seconds left in the current kick, if kicking.
    kick_left: Option<f32>,
}

pub struct Match {
    arena: Arena,
    settings: MatchSettings,
    slots: Vec<Slot>,
    targets: TargetRegistry,
    /// Marble velocities, in registry order.
    velocities: Vec<Vec3>,
    clock: RoundClock,
    scores: ScoreBoard,
    spawner: Spawner,
    script_clock: ScriptClock,
    elapsed: f32,
}

impl Match {
    pub fn from_config(config: &NavConfig, settings: MatchSettings) -> Result<Self, ConfigError> {
        config.validate()?;
        let arena = config.build_arena()?;
        let script_clock = ScriptClock::default();

        let mut slots = Vec::with_capacity(config.agents.len());
        for agent_cfg in &config.agents {
            let source: Box<dyn MovementSource> = match agent_cfg.kind {
                AgentKind::Human => Box::new(HumanInput::new(ScriptedBinding::patrol(
                    script_clock.clone(),
                ))),
                AgentKind::Com => Box::new(TargetScannerInput::new(config.scanner)),
            };
            let agent = Agent::new(
                &arena,
                agent_cfg.zone,
                agent_cfg.spec(),
                config.resolver,
                source,
            )?;
            slots.push(Slot {
                agent,
                kick_left: None,
            });
        }

        let spawner = Spawner::new(settings.spawner);
        let targets = spawner.pool();
        info!(
            "match ready: {} agents, {} zones, {} walls, {} marbles",
            slots.len(),
            arena.zone_count(),
            arena.walls().len(),
            targets.len()
        );

        Ok(Self {
            velocities: vec![Vec3::zeros(); targets.len()],
            arena,
            settings,
            slots,
            targets,
            clock: RoundClock::new(settings.round_secs),
            scores: ScoreBoard::default(),
            spawner,
            script_clock,
            elapsed: 0.0,
        })
    }

    /// Advance the match by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if self.clock.phase().is_playing() {
            self.spawner.tick(&mut self.targets, dt);
        }

        if self.clock.tick(dt) {
            for slot in &mut self.slots {
                slot.agent.set_disabled(true);
            }
        }
        let phase = self.clock.phase();
        if phase.is_playing() {
            self.elapsed += dt;
            self.script_clock.set(self.elapsed);
        }

        for i in 0..self.slots.len() {
            self.step_agent(i, phase, dt);
        }

        self.integrate_targets(dt);
    }

    /// Step until the round is over or `max_steps` is reached. Returns the steps taken.
    pub fn run(&mut self, dt: f32, max_steps: Option<u64>) -> u64 {
        let mut steps = 0;
        while self.clock.phase() != GamePhase::GameOver && max_steps.is_none_or(|m| steps < m) {
            self.step(dt);
            steps += 1;
        }
        steps
    }

    /// Start a fresh round: scores cleared, marbles pooled, agents back at spawn.
    pub fn reset(&mut self) {
        self.clock.restart(self.settings.round_secs);
        self.scores.reset();
        self.spawner.reset();
        self.targets = self.spawner.pool();
        self.velocities = vec![Vec3::zeros(); self.targets.len()];
        self.elapsed = 0.0;
        self.script_clock.set(0.0);
        for slot in &mut self.slots {
            slot.kick_left = None;
            slot.agent.set_disabled(false);
            slot.agent.reset();
        }
    }

    /// Pause or resume the round. Agents report `Disabled` while paused.
    pub fn set_paused(&mut self, paused: bool) {
        let before = self.clock.phase();
        self.clock.set_paused(paused);
        if self.clock.phase() == before {
            return;
        }
        for slot in &mut self.slots {
            slot.agent.set_disabled(paused);
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.clock.phase()
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut TargetRegistry {
        &mut self.targets
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.slots.iter().map(|s| &s.agent)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn summary(&self) -> Value {
        let agents: Vec<Value> = self
            .agents()
            .map(|a| {
                let p = a.position();
                json!({
                    "zone": format!("{:?}", a.zone()),
                    "kind": format!("{:?}", a.kind()),
                    "state": format!("{:?}", a.state()),
                    "position": [p.x, p.y, p.z],
                    "points": self.scores.points(a.zone()),
                })
            })
            .collect();
        let leaders: Vec<String> = self
            .scores
            .leaders()
            .iter()
            .map(|z| format!("{z:?}"))
            .collect();
        json!({
            "elapsed_secs": self.elapsed,
            "phase": format!("{:?}", self.clock.phase()),
            "leaders": leaders,
            "agents": agents,
        })
    }

    fn step_agent(&mut self, i: usize, phase: GamePhase, dt: f32) {
        let ctx = StepContext {
            arena: &self.arena,
            targets: self.targets.as_slice(),
            phase,
        };
        let slot = &mut self.slots[i];
        let report = slot.agent.step(&ctx, dt);

        if let Some(id) = report.scan.and_then(|s| s.target) {
            self.targets.mark_targeted(id);
        }

        if report.kicked {
            slot.kick_left = Some(self.settings.kick_secs);
            kick_targets(
                &slot.agent,
                &self.settings,
                &self.targets,
                &mut self.velocities,
            );
        }
        if let Some(left) = slot.kick_left {
            let left = left - dt;
            if left <= 0.0 {
                slot.agent.complete_kick();
                slot.kick_left = None;
            } else {
                slot.kick_left = Some(left);
            }
        }

        if dt > 0.0 && report.delta.norm_squared() > 0.0 {
            push_on_contact(
                &slot.agent,
                report.delta / dt,
                self.settings.target_radius,
                &mut self.targets,
                &mut self.velocities,
            );
        }
    }

    fn integrate_targets(&mut self, dt: f32) {
        let damping = (1.0 - self.settings.friction * dt).max(0.0);
        let zone_count = self.arena.zone_count();
        let mut retired = Vec::new();

        for (i, (target, vel)) in self
            .targets
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .enumerate()
        {
            if !target.active {
                continue;
            }
            target.position += flatten(*vel) * dt;
            *vel *= damping;

            let scored = PlayerZone::ALL.into_iter().take(zone_count).find(|z| {
                self.arena.zone(*z).is_ok_and(|loc| {
                    planar_distance(target.position, loc.score) < self.settings.score_radius
                })
            });
            if let Some(zone) = scored {
                self.scores.add_point(zone);
                retired.push((i, target.id));
                continue;
            }

            if !self.arena.contains(target.position) {
                target.position.y -= self.settings.fall_speed * dt;
            }
            if target.position.y < self.settings.water_line {
                debug!("target {} sank", target.id);
                retired.push((i, target.id));
            }
        }

        for (i, id) in retired {
            self.targets.deactivate(id);
            self.velocities[i] = Vec3::zeros();
        }
    }
}

/// Unit forward of an agent (yaw-only facing, forward is -Z).
fn forward(agent: &Agent) -> Vec3 {
    agent.facing() * -Vec3::z()
}

fn kick_targets(
    agent: &Agent,
    settings: &MatchSettings,
    targets: &TargetRegistry,
    velocities: &mut [Vec3],
) {
    let fwd = flatten(forward(agent));
    let pos = agent.position();
    for (target, vel) in targets.as_slice().iter().zip(velocities.iter_mut()) {
        if !target.active {
            continue;
        }
        let to_target = flatten(target.position - pos);
        if to_target.norm() <= settings.kick_range && to_target.dot(&fwd) > 0.0 {
            *vel += fwd * settings.kick_force;
            debug!("{:?} kicked target {}", agent.zone(), target.id);
        }
    }
}

fn push_on_contact(
    agent: &Agent,
    agent_vel: Vec3,
    target_radius: f32,
    targets: &mut TargetRegistry,
    velocities: &mut [Vec3],
) {
    let pos = agent.position();
    let reach = agent.spec().capsule.radius + target_radius;
    for (target, vel) in targets.iter_mut().zip(velocities.iter_mut()) {
        if !target.active {
            continue;
        }
        let sep = flatten(target.position - pos);
        let dist = sep.norm();
        if dist >= reach || dist <= f32::EPSILON {
            continue;
        }
        let n = sep / dist;
        target.position += n * (reach - dist);
        // Transfer only the closing speed.
        let closing = (agent_vel - *vel).dot(&n);
        if closing > 0.0 {
            *vel += n * closing;
        }
    }
}
