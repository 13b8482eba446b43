//! A single arena agent: body, zone assignment, and the per-step pipeline
//! source → world direction → resolver → position and locomotion.

use log::{debug, info};

use crate::{
    arena::{Arena, GamePhase, PlayerZone, ZoneLocation},
    collision::{
        resolver::{StepResolution, resolve_step},
        settings::{DEFAULT_MOVEMENT_SPEED, ResolverSettings},
        types::{BodyState, CapsuleSpec, Quat, Vec2, Vec3},
    },
    error::ConfigError,
    geometry::{facing_from_direction, world_direction_from_axis},
    input::{AgentKind, MovementSource, SourceContext},
    locomotion::{Locomotion, LocomotionState},
    scanner::ScanOutcome,
    targets::TargetObject,
};

/// Physical parameters of an agent body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSpec {
    pub capsule: CapsuleSpec,
    /// Movement speed (m/s).
    pub speed: f32,
    /// Fixed yaw used to rotate the 2D input axis into world space.
    pub body_rotation: Quat,
}

impl Default for AgentSpec {
    fn default() -> Self {
        Self {
            capsule: CapsuleSpec::new(0.5, 0.5),
            speed: DEFAULT_MOVEMENT_SPEED,
            body_rotation: Quat::identity(),
        }
    }
}

impl AgentSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.capsule.is_valid() {
            return Err(ConfigError::InvalidCapsule {
                radius: self.capsule.radius,
                half_height: self.capsule.half_height,
            });
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.speed));
        }
        Ok(())
    }
}

/// Everything an agent consults from the outside world during one step.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub arena: &'a Arena,
    pub targets: &'a [TargetObject],
    pub phase: GamePhase,
}

/// What happened during one [`Agent::step`].
#[derive(Clone, Copy, Debug)]
pub struct StepReport {
    pub delta: Vec3,
    pub hit_wall: bool,
    /// A kick started this step.
    pub kicked: bool,
    /// Scan performed this step (COM agents only).
    pub scan: Option<ScanOutcome>,
}

impl StepReport {
    fn idle() -> Self {
        Self {
            delta: Vec3::zeros(),
            hit_wall: false,
            kicked: false,
            scan: None,
        }
    }
}

pub struct Agent {
    zone: PlayerZone,
    location: ZoneLocation,
    arena_center: Vec3,
    spec: AgentSpec,
    resolver: ResolverSettings,
    position: Vec3,
    locomotion: Locomotion,
    movement: Vec2,
    kick_requested: bool,
    source: Box<dyn MovementSource>,
}

impl Agent {
    /// Assign `zone` to a new agent and place it at the zone's spawn, facing the arena center.
    pub fn new(
        arena: &Arena,
        zone: PlayerZone,
        spec: AgentSpec,
        resolver: ResolverSettings,
        source: Box<dyn MovementSource>,
    ) -> Result<Self, ConfigError> {
        spec.validate()?;
        if let Some(name) = resolver.first_invalid() {
            return Err(ConfigError::InvalidSetting(name));
        }
        let location = arena.zone(zone)?;
        let arena_center = arena.center();
        let facing = spawn_facing(location.spawn, arena_center);

        debug!(
            "{:?} agent assigned to {zone:?}, spawn=({:.2}, {:.2}, {:.2})",
            source.kind(),
            location.spawn.x,
            location.spawn.y,
            location.spawn.z
        );

        Ok(Self {
            zone,
            location,
            arena_center,
            spec,
            resolver,
            position: location.spawn,
            locomotion: Locomotion::new(facing),
            movement: Vec2::zeros(),
            kick_requested: false,
            source,
        })
    }

    /// Run one physics step.
    ///
    /// Outside [`GamePhase::Playing`] the source is disabled, nothing moves, and no scan runs.
    pub fn step(&mut self, ctx: &StepContext<'_>, dt: f32) -> StepReport {
        self.kick_requested = false;

        if !ctx.phase.is_playing() {
            self.source.set_enabled(false);
            self.movement = Vec2::zeros();
            return StepReport::idle();
        }
        self.source.set_enabled(true);

        let source_ctx = SourceContext {
            arena: ctx.arena,
            candidates: ctx.targets,
            position: self.position,
            body_rotation: self.spec.body_rotation,
            zone: self.location,
            probe_radius: self.spec.capsule.radius,
        };
        let input = self.source.poll(&source_ctx, dt);
        self.movement = input.axis;

        let direction = world_direction_from_axis(input.axis, &self.spec.body_rotation);
        if direction.norm_squared() > 0.0 {
            self.locomotion
                .face_toward(direction, self.resolver.facing_slerp);
        }

        let StepResolution {
            delta, hit_wall, ..
        } = resolve_step(
            ctx.arena.walls(),
            &BodyState {
                position: self.position,
                capsule: self.spec.capsule,
            },
            direction,
            self.spec.speed,
            dt,
            &self.resolver,
        );
        self.position += delta;
        self.locomotion.apply_motion(delta.norm_squared() > 0.0);

        let kicked = input.kick && self.locomotion.request_kick();
        self.kick_requested = kicked;
        if kicked {
            debug!("{:?} kicks", self.zone);
        }

        StepReport {
            delta,
            hit_wall,
            kicked,
            scan: input.scan,
        }
    }

    /// Back to spawn: `Idle`, no movement, facing the arena center, fresh scan due.
    pub fn reset(&mut self) {
        self.position = self.location.spawn;
        self.movement = Vec2::zeros();
        self.kick_requested = false;
        self.locomotion
            .reset(spawn_facing(self.location.spawn, self.arena_center));
        self.source.reset();
        info!("{:?} agent reset to spawn", self.zone);
    }

    /// Kick animation finished.
    pub fn complete_kick(&mut self) {
        self.locomotion.complete_kick();
    }

    /// Game-phase control of the `Disabled` locomotion state.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.locomotion.set_disabled(disabled);
    }

    #[inline]
    pub fn state(&self) -> LocomotionState {
        self.locomotion.state()
    }

    /// Whether a kick started on the last step.
    #[inline]
    pub fn kick_requested(&self) -> bool {
        self.kick_requested
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn facing(&self) -> Quat {
        self.locomotion.facing()
    }

    /// Last body-local movement axis.
    #[inline]
    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    #[inline]
    pub fn zone(&self) -> PlayerZone {
        self.zone
    }

    pub fn location(&self) -> ZoneLocation {
        self.location
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    pub fn kind(&self) -> AgentKind {
        self.source.kind()
    }
}

fn spawn_facing(spawn: Vec3, center: Vec3) -> Quat {
    facing_from_direction(center - spawn).unwrap_or_else(Quat::identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::walls::{WallSet, vertical_plane_wall},
        constants::TARGET_RADIUS,
        geometry::planar_distance,
        input::{ActionBinding, HumanInput, TargetScannerInput},
        scanner::{AimKind, ScannerSettings},
    };
    use approx::assert_relative_eq;

    struct Held {
        axis: Vec2,
        kick: bool,
    }

    impl ActionBinding for Held {
        fn move_axis(&self) -> Vec2 {
            self.axis
        }

        fn kick_held(&self) -> bool {
            self.kick
        }
    }

    fn arena_with(walls: WallSet) -> Arena {
        Arena::new(
            Vec3::new(0.0, 1.0, 0.0),
            21.0,
            vec![ZoneLocation {
                spawn: Vec3::new(0.0, 1.0, 5.0),
                score: Vec3::new(0.0, 0.0, 15.0),
            }],
            walls,
        )
        .expect("valid arena")
    }

    fn human(axis: Vec2, kick: bool) -> Box<dyn MovementSource> {
        Box::new(HumanInput::new(Held { axis, kick }))
    }

    fn agent(arena: &Arena, source: Box<dyn MovementSource>) -> Agent {
        Agent::new(
            arena,
            PlayerZone::TopRight,
            AgentSpec::default(),
            ResolverSettings::default(),
            source,
        )
        .expect("valid agent")
    }

    fn playing<'a>(arena: &'a Arena, targets: &'a [TargetObject]) -> StepContext<'a> {
        StepContext {
            arena,
            targets,
            phase: GamePhase::Playing,
        }
    }

    #[test]
    fn spawns_at_zone_facing_center() {
        let arena = arena_with(WallSet::default());
        let a = agent(&arena, human(Vec2::zeros(), false));
        assert_eq!(a.position(), Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(a.state(), LocomotionState::Idle);

        // Center is toward -Z, which is the zero-yaw forward.
        assert_relative_eq!(a.facing().angle(), 0.0, epsilon = 1.0e-5);
    }

    #[test]
    fn rejects_bad_spec_and_missing_zone() {
        let arena = arena_with(WallSet::default());
        let bad_speed = AgentSpec {
            speed: 0.0,
            ..AgentSpec::default()
        };
        let err = Agent::new(
            &arena,
            PlayerZone::TopRight,
            bad_speed,
            ResolverSettings::default(),
            human(Vec2::zeros(), false),
        );
        assert!(matches!(err, Err(ConfigError::NonPositiveSpeed(_))));

        let err = Agent::new(
            &arena,
            PlayerZone::BottomLeft,
            AgentSpec::default(),
            ResolverSettings::default(),
            human(Vec2::zeros(), false),
        );
        assert!(matches!(err, Err(ConfigError::MissingZone { .. })));
    }

    #[test]
    fn moves_and_runs_on_input() {
        let arena = arena_with(WallSet::default());
        let mut a = agent(&arena, human(Vec2::new(1.0, 0.0), false));
        let report = a.step(&playing(&arena, &[]), 0.02);

        assert_relative_eq!(report.delta, Vec3::new(0.1, 0.0, 0.0), epsilon = 1.0e-5);
        assert_eq!(a.state(), LocomotionState::Running);
        assert_relative_eq!(a.position(), Vec3::new(0.1, 1.0, 5.0), epsilon = 1.0e-5);
    }

    #[test]
    fn kicking_is_retained_while_moving() {
        let arena = arena_with(WallSet::default());
        let mut a = agent(&arena, human(Vec2::new(0.0, 1.0), true));

        let first = a.step(&playing(&arena, &[]), 0.02);
        assert!(first.kicked);
        assert!(a.kick_requested());
        assert_eq!(a.state(), LocomotionState::Kicking);

        for _ in 0..10 {
            let r = a.step(&playing(&arena, &[]), 0.02);
            assert!(!r.kicked);
            assert!(r.delta.norm() > 0.0);
            assert_eq!(a.state(), LocomotionState::Kicking);
        }
        assert!(!a.kick_requested());

        a.complete_kick();
        a.step(&playing(&arena, &[]), 0.02);
        assert_eq!(a.state(), LocomotionState::Running);
    }

    #[test]
    fn wall_blocks_without_overshoot() {
        // Wall at x = 1, facing -X (back toward the agent).
        let walls = WallSet::build(vec![vertical_plane_wall(
            0,
            Vec3::new(1.0, 0.0, 0.0),
            -Vec3::x(),
        )]);
        let arena = arena_with(walls);
        let mut a = agent(&arena, human(Vec2::new(1.0, 0.0), false));

        let radius = a.spec().capsule.radius;
        for _ in 0..200 {
            let r = a.step(&playing(&arena, &[]), 0.02);
            assert!(r.delta.norm() <= 0.1 + 1.0e-5);
        }
        assert!(a.position().x <= 1.0 - radius + 1.0e-3);
    }

    #[test]
    fn non_playing_phase_freezes_agent() {
        let arena = arena_with(WallSet::default());
        let targets = [TargetObject::new(1, Vec3::new(6.0, 0.0, -2.0))];
        let source = Box::new(TargetScannerInput::new(ScannerSettings::default()));
        let mut a = agent(&arena, source);

        let ctx = StepContext {
            arena: &arena,
            targets: &targets,
            phase: GamePhase::Paused,
        };
        for _ in 0..10 {
            let r = a.step(&ctx, 0.02);
            assert_eq!(r.delta, Vec3::zeros());
            assert!(r.scan.is_none());
        }
        assert_eq!(a.position(), Vec3::new(0.0, 1.0, 5.0));

        // Resuming scans immediately.
        let r = a.step(&playing(&arena, &targets), 0.02);
        assert!(r.scan.is_some());
    }

    #[test]
    fn reset_returns_to_spawn_idle() {
        let arena = arena_with(WallSet::default());
        let mut a = agent(&arena, human(Vec2::new(1.0, 1.0), true));
        for _ in 0..5 {
            a.step(&playing(&arena, &[]), 0.02);
        }
        assert_ne!(a.position(), a.location().spawn);

        a.reset();
        assert_eq!(a.position(), a.location().spawn);
        assert_eq!(a.state(), LocomotionState::Idle);
        assert_eq!(a.movement(), Vec2::zeros());
        assert!(!a.kick_requested());
        assert_relative_eq!(a.facing().angle(), 0.0, epsilon = 1.0e-5);
    }

    #[test]
    fn com_agent_moves_toward_its_scan_point() {
        let arena = arena_with(WallSet::default());
        let targets = [TargetObject::new(1, Vec3::new(6.0, 1.0, -2.0))];
        let source = Box::new(TargetScannerInput::new(ScannerSettings::default()));
        let mut a = agent(&arena, source);
        assert_eq!(a.kind(), AgentKind::Com);

        let start = a.position();
        let r = a.step(&playing(&arena, &targets), 0.02);
        let point = r.scan.expect("first step scans").point;

        let want = (point - start).xz().normalize();
        let got = r.delta.xz().normalize();
        assert_relative_eq!(got, want, epsilon = 1.0e-4);
        assert!(!a.kick_requested());
    }

    /// COM agent whose zone scores at (-15, 1, 0), spawned at `spawn`.
    fn com_toward_west(spawn: Vec3) -> (Arena, Agent) {
        let arena = Arena::new(
            Vec3::new(0.0, 1.0, 0.0),
            21.0,
            vec![ZoneLocation {
                spawn,
                score: Vec3::new(-15.0, 1.0, 0.0),
            }],
            WallSet::default(),
        )
        .expect("valid arena");
        let source = Box::new(TargetScannerInput::new(ScannerSettings::default()));
        let a = agent(&arena, source);
        (arena, a)
    }

    /// Step until `steps` run out; returns the closest planar approach and every aim kind seen.
    fn pursue(
        arena: &Arena,
        a: &mut Agent,
        target: &TargetObject,
        steps: usize,
    ) -> (f32, Vec<AimKind>) {
        let targets = std::slice::from_ref(target);
        let mut closest = planar_distance(a.position(), target.position);
        let mut kinds = Vec::new();
        for _ in 0..steps {
            let r = a.step(&playing(arena, targets), 0.02);
            if let Some(scan) = r.scan {
                kinds.push(scan.kind);
            }
            closest = closest.min(planar_distance(a.position(), target.position));
        }
        (closest, kinds)
    }

    #[test]
    fn lined_up_com_drives_into_contact() {
        let (arena, mut a) = com_toward_west(Vec3::new(5.0, 1.0, 0.0));
        let target = TargetObject::new(1, Vec3::new(0.0, 1.0, 0.0));
        let reach = a.spec().capsule.radius + TARGET_RADIUS;

        let (closest, kinds) = pursue(&arena, &mut a, &target, 100);
        assert_eq!(kinds.first(), Some(&AimKind::Close));
        assert!(closest < reach, "closest approach {closest}");
    }

    #[test]
    fn com_on_the_zone_side_goes_around_then_makes_contact() {
        let (arena, mut a) = com_toward_west(Vec3::new(-8.0, 1.0, 0.3));
        let target = TargetObject::new(1, Vec3::new(0.0, 1.0, 0.0));
        let reach = a.spec().capsule.radius + TARGET_RADIUS;

        let (closest, kinds) = pursue(&arena, &mut a, &target, 500);
        assert_eq!(kinds.first(), Some(&AimKind::Deflect));
        let lined_up = kinds
            .iter()
            .position(|k| *k == AimKind::Close)
            .expect("agent lines up behind the target");
        assert!(kinds[..lined_up].contains(&AimKind::Intercept));
        assert!(closest < reach, "closest approach {closest}");
    }
}
