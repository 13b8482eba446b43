pub mod agent;
pub mod arena;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locomotion;
pub mod scanner;
pub mod targets;

pub use agent::{Agent, AgentSpec, StepContext, StepReport};
pub use arena::{Arena, GamePhase, PlayerZone, ZoneLocation};
pub use collision::{
    CapsuleSpec, CollisionProbe, Quat, ResolverSettings, StepResolution, Vec2, Vec3, WallDef,
    WallSet, WallShapeDef, resolve_step, vertical_plane_wall,
};
pub use config::{AgentConfig, ArenaConfig, NavConfig};
pub use constants::{ARRIVAL_BUFFER, SCAN_INTERVAL_SECS};
pub use error::ConfigError;
pub use input::{
    ActionBinding, AgentKind, HumanInput, MovementInput, MovementSource, SourceContext,
    TargetScannerInput,
};
pub use locomotion::{Locomotion, LocomotionState};
pub use scanner::{AimKind, ScanAgent, ScanOutcome, ScanTimer, ScannerSettings, TargetScanner};
pub use targets::{TargetId, TargetObject, TargetRegistry};
