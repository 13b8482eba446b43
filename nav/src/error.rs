use thiserror::Error;

use crate::arena::PlayerZone;

/// Setup precondition violations. These are fatal at initialization and never masked at
/// runtime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("arena has no player zones")]
    NoZones,

    #[error("arena has {count} zones, at most {max} are supported")]
    TooManyZones { count: usize, max: usize },

    #[error("zone {zone:?} is not configured (arena has {count} zones)")]
    MissingZone { zone: PlayerZone, count: usize },

    #[error("zone {0:?} is assigned to more than one agent")]
    ZoneTaken(PlayerZone),

    #[error("arena play radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("invalid capsule: radius {radius}, half height {half_height}")]
    InvalidCapsule { radius: f32, half_height: f32 },

    #[error("agent speed must be positive and finite, got {0}")]
    NonPositiveSpeed(f32),

    #[error("setting `{0}` is out of range")]
    InvalidSetting(&'static str),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
