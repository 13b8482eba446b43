//! JSON configuration for an arena session: arena geometry, walls, agents, and tuning.
//!
//! Vectors are plain `[x, y, z]` arrays. Everything except `arena.zones` and `agents` has a
//! default. Validation happens once, in [`NavConfig::validate`] / [`Arena::from_config`]; a
//! config that passes never fails later.

use std::{collections::HashSet, fs, path::Path};

use nalgebra as na;
use serde::Deserialize;

use crate::{
    agent::AgentSpec,
    arena::{Arena, PlayerZone, ZoneLocation},
    collision::{
        settings::{DEFAULT_MOVEMENT_SPEED, ResolverSettings},
        types::{CapsuleSpec, Quat, Vec3},
        walls::{WallDef, WallSet, WallShapeDef, vertical_plane_wall},
    },
    constants::{ARENA_CENTER, ARENA_RADIUS, MAX_ZONES},
    error::ConfigError,
    input::AgentKind,
    scanner::ScannerSettings,
};

#[derive(Clone, Debug, Deserialize)]
pub struct NavConfig {
    pub arena: ArenaConfig,
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub scanner: ScannerSettings,
    pub agents: Vec<AgentConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ArenaConfig {
    #[serde(default = "default_center")]
    pub center: [f32; 3],
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Indexed by [`PlayerZone`]: top-right, top-left, bottom-right, bottom-left.
    pub zones: Vec<ZoneConfig>,
    #[serde(default)]
    pub walls: Vec<WallConfig>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ZoneConfig {
    pub spawn: [f32; 3],
    pub score: [f32; 3],
}

#[derive(Clone, Debug, Deserialize)]
pub struct WallConfig {
    pub id: u32,
    pub translation: [f32; 3],
    /// Rotation about +Y in degrees. Ignored for planes.
    #[serde(default)]
    pub yaw_deg: f32,
    pub shape: WallShapeConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WallShapeConfig {
    /// Vertical plane; `inward` points from the wall into the play area.
    Plane { inward: [f32; 3] },
    Cuboid { half_extents: [f32; 3] },
    RoundCuboid {
        half_extents: [f32; 3],
        border_radius: f32,
    },
    CylinderY { radius: f32, half_height: f32 },
    CapsuleY { radius: f32, half_height: f32 },
    Sphere { radius: f32 },
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct AgentConfig {
    pub zone: PlayerZone,
    pub kind: AgentKind,
    #[serde(default = "default_agent_radius")]
    pub radius: f32,
    #[serde(default = "default_agent_half_height")]
    pub half_height: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Fixed body yaw in degrees used to rotate input into world space.
    #[serde(default)]
    pub body_yaw_deg: f32,
}

fn default_center() -> [f32; 3] {
    ARENA_CENTER
}

fn default_radius() -> f32 {
    ARENA_RADIUS
}

fn default_agent_radius() -> f32 {
    0.5
}

fn default_agent_half_height() -> f32 {
    0.5
}

fn default_speed() -> f32 {
    DEFAULT_MOVEMENT_SPEED
}

#[inline]
fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

fn yaw(deg: f32) -> Quat {
    Quat::from_axis_angle(&na::Vector3::y_axis(), deg.to_radians())
}

impl NavConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check everything that does not need a built arena: tuning ranges, agent bodies, and
    /// that each zone is claimed at most once and exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self.resolver.first_invalid() {
            return Err(ConfigError::InvalidSetting(name));
        }
        if let Some(name) = self.scanner.first_invalid() {
            return Err(ConfigError::InvalidSetting(name));
        }
        if self.arena.zones.is_empty() {
            return Err(ConfigError::NoZones);
        }
        if self.arena.zones.len() > MAX_ZONES {
            return Err(ConfigError::TooManyZones {
                count: self.arena.zones.len(),
                max: MAX_ZONES,
            });
        }

        let mut taken = HashSet::new();
        for agent in &self.agents {
            agent.spec().validate()?;
            if agent.zone.index() >= self.arena.zones.len() {
                return Err(ConfigError::MissingZone {
                    zone: agent.zone,
                    count: self.arena.zones.len(),
                });
            }
            if !taken.insert(agent.zone) {
                return Err(ConfigError::ZoneTaken(agent.zone));
            }
        }
        Ok(())
    }

    pub fn build_arena(&self) -> Result<Arena, ConfigError> {
        Arena::from_config(&self.arena)
    }
}

impl AgentConfig {
    pub fn spec(&self) -> AgentSpec {
        AgentSpec {
            capsule: CapsuleSpec::new(self.radius, self.half_height),
            speed: self.speed,
            body_rotation: yaw(self.body_yaw_deg),
        }
    }
}

impl WallConfig {
    pub fn to_def(&self) -> WallDef {
        let translation = vec3(self.translation);
        let shape = match self.shape {
            WallShapeConfig::Plane { inward } => {
                return vertical_plane_wall(self.id, translation, vec3(inward));
            }
            WallShapeConfig::Cuboid { half_extents } => WallShapeDef::Cuboid {
                half_extents: vec3(half_extents),
            },
            WallShapeConfig::RoundCuboid {
                half_extents,
                border_radius,
            } => WallShapeDef::RoundCuboid {
                half_extents: vec3(half_extents),
                border_radius,
            },
            WallShapeConfig::CylinderY {
                radius,
                half_height,
            } => WallShapeDef::CylinderY {
                radius,
                half_height,
            },
            WallShapeConfig::CapsuleY {
                radius,
                half_height,
            } => WallShapeDef::CapsuleY {
                radius,
                half_height,
            },
            WallShapeConfig::Sphere { radius } => WallShapeDef::Sphere { radius },
        };
        WallDef {
            id: self.id,
            translation,
            rotation: yaw(self.yaw_deg),
            shape,
        }
    }
}

impl Arena {
    pub fn from_config(config: &ArenaConfig) -> Result<Self, ConfigError> {
        let zones = config
            .zones
            .iter()
            .map(|z| ZoneLocation {
                spawn: vec3(z.spawn),
                score: vec3(z.score),
            })
            .collect();
        let walls = WallSet::build(config.walls.iter().map(WallConfig::to_def).collect());
        Arena::new(vec3(config.center), config.radius, zones, walls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "arena": {
            "zones": [
                { "spawn": [8, 1, 8], "score": [15, 0, 15] },
                { "spawn": [-8, 1, 8], "score": [-15, 0, 15] }
            ],
            "walls": [
                { "id": 2, "translation": [0, 0, 20], "shape": { "type": "plane", "inward": [0, 0, -1] } },
                { "id": 1, "translation": [20, 0, 0], "yaw_deg": 90,
                  "shape": { "type": "cuboid", "half_extents": [6, 1, 0.5] } }
            ]
        },
        "agents": [
            { "zone": "top_right", "kind": "human" },
            { "zone": "top_left", "kind": "com", "speed": 4.0 }
        ]
    }"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = NavConfig::from_json_str(MINIMAL).expect("valid config");
        assert_eq!(config.arena.center, ARENA_CENTER);
        assert_eq!(config.arena.radius, ARENA_RADIUS);
        assert_eq!(config.resolver, ResolverSettings::default());
        assert_eq!(config.scanner, ScannerSettings::default());
        assert_eq!(config.agents[0].kind, AgentKind::Human);
        assert_eq!(config.agents[1].speed, 4.0);

        let arena = config.build_arena().expect("valid arena");
        assert_eq!(arena.zone_count(), 2);
        assert_eq!(arena.walls().ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn duplicate_zone_is_rejected() {
        let json = MINIMAL.replace("\"top_left\"", "\"top_right\"");
        let err = NavConfig::from_json_str(&json);
        assert!(matches!(err, Err(ConfigError::ZoneTaken(PlayerZone::TopRight))));
    }

    #[test]
    fn agent_in_unconfigured_zone_is_rejected() {
        let json = MINIMAL.replace("\"top_left\"", "\"bottom_left\"");
        let err = NavConfig::from_json_str(&json);
        assert!(matches!(
            err,
            Err(ConfigError::MissingZone {
                zone: PlayerZone::BottomLeft,
                count: 2
            })
        ));
    }

    #[test]
    fn bad_tuning_is_named() {
        let json = MINIMAL.replacen(
            "\"agents\"",
            "\"scanner\": { \"arrival_buffer\": -1.0 }, \"agents\"",
            1,
        );
        let err = NavConfig::from_json_str(&json);
        assert!(matches!(
            err,
            Err(ConfigError::InvalidSetting("arrival_buffer"))
        ));
    }

    #[test]
    fn bad_agent_body_is_rejected() {
        let json = MINIMAL.replace("\"speed\": 4.0", "\"speed\": -4.0");
        let err = NavConfig::from_json_str(&json);
        assert!(matches!(err, Err(ConfigError::NonPositiveSpeed(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = NavConfig::from_json_str("{ \"arena\": ");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = NavConfig::load("/nonexistent/arena.json");
        assert!(matches!(err, Err(ConfigError::Io(_))));
    }
}
