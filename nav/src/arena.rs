//! Arena geometry: center, play radius, per-zone spawn/score locations, and walls.
//!
//! An `Arena` is built once at setup and passed by reference to every agent step; nothing
//! mutates it afterwards.

use crate::{
    collision::{types::Vec3, walls::WallSet},
    constants::MAX_ZONES,
    error::ConfigError,
};
use serde::Deserialize;

/// Player zones, in configuration order (top-right, top-left, bottom-right, bottom-left).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerZone {
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl PlayerZone {
    pub const ALL: [PlayerZone; MAX_ZONES] = [
        PlayerZone::TopRight,
        PlayerZone::TopLeft,
        PlayerZone::BottomRight,
        PlayerZone::BottomLeft,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Where a zone's agent spawns and where its score zone sits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneLocation {
    pub spawn: Vec3,
    pub score: Vec3,
}

/// Whether agents may act at all. Owned by the game-state collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GamePhase {
    #[default]
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    #[inline]
    pub fn is_playing(self) -> bool {
        self == GamePhase::Playing
    }
}

pub struct Arena {
    center: Vec3,
    radius: f32,
    zones: Vec<ZoneLocation>,
    walls: WallSet,
}

impl Arena {
    /// Validate and build an arena.
    ///
    /// Zones are indexed by [`PlayerZone::index`], so `zones[0]` is top-right.
    pub fn new(
        center: Vec3,
        radius: f32,
        zones: Vec<ZoneLocation>,
        walls: WallSet,
    ) -> Result<Self, ConfigError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(radius));
        }
        if zones.is_empty() {
            return Err(ConfigError::NoZones);
        }
        if zones.len() > MAX_ZONES {
            return Err(ConfigError::TooManyZones {
                count: zones.len(),
                max: MAX_ZONES,
            });
        }

        Ok(Self {
            center,
            radius,
            zones,
            walls,
        })
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn walls(&self) -> &WallSet {
        &self.walls
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Spawn and score locations of `zone`.
    pub fn zone(&self, zone: PlayerZone) -> Result<ZoneLocation, ConfigError> {
        self.zones
            .get(zone.index())
            .copied()
            .ok_or(ConfigError::MissingZone {
                zone,
                count: self.zones.len(),
            })
    }

    /// Whether `pos` is strictly inside the play radius (3D distance from the center).
    #[inline]
    pub fn contains(&self, pos: Vec3) -> bool {
        (pos - self.center).norm() < self.radius
    }
}
