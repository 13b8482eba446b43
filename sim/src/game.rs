//! Round clock and scoreboard: the game-state side the agents only observe through
//! [`GamePhase`].

use log::info;
use nav::{GamePhase, PlayerZone, constants::MAX_ZONES};

/// Default round length (seconds).
pub const ROUND_SECS: f32 = 60.0;

/// Counts a round down and flips the phase to `GameOver` when it runs out.
#[derive(Clone, Copy, Debug)]
pub struct RoundClock {
    remaining: f32,
    phase: GamePhase,
}

impl RoundClock {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            remaining: duration_secs.max(0.0),
            phase: GamePhase::Playing,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advance by `dt`. Returns `true` on the tick the round ends.
    ///
    /// Paused clocks do not run down; a finished round stays finished.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.remaining -= dt.max(0.0);
        if self.remaining > 0.0 {
            return false;
        }
        self.remaining = 0.0;
        self.phase = GamePhase::GameOver;
        info!("round over");
        true
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.phase = match (self.phase, paused) {
            (GamePhase::Playing, true) => GamePhase::Paused,
            (GamePhase::Paused, false) => GamePhase::Playing,
            (phase, _) => phase,
        };
    }

    pub fn restart(&mut self, duration_secs: f32) {
        *self = Self::new(duration_secs);
    }
}

/// Points per player zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    points: [u32; MAX_ZONES],
}

impl ScoreBoard {
    pub fn add_point(&mut self, zone: PlayerZone) {
        self.points[zone.index()] += 1;
        info!("{zone:?} scores, now {}", self.points[zone.index()]);
    }

    pub fn points(&self, zone: PlayerZone) -> u32 {
        self.points[zone.index()]
    }

    /// Highest-scoring zones; several on a tie, none if nobody scored.
    pub fn leaders(&self) -> Vec<PlayerZone> {
        let best = self.points.iter().copied().max().unwrap_or(0);
        if best == 0 {
            return Vec::new();
        }
        PlayerZone::ALL
            .into_iter()
            .filter(|z| self.points[z.index()] == best)
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
