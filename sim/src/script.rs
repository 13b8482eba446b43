//! Scripted stand-in for a human player's input device.

use std::{cell::Cell, rc::Rc};

use nav::{ActionBinding, Vec2};

/// One leg of a script: hold `axis` (and optionally the kick button) for `secs` seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptLeg {
    pub secs: f32,
    pub axis: Vec2,
    pub kick: bool,
}

impl ScriptLeg {
    pub fn new(secs: f32, x: f32, y: f32, kick: bool) -> Self {
        Self {
            secs,
            axis: Vec2::new(x, y),
            kick,
        }
    }
}

/// Shared match time the scripted bindings read from.
pub type ScriptClock = Rc<Cell<f32>>;

/// Plays a looping list of [`ScriptLeg`]s against a shared clock.
pub struct ScriptedBinding {
    legs: Vec<ScriptLeg>,
    period: f32,
    clock: ScriptClock,
    active: bool,
}

impl ScriptedBinding {
    pub fn new(legs: Vec<ScriptLeg>, clock: ScriptClock) -> Self {
        let period = legs.iter().map(|l| l.secs.max(0.0)).sum();
        Self {
            legs,
            period,
            clock,
            active: true,
        }
    }

    /// Wander a square and kick at each corner.
    pub fn patrol(clock: ScriptClock) -> Self {
        Self::new(
            vec![
                ScriptLeg::new(1.5, 0.0, 1.0, false),
                ScriptLeg::new(0.2, 0.0, 0.0, true),
                ScriptLeg::new(1.5, 1.0, 0.0, false),
                ScriptLeg::new(0.2, 0.0, 0.0, true),
                ScriptLeg::new(1.5, 0.0, -1.0, false),
                ScriptLeg::new(0.2, 0.0, 0.0, true),
                ScriptLeg::new(1.5, -1.0, 0.0, false),
                ScriptLeg::new(0.2, 0.0, 0.0, true),
            ],
            clock,
        )
    }

    fn current(&self) -> Option<&ScriptLeg> {
        if !self.active || self.period <= 0.0 {
            return None;
        }
        let mut t = self.clock.get().rem_euclid(self.period);
        for leg in &self.legs {
            if t < leg.secs {
                return Some(leg);
            }
            t -= leg.secs.max(0.0);
        }
        self.legs.last()
    }
}

impl ActionBinding for ScriptedBinding {
    fn move_axis(&self) -> Vec2 {
        self.current().map_or_else(Vec2::zeros, |leg| leg.axis)
    }

    fn kick_held(&self) -> bool {
        self.current().is_some_and(|leg| leg.kick)
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legs_follow_the_clock_and_loop() {
        let clock = ScriptClock::default();
        let binding = ScriptedBinding::new(
            vec![
                ScriptLeg::new(1.0, 1.0, 0.0, false),
                ScriptLeg::new(0.5, 0.0, 0.0, true),
            ],
            clock.clone(),
        );

        clock.set(0.2);
        assert_eq!(binding.move_axis(), Vec2::new(1.0, 0.0));
        assert!(!binding.kick_held());

        clock.set(1.2);
        assert!(binding.kick_held());

        clock.set(1.7);
        assert_eq!(binding.move_axis(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn inactive_binding_is_neutral() {
        let clock = ScriptClock::default();
        let mut binding = ScriptedBinding::new(vec![ScriptLeg::new(1.0, 0.0, 1.0, true)], clock);
        binding.set_active(false);
        assert_eq!(binding.move_axis(), Vec2::zeros());
        assert!(!binding.kick_held());
    }

    #[test]
    fn empty_script_is_neutral() {
        let binding = ScriptedBinding::new(Vec::new(), ScriptClock::default());
        assert_eq!(binding.move_axis(), Vec2::zeros());
    }
}
