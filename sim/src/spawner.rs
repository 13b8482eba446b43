//! Marble pool: keeps a few targets in play, re-activating pooled ones after a delay.

use log::debug;
use nav::{TargetObject, TargetRegistry, Vec3};

/// Golden angle (radians); successive spawn offsets spiral without repeating.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Spawns per spiral before the radius pattern repeats.
const SPIRAL_POINTS: u32 = 16;

#[derive(Clone, Copy, Debug)]
pub struct SpawnerSettings {
    pub pool_size: u32,
    pub max_active: usize,
    pub delay_secs: f32,
    pub spawn_point: Vec3,
    /// Maximum horizontal distance of a spawn from `spawn_point`.
    pub scatter: f32,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            pool_size: 8,
            max_active: 5,
            delay_secs: 1.5,
            spawn_point: Vec3::new(0.0, 1.0, 0.0),
            scatter: 10.0,
        }
    }
}

pub struct Spawner {
    settings: SpawnerSettings,
    timer: f32,
    spawned: u32,
}

impl Spawner {
    pub fn new(settings: SpawnerSettings) -> Self {
        Self {
            settings,
            timer: 0.0,
            spawned: 0,
        }
    }

    /// A pool of inactive targets, ids `0..pool_size`.
    pub fn pool(&self) -> TargetRegistry {
        TargetRegistry::new(
            (0..self.settings.pool_size)
                .map(|id| TargetObject::inactive(id, self.settings.spawn_point))
                .collect(),
        )
    }

    /// Re-activate one pooled target once the delay has elapsed while below `max_active`.
    /// Returns the id spawned, if any.
    pub fn tick(&mut self, registry: &mut TargetRegistry, dt: f32) -> Option<u32> {
        if registry.active_count() >= self.settings.max_active {
            self.timer = 0.0;
            return None;
        }
        self.timer += dt;
        if self.timer < self.settings.delay_secs {
            return None;
        }

        let offset = self.next_offset();
        let target = registry.iter_mut().find(|t| !t.active)?;
        self.timer = 0.0;
        target.position = self.settings.spawn_point + offset;
        target.active = true;
        target.targeted = false;
        debug!(
            "spawned target {} at ({:.2}, {:.2})",
            target.id, target.position.x, target.position.z
        );
        Some(target.id)
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.spawned = 0;
    }

    fn next_offset(&mut self) -> Vec3 {
        let n = self.spawned;
        self.spawned = self.spawned.wrapping_add(1);
        // Vogel spiral: even coverage of the scatter disc.
        let k = (n % SPIRAL_POINTS) as f32;
        let r = self.settings.scatter * ((k + 0.5) / SPIRAL_POINTS as f32).sqrt();
        let a = n as f32 * GOLDEN_ANGLE;
        Vec3::new(r * a.cos(), 0.0, r * a.sin())
    }
}
