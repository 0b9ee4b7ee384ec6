//! Queen payload - hunger gauge and egg laying

use crate::core::config::SimulationConfig;
use crate::hive::ledger::{ResourceKind, ResourceLedger};
use serde::{Deserialize, Serialize};

/// Hunger fraction below which the queen signals hunger
const HUNGRY_FRACTION: f32 = 0.3;

/// Hunger fraction the queen must exceed to lay eggs
const LAY_FRACTION: f32 = 0.5;

/// Hunger restored per unit of royal jelly eaten
const HUNGER_PER_JELLY: f32 = 20.0;

/// Queen-specific state carried by a `Bee` with `BeeKind::Queen`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueenState {
    pub hunger: f32,
    pub max_hunger: f32,
    /// Hunger lost per cycle, scaled to seconds by the cycle duration
    pub hunger_decay_per_cycle: f32,
    pub egg_lay_timer: f32,
    pub egg_lay_interval: f32,
    pub max_eggs_per_laying: u32,
    pub lay_efficiency: f32,
}

impl QueenState {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            hunger: config.queen_max_hunger,
            max_hunger: config.queen_max_hunger,
            hunger_decay_per_cycle: config.queen_hunger_decay_per_cycle,
            egg_lay_timer: 0.0,
            egg_lay_interval: config.queen_egg_lay_interval,
            max_eggs_per_laying: config.queen_max_eggs_per_laying,
            lay_efficiency: config.queen_lay_efficiency,
        }
    }

    pub fn hunger_progress(&self) -> f32 {
        self.hunger / self.max_hunger
    }

    /// Hunger below 30% of max; the signal recurs every tick while true
    pub fn is_hungry(&self) -> bool {
        self.hunger < self.max_hunger * HUNGRY_FRACTION
    }

    /// Egg laying requires hunger above 50% of max
    pub fn can_lay_eggs(&self) -> bool {
        self.hunger > self.max_hunger * LAY_FRACTION
    }

    /// Decay hunger over `dt` seconds
    pub fn update_hunger(&mut self, dt: f32, cycle_duration: f32) {
        if self.hunger > 0.0 {
            self.hunger =
                (self.hunger - self.hunger_decay_per_cycle * dt / cycle_duration).max(0.0);
        }
    }

    /// Advance the laying timer; returns true when a laying attempt is due
    ///
    /// The timer only runs while the queen is fed enough to lay.
    pub fn update_egg_timer(&mut self, dt: f32) -> bool {
        if !self.can_lay_eggs() {
            return false;
        }
        self.egg_lay_timer += dt;
        if self.egg_lay_timer >= self.egg_lay_interval {
            self.egg_lay_timer = 0.0;
            return true;
        }
        false
    }

    /// How many eggs this attempt may place, before cell availability
    pub fn eggs_per_attempt(&self) -> u32 {
        (self.max_eggs_per_laying as f32 * self.lay_efficiency).round() as u32
    }

    /// Feed the queen royal jelly from the ledger
    pub fn feed_royal_jelly(&mut self, ledger: &mut ResourceLedger, amount: f32) -> bool {
        if !ledger.try_consume(ResourceKind::RoyalJelly, amount) {
            return false;
        }
        self.hunger = (self.hunger + amount * HUNGER_PER_JELLY).min(self.max_hunger);
        true
    }

    pub fn set_lay_efficiency(&mut self, efficiency: f32) {
        self.lay_efficiency = efficiency.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queen() -> QueenState {
        QueenState::new(&SimulationConfig::default())
    }

    #[test]
    fn test_hunger_decay_scaled_to_cycle() {
        let mut q = queen();
        // 5 hunger per 300s cycle -> one full cycle costs 5
        q.update_hunger(300.0, 300.0);
        assert!((q.hunger - 95.0).abs() < 0.001);
    }

    #[test]
    fn test_hungry_threshold() {
        let mut q = queen();
        q.hunger = 30.0;
        assert!(!q.is_hungry()); // strictly below 30%
        q.hunger = 29.9;
        assert!(q.is_hungry());
    }

    #[test]
    fn test_lay_gate() {
        let mut q = queen();
        q.hunger = 50.0;
        assert!(!q.can_lay_eggs()); // strictly above 50%
        q.hunger = 50.1;
        assert!(q.can_lay_eggs());
    }

    #[test]
    fn test_egg_timer_only_runs_when_fed() {
        let mut q = queen();
        q.hunger = 10.0;
        assert!(!q.update_egg_timer(100.0));
        assert!((q.egg_lay_timer).abs() < 0.001);

        q.hunger = 100.0;
        assert!(!q.update_egg_timer(29.0));
        assert!(q.update_egg_timer(1.0));
        // Timer resets after an attempt
        assert!((q.egg_lay_timer).abs() < 0.001);
    }

    #[test]
    fn test_feed_royal_jelly() {
        let mut q = queen();
        q.hunger = 10.0;
        let mut ledger = ResourceLedger::new(0.0, 0.0, 0.0, 10.0, 2.0, 5.0);

        assert!(q.feed_royal_jelly(&mut ledger, 2.0));
        assert!((q.hunger - 50.0).abs() < 0.001);
        assert!((ledger.get(ResourceKind::RoyalJelly) - 8.0).abs() < 0.001);

        // Clamped at max
        assert!(q.feed_royal_jelly(&mut ledger, 8.0));
        assert!((q.hunger - 100.0).abs() < 0.001);

        // Empty ledger refuses
        assert!(!q.feed_royal_jelly(&mut ledger, 1.0));
    }

    #[test]
    fn test_eggs_per_attempt_efficiency() {
        let mut q = queen();
        assert_eq!(q.eggs_per_attempt(), 3);
        q.set_lay_efficiency(0.5);
        assert_eq!(q.eggs_per_attempt(), 2); // 1.5 rounds to 2
        q.set_lay_efficiency(0.0);
        assert_eq!(q.eggs_per_attempt(), 0);
    }
}
