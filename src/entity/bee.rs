//! Bee agents - roles, behavioral states and life stats
//!
//! Queens are not a separate type; a bee carries a kind discriminator with
//! the queen payload so the population and scheduler treat all agents
//! uniformly.

use crate::core::types::{BeeId, Vec2};
use crate::entity::queen::QueenState;
use serde::{Deserialize, Serialize};

/// Job a bee is currently assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BeeRole {
    #[default]
    Idle,
    ForageHoney,
    ForagePollen,
    ProduceRoyalJelly,
    ProduceBeeswax,
    NurseLarvae,
    Thermoregulate,
    BuildCells,
    CleanCells,
}

/// Behavioral state of a bee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BeeState {
    #[default]
    Idling,
    Working,
    Foraging,
    Sleeping,
    Dying,
}

/// Per-bee stat block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeeStats {
    pub flight_speed: f32,
    pub carry_capacity: f32,
    pub work_efficiency: f32,
    pub health_regen_rate: f32,
}

impl Default for BeeStats {
    fn default() -> Self {
        Self {
            flight_speed: 5.0,
            carry_capacity: 2.0,
            work_efficiency: 1.0,
            health_regen_rate: 0.1,
        }
    }
}

/// Worker or queen payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BeeKind {
    Worker,
    Queen(QueenState),
}

/// A single bee agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bee {
    pub id: BeeId,
    pub name: String,
    pub role: BeeRole,
    pub state: BeeState,
    /// Age in cycles against lifespan in cycles
    pub age: f32,
    pub lifespan: f32,
    pub health: f32,
    pub max_health: f32,
    pub stats: BeeStats,
    pub position: Vec2,
    pub kind: BeeKind,

    work_timer: f32,
    work_duration: f32,
    is_working: bool,
}

impl Bee {
    pub fn new(name: String, position: Vec2, lifespan: f32, max_health: f32, stats: BeeStats) -> Self {
        Self {
            id: BeeId::new(),
            name,
            role: BeeRole::Idle,
            state: BeeState::Idling,
            age: 0.0,
            lifespan,
            health: max_health,
            max_health,
            stats,
            position,
            kind: BeeKind::Worker,
            work_timer: 0.0,
            work_duration: 0.0,
            is_working: false,
        }
    }

    pub fn new_queen(
        name: String,
        position: Vec2,
        lifespan: f32,
        max_health: f32,
        stats: BeeStats,
        queen: QueenState,
    ) -> Self {
        let mut bee = Self::new(name, position, lifespan, max_health, stats);
        bee.kind = BeeKind::Queen(queen);
        bee
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0 && self.age < self.lifespan
    }

    pub fn is_queen(&self) -> bool {
        matches!(self.kind, BeeKind::Queen(_))
    }

    pub fn is_working(&self) -> bool {
        self.is_working
    }

    pub fn age_progress(&self) -> f32 {
        self.age / self.lifespan
    }

    /// Assign a role; non-idle roles put the bee to work
    pub fn assign_role(&mut self, role: BeeRole) {
        if self.role == role {
            return;
        }
        self.role = role;
        if role == BeeRole::Idle {
            self.state = BeeState::Idling;
        } else {
            self.state = BeeState::Working;
        }
    }

    /// Begin a timed work stint; refused while sleeping or dying
    pub fn start_work(&mut self, duration: f32) -> bool {
        if self.state == BeeState::Sleeping || self.state == BeeState::Dying {
            return false;
        }
        self.is_working = true;
        self.work_timer = 0.0;
        self.work_duration = duration;
        self.state = BeeState::Working;
        true
    }

    pub fn stop_work(&mut self) {
        self.is_working = false;
        self.work_timer = 0.0;
        self.state = BeeState::Idling;
    }

    /// Accumulate work progress; returns true when the stint completes
    ///
    /// The caller applies the role-specific economy effect and must reset
    /// the bee afterwards (`finish_work`).
    pub fn update_work(&mut self, dt: f32) -> bool {
        if !self.is_working {
            return false;
        }
        self.work_timer += dt * self.stats.work_efficiency;
        self.work_timer >= self.work_duration
    }

    /// Clear work state after a completed stint; role returns to idle
    pub fn finish_work(&mut self) {
        self.is_working = false;
        self.work_timer = 0.0;
        self.role = BeeRole::Idle;
        self.state = BeeState::Idling;
    }

    /// Health regenerates toward max while alive
    pub fn regenerate(&mut self, dt: f32) {
        if self.health < self.max_health {
            self.health = (self.health + self.stats.health_regen_rate * dt).min(self.max_health);
        }
    }

    /// Age by one cycle; returns true if the bee died of old age
    pub fn age_one_cycle(&mut self) -> bool {
        self.age += 1.0;
        if self.age >= self.lifespan {
            self.state = BeeState::Dying;
            return true;
        }
        false
    }

    /// Apply damage; returns true if this killed the bee
    pub fn take_damage(&mut self, damage: f32) -> bool {
        self.health = (self.health - damage).max(0.0);
        if self.health <= 0.0 {
            self.state = BeeState::Dying;
            return true;
        }
        false
    }

    /// Nightfall sends everyone but the dying to sleep
    pub fn fall_asleep(&mut self) {
        if self.state != BeeState::Dying {
            self.is_working = false;
            self.work_timer = 0.0;
            self.state = BeeState::Sleeping;
        }
    }

    /// Daybreak wakes sleepers back to idling
    pub fn wake(&mut self) {
        if self.state == BeeState::Sleeping {
            self.state = BeeState::Idling;
        }
    }

    pub fn queen_state(&self) -> Option<&QueenState> {
        match &self.kind {
            BeeKind::Queen(queen) => Some(queen),
            BeeKind::Worker => None,
        }
    }

    pub fn queen_state_mut(&mut self) -> Option<&mut QueenState> {
        match &mut self.kind {
            BeeKind::Queen(queen) => Some(queen),
            BeeKind::Worker => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker() -> Bee {
        Bee::new(
            "Buzzwing".into(),
            Vec2::default(),
            20.0,
            100.0,
            BeeStats::default(),
        )
    }

    #[test]
    fn test_work_completion() {
        let mut bee = worker();
        assert!(bee.start_work(5.0));
        assert!(!bee.update_work(3.0));
        assert!(bee.update_work(2.0));

        bee.finish_work();
        assert_eq!(bee.state, BeeState::Idling);
        assert_eq!(bee.role, BeeRole::Idle);
        assert!(!bee.is_working());
    }

    #[test]
    fn test_work_efficiency_scales_progress() {
        let mut bee = worker();
        bee.stats.work_efficiency = 2.0;
        bee.start_work(5.0);
        assert!(bee.update_work(2.5));
    }

    #[test]
    fn test_no_work_while_sleeping() {
        let mut bee = worker();
        bee.fall_asleep();
        assert!(!bee.start_work(5.0));
        assert_eq!(bee.state, BeeState::Sleeping);

        bee.wake();
        assert!(bee.start_work(5.0));
    }

    #[test]
    fn test_aging_to_death() {
        let mut bee = worker();
        bee.lifespan = 2.0;
        assert!(!bee.age_one_cycle());
        assert!(bee.is_alive());
        assert!(bee.age_one_cycle());
        assert!(!bee.is_alive());
        assert_eq!(bee.state, BeeState::Dying);
    }

    #[test]
    fn test_damage_and_regen() {
        let mut bee = worker();
        assert!(!bee.take_damage(30.0));
        assert!((bee.health - 70.0).abs() < 0.001);

        bee.regenerate(10.0); // 0.1/s regen
        assert!((bee.health - 71.0).abs() < 0.001);

        assert!(bee.take_damage(200.0));
        assert!((bee.health).abs() < 0.001);
        assert!(!bee.is_alive());
    }

    #[test]
    fn test_sleep_interrupts_work() {
        let mut bee = worker();
        bee.start_work(5.0);
        bee.fall_asleep();
        assert!(!bee.is_working());
        assert_eq!(bee.state, BeeState::Sleeping);
    }

    #[test]
    fn test_dying_bee_does_not_sleep() {
        let mut bee = worker();
        bee.take_damage(200.0);
        bee.fall_asleep();
        assert_eq!(bee.state, BeeState::Dying);
    }
}
