//! Population registry - bookkeeping for every bee and brood in the colony

use crate::core::config::SimulationConfig;
use crate::core::types::{BeeId, BroodId, CellId, Vec2};
use crate::entity::bee::{Bee, BeeRole, BeeState, BeeStats};
use crate::entity::brood::Brood;
use crate::entity::queen::QueenState;
use rand::Rng;
use serde::{Deserialize, Serialize};

const NAME_PREFIXES: [&str; 8] = [
    "Buzz", "Honey", "Pollen", "Wing", "Amber", "Golden", "Sweet", "Busy",
];
const NAME_SUFFIXES: [&str; 8] = [
    "bee", "wing", "buzz", "flight", "worker", "dancer", "gatherer", "keeper",
];

/// Pick a random bee name
pub fn random_bee_name(rng: &mut impl Rng) -> String {
    let prefix = NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())];
    let suffix = NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())];
    format!("{}{}", prefix, suffix)
}

/// Registry of all agents, workers and queens alike, plus developing brood
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Population {
    pub bees: Vec<Bee>,
    pub broods: Vec<Brood>,
    max_population: usize,
}

impl Population {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            bees: Vec::new(),
            broods: Vec::new(),
            max_population: config.max_bee_population,
        }
    }

    /// Spawn a worker; refused at the population cap
    pub fn spawn_worker(
        &mut self,
        name: String,
        position: Vec2,
        config: &SimulationConfig,
    ) -> Option<BeeId> {
        if self.bees.len() >= self.max_population {
            return None;
        }

        let stats = BeeStats {
            flight_speed: config.foraging_speed,
            carry_capacity: config.bee_carry_capacity,
            work_efficiency: config.bee_work_efficiency,
            health_regen_rate: config.bee_health_regen_rate,
        };
        let bee = Bee::new(name, position, config.bee_lifespan, config.bee_max_health, stats);
        let id = bee.id;
        self.bees.push(bee);
        Some(id)
    }

    /// Spawn a queen; refused at the population cap
    pub fn spawn_queen(
        &mut self,
        name: String,
        position: Vec2,
        config: &SimulationConfig,
    ) -> Option<BeeId> {
        if self.bees.len() >= self.max_population {
            return None;
        }

        let stats = BeeStats {
            flight_speed: config.foraging_speed,
            carry_capacity: config.bee_carry_capacity,
            work_efficiency: config.bee_work_efficiency,
            health_regen_rate: config.bee_health_regen_rate,
        };
        let bee = Bee::new_queen(
            name,
            position,
            config.queen_lifespan,
            config.bee_max_health,
            stats,
            QueenState::new(config),
        );
        let id = bee.id;
        self.bees.push(bee);
        Some(id)
    }

    pub fn get(&self, id: BeeId) -> Option<&Bee> {
        self.bees.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BeeId) -> Option<&mut Bee> {
        self.bees.iter_mut().find(|b| b.id == id)
    }

    pub fn total_count(&self) -> usize {
        self.bees.len()
    }

    pub fn worker_count(&self) -> usize {
        self.bees.iter().filter(|b| !b.is_queen()).count()
    }

    pub fn queen_count(&self) -> usize {
        self.bees.iter().filter(|b| b.is_queen()).count()
    }

    pub fn idle_worker_count(&self) -> usize {
        self.idle_workers().len()
    }

    pub fn working_count(&self) -> usize {
        self.bees
            .iter()
            .filter(|b| matches!(b.state, BeeState::Working | BeeState::Foraging))
            .count()
    }

    /// Idle workers available for task assignment
    pub fn idle_workers(&self) -> Vec<BeeId> {
        self.bees
            .iter()
            .filter(|b| {
                !b.is_queen()
                    && b.is_alive()
                    && b.role == BeeRole::Idle
                    && b.state == BeeState::Idling
            })
            .map(|b| b.id)
            .collect()
    }

    pub fn bees_by_role(&self, role: BeeRole) -> Vec<BeeId> {
        self.bees.iter().filter(|b| b.role == role).map(|b| b.id).collect()
    }

    pub fn bees_by_state(&self, state: BeeState) -> Vec<BeeId> {
        self.bees.iter().filter(|b| b.state == state).map(|b| b.id).collect()
    }

    /// The first living queen, if the colony still has one
    pub fn queen_id(&self) -> Option<BeeId> {
        self.bees.iter().find(|b| b.is_queen() && b.is_alive()).map(|b| b.id)
    }

    /// Remove every dead bee, returning them for event emission and cleanup
    pub fn remove_dead(&mut self) -> Vec<Bee> {
        let mut dead = Vec::new();
        let mut i = 0;
        while i < self.bees.len() {
            if self.bees[i].is_alive() {
                i += 1;
            } else {
                dead.push(self.bees.remove(i));
            }
        }
        dead
    }

    pub fn get_brood(&self, id: BroodId) -> Option<&Brood> {
        self.broods.iter().find(|b| b.id == id)
    }

    pub fn get_brood_mut(&mut self, id: BroodId) -> Option<&mut Brood> {
        self.broods.iter_mut().find(|b| b.id == id)
    }

    pub fn brood_count(&self) -> usize {
        self.broods.len()
    }

    /// Create a brood occupying the given nursery cell
    pub fn add_brood(&mut self, cell: CellId, config: &SimulationConfig) -> BroodId {
        let brood = Brood::new(cell, config);
        let id = brood.id;
        self.broods.push(brood);
        id
    }

    pub fn remove_brood(&mut self, id: BroodId) -> Option<Brood> {
        let idx = self.broods.iter().position(|b| b.id == id)?;
        Some(self.broods.remove(idx))
    }

    /// Hungriest larva still waiting for food
    pub fn hungriest_larva(&self) -> Option<BroodId> {
        use ordered_float::OrderedFloat;
        self.broods
            .iter()
            .filter(|b| b.needs_feeding)
            .min_by_key(|b| OrderedFloat(b.nutrition))
            .map(|b| b.id)
    }
}
