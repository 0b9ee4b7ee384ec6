//! Simulation configuration with documented constants
//!
//! All tuning values are collected here. The defaults reproduce the balance
//! the colony was tuned against; changing them shifts pacing and survival
//! pressure.

use crate::core::error::{HiveError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the whole simulation
///
/// Constructed once and passed by reference to every component that needs
/// it. There is no global accessor; the owning `Simulation` session holds
/// the authoritative copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    // === TIME ===
    /// Length of one full day/night cycle in seconds
    pub cycle_duration: f32,
    /// Fraction of the cycle that is daytime (the boundary belongs to night)
    pub day_phase_ratio: f32,
    /// Cycles per season, in calendar order
    pub spring_cycles: u32,
    pub summer_cycles: u32,
    pub autumn_cycles: u32,
    pub winter_cycles: u32,

    // === WORKERS ===
    /// Hard cap on total bees (workers + queens)
    pub max_bee_population: usize,
    /// Worker lifespan in cycles
    pub bee_lifespan: f32,
    /// Worker carry capacity per foraging trip
    pub bee_carry_capacity: f32,
    pub bee_work_efficiency: f32,
    /// Health restored per second while alive
    pub bee_health_regen_rate: f32,
    pub bee_max_health: f32,
    pub starting_workers: usize,
    pub starting_queens: usize,

    // === QUEEN ===
    /// Queen lifespan in cycles (queens far outlive workers)
    pub queen_lifespan: f32,
    /// Hunger lost per cycle, scaled to real time by cycle_duration
    pub queen_hunger_decay_per_cycle: f32,
    pub queen_max_hunger: f32,
    /// Seconds between laying attempts while well fed
    pub queen_egg_lay_interval: f32,
    pub queen_max_eggs_per_laying: u32,
    pub queen_lay_efficiency: f32,
    /// Royal jelly consumed per feeding; hunger restored is 20x this amount
    pub queen_feed_royal_jelly: f32,

    // === BROOD ===
    /// Stage durations in cycles
    pub egg_duration_cycles: f32,
    pub larva_duration_cycles: f32,
    pub pupa_duration_cycles: f32,
    /// Larva nutrition lost per second
    pub brood_nutrition_decay_rate: f32,
    /// Nutrition floor below which a larva cannot leave its stage
    pub brood_growth_nutrition_threshold: f32,
    /// Honey and pollen consumed by one larva feeding
    pub brood_feed_honey: f32,
    pub brood_feed_pollen: f32,

    // === RESOURCES ===
    pub starting_honey: f32,
    pub starting_pollen: f32,
    pub starting_beeswax: f32,
    pub starting_royal_jelly: f32,
    /// Honey eaten per worker per cycle (doubled in winter)
    pub honey_per_bee_per_cycle: f32,
    pub royal_jelly_per_queen_per_cycle: f32,
    pub winter_honey_multiplier: f32,

    // === CONVERSIONS ===
    /// Royal jelly: honey + pollen in, jelly out, per completed work
    pub royal_jelly_honey_cost: f32,
    pub royal_jelly_pollen_cost: f32,
    pub royal_jelly_output: f32,
    /// Beeswax: honey + pollen in, wax out, per completed work
    pub beeswax_honey_cost: f32,
    pub beeswax_pollen_cost: f32,
    pub beeswax_output: f32,
    /// Honey burned per thermoregulation work
    pub thermoregulation_honey_cost: f32,

    // === HIVE CELLS ===
    pub basic_cell_capacity: f32,
    pub nursery_cell_capacity: f32,
    pub honey_cell_capacity: f32,
    pub pollen_cell_capacity: f32,
    /// Brood requires warm nurseries
    pub nursery_target_temperature: f32,
    pub ambient_temperature: f32,
    /// Degrees lost per second toward ambient
    pub cell_temperature_decay_rate: f32,
    /// Degrees added by one completed thermoregulation work
    pub cell_heat_per_work: f32,
    /// Construction progress added by one completed build work
    pub build_progress_per_work: f32,
    /// Cells present when the hive is founded
    pub starting_nursery_cells: usize,
    pub starting_storage_cells: usize,
    pub starting_unbuilt_cells: usize,

    // === TASKS ===
    /// Tasks beyond this cap are silently dropped at generation time
    pub max_concurrent_tasks: usize,
    /// Seconds between category/progress refreshes
    pub task_update_interval: f32,
    /// Seconds between automatic generation passes
    pub task_generation_interval: f32,
    /// Default work duration for generated tasks
    pub task_work_duration: f32,
    /// Completed tasks older than this (simulation seconds) are purged
    pub completed_task_retention: f32,
    /// Stock thresholds that trigger forage/production tasks
    pub forage_honey_threshold: f32,
    pub forage_pollen_threshold: f32,
    pub royal_jelly_threshold: f32,
    pub beeswax_threshold: f32,

    // === FORAGING ===
    /// Flight speed used for pioneer and route traversal, units per second
    pub foraging_speed: f32,
    /// Seconds between recorded path samples in pioneer mode
    pub path_sample_interval: f32,
    pub max_concurrent_foragers: usize,
    /// Node refill per second
    pub node_regen_rate: f32,
    pub node_harvest_rate: f32,

    // === EXTERNAL MAP ===
    pub map_width: f32,
    pub map_height: f32,
    pub honey_node_count: usize,
    pub pollen_node_count: usize,
    pub honey_node_capacity: f32,
    pub pollen_node_capacity: f32,

    // === HAZARDS ===
    pub spider_count: usize,
    pub spider_damage: f32,
    pub spider_radius: f32,
    pub spider_activation_chance: f32,
    pub spider_duration: f32,
    pub wind_count: usize,
    pub wind_damage: f32,
    pub wind_radius: f32,
    pub wind_activation_chance: f32,
    pub wind_duration: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            // Time: 5 minute cycles, 70% day
            cycle_duration: 300.0,
            day_phase_ratio: 0.7,
            spring_cycles: 10,
            summer_cycles: 15,
            autumn_cycles: 10,
            winter_cycles: 10,

            // Workers
            max_bee_population: 100,
            bee_lifespan: 20.0,
            bee_carry_capacity: 2.0,
            bee_work_efficiency: 1.0,
            bee_health_regen_rate: 0.1,
            bee_max_health: 100.0,
            starting_workers: 10,
            starting_queens: 1,

            // Queen
            queen_lifespan: 100.0,
            queen_hunger_decay_per_cycle: 5.0,
            queen_max_hunger: 100.0,
            queen_egg_lay_interval: 30.0,
            queen_max_eggs_per_laying: 3,
            queen_lay_efficiency: 1.0,
            queen_feed_royal_jelly: 5.0,

            // Brood
            egg_duration_cycles: 3.0,
            larva_duration_cycles: 6.0,
            pupa_duration_cycles: 12.0,
            brood_nutrition_decay_rate: 0.1,
            brood_growth_nutrition_threshold: 0.8,
            brood_feed_honey: 2.0,
            brood_feed_pollen: 1.0,

            // Resources
            starting_honey: 100.0,
            starting_pollen: 50.0,
            starting_beeswax: 20.0,
            starting_royal_jelly: 10.0,
            honey_per_bee_per_cycle: 2.0,
            royal_jelly_per_queen_per_cycle: 5.0,
            winter_honey_multiplier: 2.0,

            // Conversions
            royal_jelly_honey_cost: 2.0,
            royal_jelly_pollen_cost: 1.0,
            royal_jelly_output: 1.0,
            beeswax_honey_cost: 3.0,
            beeswax_pollen_cost: 1.0,
            beeswax_output: 1.0,
            thermoregulation_honey_cost: 1.0,

            // Hive cells
            basic_cell_capacity: 1.0,
            nursery_cell_capacity: 1.0,
            honey_cell_capacity: 10.0,
            pollen_cell_capacity: 8.0,
            nursery_target_temperature: 35.0,
            ambient_temperature: 20.0,
            cell_temperature_decay_rate: 2.0,
            cell_heat_per_work: 5.0,
            build_progress_per_work: 0.25,
            starting_nursery_cells: 4,
            starting_storage_cells: 2,
            starting_unbuilt_cells: 2,

            // Tasks
            max_concurrent_tasks: 20,
            task_update_interval: 1.0,
            task_generation_interval: 5.0,
            task_work_duration: 5.0,
            completed_task_retention: 600.0,
            forage_honey_threshold: 50.0,
            forage_pollen_threshold: 30.0,
            royal_jelly_threshold: 10.0,
            beeswax_threshold: 15.0,

            // Foraging
            foraging_speed: 5.0,
            path_sample_interval: 0.5,
            max_concurrent_foragers: 10,
            node_regen_rate: 1.0,
            node_harvest_rate: 2.0,

            // External map
            map_width: 100.0,
            map_height: 20.0,
            honey_node_count: 3,
            pollen_node_count: 3,
            honey_node_capacity: 100.0,
            pollen_node_capacity: 80.0,

            // Hazards
            spider_count: 2,
            spider_damage: 20.0,
            spider_radius: 3.0,
            spider_activation_chance: 0.1,
            spider_duration: 5.0,
            wind_count: 1,
            wind_damage: 10.0,
            wind_radius: 5.0,
            wind_activation_chance: 0.05,
            wind_duration: 10.0,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total cycles in one seasonal year
    pub fn total_cycles_in_year(&self) -> u32 {
        self.spring_cycles + self.summer_cycles + self.autumn_cycles + self.winter_cycles
    }

    /// Daytime length in seconds
    pub fn day_duration(&self) -> f32 {
        self.cycle_duration * self.day_phase_ratio
    }

    /// Night length in seconds
    pub fn night_duration(&self) -> f32 {
        self.cycle_duration * (1.0 - self.day_phase_ratio)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.cycle_duration <= 0.0 {
            return Err(HiveError::InvalidConfig(format!(
                "cycle_duration ({}) must be positive",
                self.cycle_duration
            )));
        }

        if self.day_phase_ratio <= 0.0 || self.day_phase_ratio >= 1.0 {
            return Err(HiveError::InvalidConfig(format!(
                "day_phase_ratio ({}) must be in (0, 1)",
                self.day_phase_ratio
            )));
        }

        if self.total_cycles_in_year() == 0 {
            return Err(HiveError::InvalidConfig(
                "at least one season must have cycles".into(),
            ));
        }

        if self.bee_lifespan <= 0.0 || self.queen_lifespan <= 0.0 {
            return Err(HiveError::InvalidConfig("lifespans must be positive".into()));
        }

        if self.brood_growth_nutrition_threshold > 1.0 {
            return Err(HiveError::InvalidConfig(format!(
                "brood_growth_nutrition_threshold ({}) cannot exceed 1.0",
                self.brood_growth_nutrition_threshold
            )));
        }

        if self.max_concurrent_foragers == 0 {
            return Err(HiveError::InvalidConfig(
                "max_concurrent_foragers must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
