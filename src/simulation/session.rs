//! Simulation session - owns every component and drives the tick order
//!
//! Components are constructed here and passed to each other explicitly;
//! there are no global managers. Each tick runs the fixed order
//! clock -> ledger cyclic effects -> lifecycle -> cells -> foraging ->
//! scheduler, and returns the aggregated event batch.

use crate::core::clock::{ClockEvent, HiveClock, Season};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{BeeId, BroodId, NodeId, TaskId, Vec2};
use crate::entity::bee::BeeRole;
use crate::entity::population::{random_bee_name, Population};
use crate::foraging::map::{ForagingEvent, ForagingMap};
use crate::hive::cells::{CellEvent, CellKind, CellRegistry, HiveCell};
use crate::hive::ledger::{ResourceKind, ResourceLedger};
use crate::simulation::events::SimEvent;
use crate::simulation::lifecycle::{self, LifecycleEvent};
use crate::tasks::scheduler::TaskScheduler;
use crate::tasks::task::{HiveTask, TaskKind, TaskPriority};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// The whole simulation, owned as one session object
pub struct Simulation {
    config: SimulationConfig,
    clock: HiveClock,
    ledger: ResourceLedger,
    cells: CellRegistry,
    population: Population,
    foraging: ForagingMap,
    scheduler: TaskScheduler,
    rng: ChaCha8Rng,
    sim_time: f32,
    pending: Vec<SimEvent>,
}

/// Point-in-time snapshot for reporting
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub cycle: u32,
    pub season: Season,
    pub is_day: bool,
    pub workers: usize,
    pub queens: usize,
    pub broods: usize,
    pub honey: f32,
    pub pollen: f32,
    pub beeswax: f32,
    pub royal_jelly: f32,
    pub discovered_nodes: usize,
    pub routes: usize,
    pub tasks_total: usize,
    pub tasks_completed: usize,
}

impl Simulation {
    /// Build a session from a validated config and a deterministic seed
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let clock = HiveClock::new(&config);
        let ledger = ResourceLedger::new(
            config.starting_honey,
            config.starting_pollen,
            config.starting_beeswax,
            config.starting_royal_jelly,
            config.honey_per_bee_per_cycle,
            config.royal_jelly_per_queen_per_cycle,
        );
        let foraging = ForagingMap::generate(&config, &mut rng);

        let mut cells = CellRegistry::new(&config);
        seed_cells(&mut cells, &config);

        let mut population = Population::new(&config);
        let entrance = foraging.hive_entrance();
        for _ in 0..config.starting_queens {
            let name = random_bee_name(&mut rng);
            population.spawn_queen(name, entrance, &config);
        }
        for _ in 0..config.starting_workers {
            let name = random_bee_name(&mut rng);
            population.spawn_worker(name, entrance, &config);
        }

        let scheduler = TaskScheduler::new(&config);
        let pending = clock.startup_events().into_iter().map(SimEvent::from).collect();

        tracing::info!(
            workers = population.worker_count(),
            queens = population.queen_count(),
            nodes = foraging.nodes().len(),
            "simulation session created"
        );

        Ok(Self {
            config,
            clock,
            ledger,
            cells,
            population,
            foraging,
            scheduler,
            rng,
            sim_time: 0.0,
            pending,
        })
    }

    /// Advance the simulation by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> Vec<SimEvent> {
        let mut events: Vec<SimEvent> = std::mem::take(&mut self.pending);

        self.sim_time += dt;
        let clock_events = self.clock.advance(dt);

        for event in &clock_events {
            match event {
                ClockEvent::CycleEnd(cycle) => {
                    self.ledger.consume_cyclic(
                        self.population.worker_count(),
                        self.population.queen_count(),
                        self.clock.honey_consumption_multiplier(),
                    );

                    for lifecycle_event in lifecycle::on_cycle_end(&mut self.population) {
                        self.react_to_lifecycle(&lifecycle_event);
                        events.push(lifecycle_event.into());
                    }

                    if cycle % 5 == 0 {
                        self.scheduler.cleanup(self.sim_time);
                    }
                }
                ClockEvent::Nightfall => {
                    lifecycle::on_nightfall(&mut self.population);
                    let count = self.foraging.recall_all(&mut self.population);
                    if count > 0 {
                        events.push(ForagingEvent::ForagersRecalled { count }.into());
                    }
                }
                ClockEvent::Daybreak => {
                    lifecycle::on_daybreak(&mut self.population);
                }
                ClockEvent::SeasonChanged(Season::Winter) => {
                    let count = self.foraging.recall_all(&mut self.population);
                    if count > 0 {
                        events.push(ForagingEvent::ForagersRecalled { count }.into());
                    }
                }
                _ => {}
            }
        }
        events.extend(clock_events.into_iter().map(SimEvent::from));

        // Agent lifecycle
        lifecycle::tick_bees(
            &mut self.population,
            &mut self.ledger,
            &mut self.cells,
            &self.config,
            dt,
        );
        for event in lifecycle::tick_queens(&mut self.population, &mut self.cells, &self.config, dt)
        {
            self.react_to_lifecycle(&event);
            events.push(event.into());
        }
        let spawn_position = self.foraging.hive_entrance();
        for event in lifecycle::tick_broods(
            &mut self.population,
            &mut self.cells,
            &self.config,
            spawn_position,
            &mut self.rng,
            dt,
        ) {
            self.react_to_lifecycle(&event);
            events.push(event.into());
        }

        // Hive cells cool toward ambient
        self.cells.tick(dt);

        // External map: pioneer, foragers, hazards, node regeneration
        for event in self
            .foraging
            .tick(dt, &mut self.population, &mut self.ledger, &mut self.rng)
        {
            events.push(event.into());
        }

        // Deaths are swept after all damage sources have run
        for dead in self.population.remove_dead() {
            self.foraging.handle_bee_death(dead.id);
            self.scheduler.handle_bee_death(dead.id);
            tracing::debug!(bee = %dead.name, "bee died");
            events.push(
                LifecycleEvent::BeeDied {
                    id: dead.id,
                    name: dead.name,
                }
                .into(),
            );
        }

        // Scheduler: categories, generation, assignment
        for event in self.scheduler.tick(
            dt,
            self.sim_time,
            &self.ledger,
            &self.cells,
            &self.clock,
            &mut self.foraging,
            &mut self.population,
        ) {
            events.push(event.into());
        }

        // Completed cells retire their build tasks
        for event in self.cells.drain_events() {
            if let CellEvent::Built(cell) = event {
                self.scheduler.handle_cell_built(cell);
            }
            events.push(event.into());
        }

        for event in self.ledger.drain_events() {
            events.push(event.into());
        }

        events
    }

    /// Event-driven task creation: hungry larvae and queens get critical
    /// supply tasks immediately, outside the generation timer
    fn react_to_lifecycle(&mut self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::BroodNeedsFeeding(brood) => {
                self.scheduler.create_feed_brood_task(*brood, self.sim_time);
            }
            LifecycleEvent::QueenHungry(queen) => {
                self.scheduler.create_feed_queen_task(*queen, self.sim_time);
            }
            _ => {}
        }
    }

    // === Command surface for the input layer ===

    /// Start a pioneer flight; requires daytime outside winter
    pub fn start_pioneer(&mut self, bee: BeeId) -> bool {
        if !self.clock.can_forage() {
            return false;
        }
        let Some(bee) = self.population.get_mut(bee) else {
            return false;
        };
        self.foraging.start_pioneer(bee)
    }

    /// Steer the active pioneer toward the node nearest to a position
    pub fn set_pioneer_target(&mut self, position: Vec2) -> Option<NodeId> {
        self.foraging.set_pioneer_target(position)
    }

    /// Cancel the pioneer flight, discarding the recorded path
    pub fn end_pioneer(&mut self) {
        self.foraging.end_pioneer(&mut self.population);
    }

    /// Send an idle bee down an established route to a node
    pub fn assign_forager(&mut self, bee: BeeId, node: NodeId) -> bool {
        if !self.clock.can_forage() {
            return false;
        }
        let Some(bee) = self.population.get_mut(bee) else {
            return false;
        };
        self.foraging.assign_bee_to_node(bee, node, self.sim_time)
    }

    /// Manually assign a role to a bee
    pub fn assign_role(&mut self, bee: BeeId, role: BeeRole) -> bool {
        let Some(bee) = self.population.get_mut(bee) else {
            return false;
        };
        bee.assign_role(role);
        if role != BeeRole::Idle {
            bee.start_work(self.config.task_work_duration);
        }
        true
    }

    /// Create a task outside the automatic generation rules
    pub fn create_manual_task(
        &mut self,
        kind: TaskKind,
        priority: TaskPriority,
        description: &str,
    ) -> Option<TaskId> {
        self.scheduler.create_task(HiveTask::new(
            kind,
            priority,
            description,
            self.config.task_work_duration,
            self.sim_time,
        ))
    }

    /// Feed the queen royal jelly from the ledger
    pub fn feed_queen(&mut self) -> bool {
        let amount = self.config.queen_feed_royal_jelly;
        let Some(queen_id) = self.population.queen_id() else {
            return false;
        };
        let Some(queen) = self
            .population
            .get_mut(queen_id)
            .and_then(|bee| bee.queen_state_mut())
        else {
            return false;
        };
        queen.feed_royal_jelly(&mut self.ledger, amount)
    }

    /// Feed a specific larva honey and pollen from the ledger
    pub fn feed_brood(&mut self, brood: BroodId) -> bool {
        let honey = self.config.brood_feed_honey;
        let pollen = self.config.brood_feed_pollen;
        let Some(brood) = self.population.get_brood_mut(brood) else {
            return false;
        };
        brood.feed(&mut self.ledger, honey, pollen)
    }

    /// Recall every active forager to the hive
    pub fn recall_foragers(&mut self) -> usize {
        self.foraging.recall_all(&mut self.population)
    }

    // === Snapshot accessors ===

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn clock(&self) -> &HiveClock {
        &self.clock
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn cells(&self) -> &CellRegistry {
        &self.cells
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn foraging(&self) -> &ForagingMap {
        &self.foraging
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            cycle: self.clock.cycle(),
            season: self.clock.season(),
            is_day: self.clock.is_day(),
            workers: self.population.worker_count(),
            queens: self.population.queen_count(),
            broods: self.population.brood_count(),
            honey: self.ledger.get(ResourceKind::Honey),
            pollen: self.ledger.get(ResourceKind::Pollen),
            beeswax: self.ledger.get(ResourceKind::Beeswax),
            royal_jelly: self.ledger.get(ResourceKind::RoyalJelly),
            discovered_nodes: self.foraging.discovered_nodes().len(),
            routes: self.foraging.routes().len(),
            tasks_total: self.scheduler.total_count(),
            tasks_completed: self.scheduler.completed_count(),
        }
    }
}

/// Lay out the founding comb: nurseries and storage ready to use, a few
/// basic cells left for the builders
fn seed_cells(cells: &mut CellRegistry, config: &SimulationConfig) {
    let position = |column: usize| Vec2::new(column as f32 * 1.5, -5.0);
    let mut column = 0;

    let mut add_built = |cells: &mut CellRegistry, kind: CellKind, column: &mut usize| {
        let mut cell = HiveCell::new(kind, position(*column), config);
        cell.construction_progress = 1.0;
        cells.add_cell(cell);
        *column += 1;
    };

    for _ in 0..config.starting_nursery_cells {
        add_built(cells, CellKind::Nursery, &mut column);
    }
    for _ in 0..config.starting_storage_cells {
        add_built(cells, CellKind::HoneyStorage, &mut column);
    }
    for _ in 0..config.starting_storage_cells {
        add_built(cells, CellKind::PollenStorage, &mut column);
    }
    for _ in 0..config.starting_unbuilt_cells {
        cells.add_cell(HiveCell::new(CellKind::Basic, position(column), config));
        column += 1;
    }
}
