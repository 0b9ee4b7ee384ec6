//! Lifecycle systems - per-tick and per-cycle agent updates
//!
//! Free functions operating on the population plus the collaborators each
//! update needs. The session calls them in a fixed order every tick.

use crate::core::config::SimulationConfig;
use crate::core::types::{BeeId, BroodId, Vec2};
use crate::entity::bee::BeeRole;
use crate::entity::brood::{BroodStage, BroodTickOutcome};
use crate::entity::population::{random_bee_name, Population};
use crate::hive::cells::CellRegistry;
use crate::hive::ledger::{ResourceKind, ResourceLedger};
use rand::Rng;

/// Agent lifecycle occurrences reported to the outside
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    BeeSpawned { id: BeeId, name: String },
    BeeDied { id: BeeId, name: String },
    /// Recurs every tick while the queen stays hungry
    QueenHungry(BeeId),
    EggsLaid { queen: BeeId, count: u32 },
    BroodStageChanged { brood: BroodId, stage: BroodStage },
    BroodNeedsFeeding(BroodId),
    BroodMatured { brood: BroodId, bee: BeeId },
    BroodDied(BroodId),
}

/// Work progress, role economy effects and health regeneration
pub fn tick_bees(
    population: &mut Population,
    ledger: &mut ResourceLedger,
    cells: &mut CellRegistry,
    config: &SimulationConfig,
    dt: f32,
) {
    for i in 0..population.bees.len() {
        if !population.bees[i].is_alive() {
            continue;
        }

        population.bees[i].regenerate(dt);

        if !population.bees[i].update_work(dt) {
            continue;
        }

        let role = population.bees[i].role;
        population.bees[i].finish_work();

        match role {
            BeeRole::ProduceRoyalJelly => {
                ledger.convert(
                    ResourceKind::Honey,
                    config.royal_jelly_honey_cost,
                    ResourceKind::Pollen,
                    config.royal_jelly_pollen_cost,
                    ResourceKind::RoyalJelly,
                    config.royal_jelly_output,
                );
            }
            BeeRole::ProduceBeeswax => {
                ledger.convert(
                    ResourceKind::Honey,
                    config.beeswax_honey_cost,
                    ResourceKind::Pollen,
                    config.beeswax_pollen_cost,
                    ResourceKind::Beeswax,
                    config.beeswax_output,
                );
            }
            BeeRole::Thermoregulate => {
                if ledger.try_consume(ResourceKind::Honey, config.thermoregulation_honey_cost) {
                    if let Some(cell) = cells.coldest_nursery() {
                        cells.heat(cell, config.cell_heat_per_work);
                    }
                }
            }
            BeeRole::NurseLarvae => {
                nurse_work(population, ledger, config);
            }
            BeeRole::BuildCells => {
                if let Some(&cell) = cells.unconstructed().first() {
                    cells.build(cell, config.build_progress_per_work);
                }
            }
            BeeRole::CleanCells
            | BeeRole::ForageHoney
            | BeeRole::ForagePollen
            | BeeRole::Idle => {}
        }
    }
}

/// A nurse feeds the hungriest waiting larva, or the queen if no larva waits
fn nurse_work(population: &mut Population, ledger: &mut ResourceLedger, config: &SimulationConfig) {
    if let Some(brood_id) = population.hungriest_larva() {
        if let Some(brood) = population.get_brood_mut(brood_id) {
            brood.feed(ledger, config.brood_feed_honey, config.brood_feed_pollen);
        }
        return;
    }

    if let Some(queen_id) = population.queen_id() {
        if let Some(queen) = population
            .get_mut(queen_id)
            .and_then(|bee| bee.queen_state_mut())
        {
            if queen.is_hungry() {
                queen.feed_royal_jelly(ledger, config.queen_feed_royal_jelly);
            }
        }
    }
}

/// Queen hunger decay and egg laying
pub fn tick_queens(
    population: &mut Population,
    cells: &mut CellRegistry,
    config: &SimulationConfig,
    dt: f32,
) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();

    for i in 0..population.bees.len() {
        if !population.bees[i].is_alive() {
            continue;
        }
        let queen_id = population.bees[i].id;

        let (hungry, lay_due, attempt) = {
            let Some(queen) = population.bees[i].queen_state_mut() else {
                continue;
            };
            queen.update_hunger(dt, config.cycle_duration);
            let hungry = queen.is_hungry();
            let lay_due = queen.update_egg_timer(dt);
            (hungry, lay_due, queen.eggs_per_attempt())
        };

        if hungry {
            events.push(LifecycleEvent::QueenHungry(queen_id));
        }

        if lay_due {
            let nurseries = cells.empty_nurseries();
            let mut laid = 0;
            for cell in nurseries.into_iter().take(attempt as usize) {
                if cells.place_egg(cell) {
                    population.add_brood(cell, config);
                    laid += 1;
                }
            }
            if laid > 0 {
                events.push(LifecycleEvent::EggsLaid {
                    queen: queen_id,
                    count: laid,
                });
                tracing::debug!(count = laid, "queen laid eggs");
            }
        }
    }

    events
}

/// Brood growth, starvation and maturation into new workers
pub fn tick_broods(
    population: &mut Population,
    cells: &mut CellRegistry,
    config: &SimulationConfig,
    spawn_position: Vec2,
    rng: &mut impl Rng,
    dt: f32,
) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();
    let mut matured = Vec::new();
    let mut died = Vec::new();

    for i in 0..population.broods.len() {
        let id = population.broods[i].id;
        match population.broods[i].tick(dt) {
            BroodTickOutcome::None => {}
            BroodTickOutcome::StageChanged(stage) => {
                events.push(LifecycleEvent::BroodStageChanged { brood: id, stage });
                if stage == BroodStage::Larva {
                    events.push(LifecycleEvent::BroodNeedsFeeding(id));
                }
            }
            BroodTickOutcome::Matured => matured.push(id),
            BroodTickOutcome::Died => died.push(id),
        }
    }

    for id in died {
        if let Some(brood) = population.remove_brood(id) {
            cells.vacate(brood.cell);
        }
        events.push(LifecycleEvent::BroodDied(id));
    }

    for id in matured {
        if let Some(brood) = population.remove_brood(id) {
            cells.vacate(brood.cell);
        }
        let name = random_bee_name(rng);
        match population.spawn_worker(name.clone(), spawn_position, config) {
            Some(bee) => {
                events.push(LifecycleEvent::BroodMatured { brood: id, bee });
                events.push(LifecycleEvent::BeeSpawned { id: bee, name });
            }
            None => {
                // Population cap: the brood still leaves its cell
                events.push(LifecycleEvent::BroodMatured {
                    brood: id,
                    bee: BeeId::new(),
                });
                tracing::warn!("matured brood lost to the population cap");
            }
        }
    }

    events
}

/// Cycle end: every agent ages one cycle, larvae call for food
pub fn on_cycle_end(population: &mut Population) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();

    for bee in population.bees.iter_mut() {
        if bee.is_alive() {
            bee.age_one_cycle();
        }
    }

    for brood in population.broods.iter_mut() {
        if brood.on_cycle_end() {
            events.push(LifecycleEvent::BroodNeedsFeeding(brood.id));
        }
    }

    events
}

/// Nightfall: everyone but the dying falls asleep
pub fn on_nightfall(population: &mut Population) {
    for bee in population.bees.iter_mut() {
        bee.fall_asleep();
    }
}

/// Daybreak: sleepers wake back to idling
pub fn on_daybreak(population: &mut Population) {
    for bee in population.bees.iter_mut() {
        bee.wake();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hive::cells::{CellKind, HiveCell};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (Population, ResourceLedger, CellRegistry, SimulationConfig) {
        let config = SimulationConfig::default();
        let population = Population::new(&config);
        let ledger = ResourceLedger::new(100.0, 50.0, 20.0, 10.0, 2.0, 5.0);
        let cells = CellRegistry::new(&config);
        (population, ledger, cells, config)
    }

    fn add_nursery(cells: &mut CellRegistry, config: &SimulationConfig) -> crate::core::types::CellId {
        let mut cell = HiveCell::new(CellKind::Nursery, Vec2::default(), config);
        cell.construction_progress = 1.0;
        cells.add_cell(cell)
    }

    #[test]
    fn test_royal_jelly_production_work() {
        let (mut population, mut ledger, mut cells, config) = setup();
        let id = population
            .spawn_worker("Jellymaker".into(), Vec2::default(), &config)
            .unwrap();

        let bee = population.get_mut(id).unwrap();
        bee.assign_role(BeeRole::ProduceRoyalJelly);
        bee.start_work(5.0);

        tick_bees(&mut population, &mut ledger, &mut cells, &config, 5.0);

        // 2 honey + 1 pollen converted into 1 royal jelly
        assert!((ledger.get(ResourceKind::Honey) - 98.0).abs() < 0.001);
        assert!((ledger.get(ResourceKind::Pollen) - 49.0).abs() < 0.001);
        assert!((ledger.get(ResourceKind::RoyalJelly) - 11.0).abs() < 0.001);

        // Work done, back to idle
        let bee = population.get(id).unwrap();
        assert_eq!(bee.role, BeeRole::Idle);
        assert!(!bee.is_working());
    }

    #[test]
    fn test_thermoregulation_heats_coldest_nursery() {
        let (mut population, mut ledger, mut cells, config) = setup();
        let nursery = add_nursery(&mut cells, &config);

        let id = population
            .spawn_worker("Heater".into(), Vec2::default(), &config)
            .unwrap();
        let bee = population.get_mut(id).unwrap();
        bee.assign_role(BeeRole::Thermoregulate);
        bee.start_work(5.0);

        tick_bees(&mut population, &mut ledger, &mut cells, &config, 5.0);

        assert!((ledger.get(ResourceKind::Honey) - 99.0).abs() < 0.001);
        assert!((cells.get(nursery).unwrap().temperature - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_nurse_feeds_hungriest_larva() {
        let (mut population, mut ledger, mut cells, config) = setup();
        let cell = add_nursery(&mut cells, &config);
        let brood = population.add_brood(cell, &config);
        {
            let b = population.get_brood_mut(brood).unwrap();
            b.stage = BroodStage::Larva;
            b.nutrition = 0.4;
            b.needs_feeding = true;
        }

        let id = population
            .spawn_worker("Nurse".into(), Vec2::default(), &config)
            .unwrap();
        let bee = population.get_mut(id).unwrap();
        bee.assign_role(BeeRole::NurseLarvae);
        bee.start_work(5.0);

        tick_bees(&mut population, &mut ledger, &mut cells, &config, 5.0);

        let b = population.get_brood(brood).unwrap();
        assert!(!b.needs_feeding);
        assert!((b.nutrition - 0.7).abs() < 0.01);
    }

    #[test]
    fn test_queen_lays_into_available_nurseries() {
        let (mut population, _ledger, mut cells, config) = setup();
        for _ in 0..2 {
            add_nursery(&mut cells, &config);
        }
        population.spawn_queen("Regina".into(), Vec2::default(), &config);

        // One full lay interval with a well-fed queen
        let events = tick_queens(&mut population, &mut cells, &config, 30.0);

        // max 3 eggs per laying but only 2 nursery cells
        assert!(events
            .iter()
            .any(|e| matches!(e, LifecycleEvent::EggsLaid { count: 2, .. })));
        assert_eq!(population.brood_count(), 2);
        assert!(cells.empty_nurseries().is_empty());
    }

    #[test]
    fn test_hungry_queen_signal_recurs() {
        let (mut population, _ledger, mut cells, config) = setup();
        let id = population
            .spawn_queen("Regina".into(), Vec2::default(), &config)
            .unwrap();
        population
            .get_mut(id)
            .unwrap()
            .queen_state_mut()
            .unwrap()
            .hunger = 10.0;

        let first = tick_queens(&mut population, &mut cells, &config, 1.0);
        let second = tick_queens(&mut population, &mut cells, &config, 1.0);
        assert!(first.contains(&LifecycleEvent::QueenHungry(id)));
        assert!(second.contains(&LifecycleEvent::QueenHungry(id)));
    }

    #[test]
    fn test_starved_brood_dies_and_vacates_cell() {
        let (mut population, _ledger, mut cells, config) = setup();
        let cell = add_nursery(&mut cells, &config);
        assert!(cells.place_egg(cell));
        let brood = population.add_brood(cell, &config);
        {
            let b = population.get_brood_mut(brood).unwrap();
            b.stage = BroodStage::Larva;
            b.nutrition = 0.01;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let events = tick_broods(
            &mut population,
            &mut cells,
            &config,
            Vec2::default(),
            &mut rng,
            1.0,
        );

        assert!(events.contains(&LifecycleEvent::BroodDied(brood)));
        assert_eq!(population.brood_count(), 0);
        assert!(!cells.get(cell).unwrap().occupied);
    }

    #[test]
    fn test_matured_brood_spawns_worker() {
        let (mut population, _ledger, mut cells, config) = setup();
        let cell = add_nursery(&mut cells, &config);
        assert!(cells.place_egg(cell));
        let brood = population.add_brood(cell, &config);
        {
            let b = population.get_brood_mut(brood).unwrap();
            b.stage = BroodStage::Pupa;
            b.stage_timer = config.pupa_duration_cycles * config.cycle_duration - 0.5;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let events = tick_broods(
            &mut population,
            &mut cells,
            &config,
            Vec2::default(),
            &mut rng,
            1.0,
        );

        assert!(events
            .iter()
            .any(|e| matches!(e, LifecycleEvent::BroodMatured { brood: b, .. } if *b == brood)));
        assert_eq!(population.brood_count(), 0);
        assert_eq!(population.worker_count(), 1);
        assert!(!cells.get(cell).unwrap().occupied);
    }

    #[test]
    fn test_aging_and_sleep_cycle() {
        let (mut population, _ledger, _cells, config) = setup();
        let id = population
            .spawn_worker("Sleeper".into(), Vec2::default(), &config)
            .unwrap();

        on_cycle_end(&mut population);
        assert!((population.get(id).unwrap().age - 1.0).abs() < 0.001);

        on_nightfall(&mut population);
        assert_eq!(
            population.get(id).unwrap().state,
            crate::entity::bee::BeeState::Sleeping
        );

        on_daybreak(&mut population);
        assert_eq!(
            population.get(id).unwrap().state,
            crate::entity::bee::BeeState::Idling
        );
    }
}
