//! Task scheduler - generates, prioritizes, assigns and retires colony work
//!
//! Categories are refreshed on a fixed interval, generation runs on a longer
//! one, and idle bees are matched greedily against the highest-priority
//! available tasks every tick. Critical supply tasks for hungry larvae and
//! the queen bypass the generation timer entirely.

use crate::core::clock::HiveClock;
use crate::core::config::SimulationConfig;
use crate::core::types::{BeeId, BroodId, CellId, TaskId};
use crate::entity::bee::BeeRole;
use crate::entity::population::Population;
use crate::foraging::map::ForagingMap;
use crate::hive::cells::CellRegistry;
use crate::hive::ledger::{ResourceKind, ResourceLedger};
use crate::tasks::task::{HiveTask, TaskKind, TaskPriority, TaskStatus, TaskTarget};
use serde::{Deserialize, Serialize};

/// Scheduler occurrences reported to the outside
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Created(TaskId),
    Assigned { task: TaskId, bee: BeeId },
    Completed(TaskId),
    Failed(TaskId),
}

/// The colony-wide task board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskScheduler {
    tasks: Vec<HiveTask>,
    available: Vec<TaskId>,
    active: Vec<TaskId>,
    completed: Vec<TaskId>,

    update_timer: f32,
    generation_timer: f32,
    pub auto_generate: bool,

    max_concurrent_tasks: usize,
    update_interval: f32,
    generation_interval: f32,
    work_duration: f32,
    retention: f32,
    forage_honey_threshold: f32,
    forage_pollen_threshold: f32,
    royal_jelly_threshold: f32,
    beeswax_threshold: f32,

    #[serde(skip)]
    events: Vec<TaskEvent>,
}

impl TaskScheduler {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            tasks: Vec::new(),
            available: Vec::new(),
            active: Vec::new(),
            completed: Vec::new(),
            update_timer: 0.0,
            generation_timer: 0.0,
            auto_generate: true,
            max_concurrent_tasks: config.max_concurrent_tasks,
            update_interval: config.task_update_interval,
            generation_interval: config.task_generation_interval,
            work_duration: config.task_work_duration,
            retention: config.completed_task_retention,
            forage_honey_threshold: config.forage_honey_threshold,
            forage_pollen_threshold: config.forage_pollen_threshold,
            royal_jelly_threshold: config.royal_jelly_threshold,
            beeswax_threshold: config.beeswax_threshold,
            events: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[HiveTask] {
        &self.tasks
    }

    pub fn get_task(&self, id: TaskId) -> Option<&HiveTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Add a task to the board; silently dropped beyond the global cap
    pub fn create_task(&mut self, task: HiveTask) -> Option<TaskId> {
        if self.tasks.len() >= self.max_concurrent_tasks {
            return None;
        }
        let id = task.id;
        self.tasks.push(task);
        self.events.push(TaskEvent::Created(id));
        Some(id)
    }

    /// An open (not completed/failed) task of this kind aimed at this target
    fn has_open_task(&self, kind: TaskKind, target: Option<TaskTarget>) -> bool {
        self.tasks.iter().any(|t| {
            t.kind == kind && (t.is_available() || t.is_active()) && t.target == target
        })
    }

    fn has_open_forage_task(&self, resource: ResourceKind) -> bool {
        self.tasks.iter().any(|t| {
            t.kind == TaskKind::Forage
                && (t.is_available() || t.is_active())
                && t.resource.map(|(kind, _)| kind) == Some(resource)
        })
    }

    /// Immediate critical supply task for a larva calling for food
    pub fn create_feed_brood_task(&mut self, brood: BroodId, now: f32) -> Option<TaskId> {
        let target = TaskTarget::Brood(brood);
        if self.has_open_task(TaskKind::Supply, Some(target)) {
            return None;
        }
        self.create_task(
            HiveTask::new(
                TaskKind::Supply,
                TaskPriority::Critical,
                "Feed larva",
                self.work_duration,
                now,
            )
            .with_target(target),
        )
    }

    /// Immediate critical supply task for a hungry queen
    ///
    /// The hungry signal recurs every tick, so this deduplicates to one
    /// outstanding task per queen.
    pub fn create_feed_queen_task(&mut self, queen: BeeId, now: f32) -> Option<TaskId> {
        let target = TaskTarget::Queen(queen);
        if self.has_open_task(TaskKind::Supply, Some(target)) {
            return None;
        }
        self.create_task(
            HiveTask::new(
                TaskKind::Supply,
                TaskPriority::Critical,
                "Feed queen royal jelly",
                self.work_duration,
                now,
            )
            .with_target(target),
        )
    }

    /// Advance timers, refresh categories, generate and assign
    pub fn tick(
        &mut self,
        dt: f32,
        now: f32,
        ledger: &ResourceLedger,
        cells: &CellRegistry,
        clock: &HiveClock,
        foraging: &mut ForagingMap,
        population: &mut Population,
    ) -> Vec<TaskEvent> {
        self.update_timer += dt;
        if self.update_timer >= self.update_interval {
            self.update_timer = 0.0;
            self.update_progress(now);
            self.refresh_categories();
        }

        if self.auto_generate {
            self.generation_timer += dt;
            if self.generation_timer >= self.generation_interval {
                self.generation_timer = 0.0;
                self.generate(ledger, cells, now);
            }
        }

        self.assign_idle_bees(now, clock, foraging, population);

        std::mem::take(&mut self.events)
    }

    /// Progress runs on the update interval, decoupled from bee work timers
    fn update_progress(&mut self, now: f32) {
        let step = self.update_interval;
        for task in &mut self.tasks {
            if task.status == TaskStatus::InProgress && task.update_progress(step, now) {
                self.events.push(TaskEvent::Completed(task.id));
            }
        }
    }

    /// Partition tasks by status into the cached category lists
    fn refresh_categories(&mut self) {
        self.available.clear();
        self.active.clear();
        self.completed.clear();

        for task in &self.tasks {
            match task.status {
                TaskStatus::Available => self.available.push(task.id),
                TaskStatus::Assigned | TaskStatus::InProgress => self.active.push(task.id),
                TaskStatus::Completed => self.completed.push(task.id),
                TaskStatus::Failed => {}
            }
        }
    }

    /// Scan colony state and create whatever work is missing
    fn generate(&mut self, ledger: &ResourceLedger, cells: &CellRegistry, now: f32) {
        if ledger.get(ResourceKind::Honey) < self.forage_honey_threshold
            && !self.has_open_forage_task(ResourceKind::Honey)
        {
            self.create_task(
                HiveTask::new(
                    TaskKind::Forage,
                    TaskPriority::High,
                    "Collect honey",
                    self.work_duration,
                    now,
                )
                .with_resource(ResourceKind::Honey, 10.0),
            );
        }

        if ledger.get(ResourceKind::Pollen) < self.forage_pollen_threshold
            && !self.has_open_forage_task(ResourceKind::Pollen)
        {
            self.create_task(
                HiveTask::new(
                    TaskKind::Forage,
                    TaskPriority::High,
                    "Collect pollen",
                    self.work_duration,
                    now,
                )
                .with_resource(ResourceKind::Pollen, 10.0),
            );
        }

        if ledger.get(ResourceKind::RoyalJelly) < self.royal_jelly_threshold
            && !self.has_open_task(TaskKind::ProduceRoyalJelly, None)
        {
            self.create_task(HiveTask::new(
                TaskKind::ProduceRoyalJelly,
                TaskPriority::Medium,
                "Produce royal jelly",
                self.work_duration,
                now,
            ));
        }

        if ledger.get(ResourceKind::Beeswax) < self.beeswax_threshold
            && !self.has_open_task(TaskKind::ProduceBeeswax, None)
        {
            self.create_task(HiveTask::new(
                TaskKind::ProduceBeeswax,
                TaskPriority::Medium,
                "Produce beeswax",
                self.work_duration,
                now,
            ));
        }

        for cell in cells.unconstructed() {
            let target = TaskTarget::Cell(cell);
            if !self.has_open_task(TaskKind::Build, Some(target)) {
                self.create_task(
                    HiveTask::new(
                        TaskKind::Build,
                        TaskPriority::Medium,
                        "Build cell",
                        self.work_duration,
                        now,
                    )
                    .with_target(target),
                );
            }
        }

        for cell in cells.nurseries_below_target() {
            let target = TaskTarget::Cell(cell);
            if !self.has_open_task(TaskKind::Thermoregulate, Some(target)) {
                self.create_task(
                    HiveTask::new(
                        TaskKind::Thermoregulate,
                        TaskPriority::High,
                        "Heat nursery cell",
                        self.work_duration,
                        now,
                    )
                    .with_target(target),
                );
            }
        }
    }

    /// Greedy single pass: highest priority first, first eligible idle bee
    fn assign_idle_bees(
        &mut self,
        now: f32,
        clock: &HiveClock,
        foraging: &mut ForagingMap,
        population: &mut Population,
    ) {
        let mut idle = population.idle_workers();
        if idle.is_empty() {
            return;
        }

        // Stable sort keeps creation order within a priority level
        let mut order: Vec<(TaskPriority, TaskId)> = self
            .available
            .iter()
            .filter_map(|&id| {
                self.tasks
                    .iter()
                    .find(|t| t.id == id && t.is_available())
                    .map(|t| (t.priority, t.id))
            })
            .collect();
        order.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, task_id) in order {
            if idle.is_empty() {
                break;
            }

            let Some(task_idx) = self.tasks.iter().position(|t| t.id == task_id) else {
                continue;
            };
            let kind = self.tasks[task_idx].kind;
            let resource = self.tasks[task_idx].resource.map(|(k, _)| k);

            if kind == TaskKind::Forage {
                let forage_kind = resource.unwrap_or(ResourceKind::Honey);
                if !clock.can_forage() {
                    continue;
                }
                let Some(node) = foraging.best_node(forage_kind) else {
                    continue;
                };

                let bee_id = idle[0];
                let Some(bee) = population.get_mut(bee_id) else {
                    idle.remove(0);
                    continue;
                };
                bee.assign_role(kind.role(resource));
                if foraging.assign_bee_to_node(bee, node, now) {
                    idle.remove(0);
                    let task = &mut self.tasks[task_idx];
                    task.assign(bee_id, now);
                    task.start();
                    self.events.push(TaskEvent::Assigned { task: task_id, bee: bee_id });
                } else {
                    // Forager cap reached; leave the task for the next pass
                    bee.assign_role(BeeRole::Idle);
                }
            } else {
                let bee_id = idle.remove(0);
                let Some(bee) = population.get_mut(bee_id) else {
                    continue;
                };
                let duration = self.tasks[task_idx].duration;
                bee.assign_role(kind.role(resource));
                bee.start_work(duration);

                let task = &mut self.tasks[task_idx];
                task.assign(bee_id, now);
                task.start();
                self.events.push(TaskEvent::Assigned { task: task_id, bee: bee_id });
            }
        }
    }

    /// Explicit completion invoked by collaborators
    pub fn complete_task(&mut self, id: TaskId, now: f32) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if !task.is_active() {
            return false;
        }
        task.complete(now);
        self.events.push(TaskEvent::Completed(id));
        true
    }

    /// Explicit failure invoked by collaborators
    pub fn fail_task(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if task.is_completed() {
            return false;
        }
        task.fail();
        self.events.push(TaskEvent::Failed(id));
        true
    }

    /// A cell finished construction; outstanding build tasks for it go away
    pub fn handle_cell_built(&mut self, cell: CellId) {
        self.tasks
            .retain(|t| !(t.kind == TaskKind::Build && t.target == Some(TaskTarget::Cell(cell))));
    }

    /// A bee died; its tasks return to the pool
    pub fn handle_bee_death(&mut self, bee: BeeId) {
        for task in &mut self.tasks {
            if task.assigned_bee == Some(bee) && task.is_active() {
                task.reset();
            }
        }
    }

    /// Purge completed tasks older than the retention window
    pub fn cleanup(&mut self, now: f32) {
        let retention = self.retention;
        self.tasks.retain(|t| match (t.status, t.completed_at) {
            (TaskStatus::Completed, Some(at)) => now - at < retention,
            _ => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::foraging::node::ResourceNode;
    use crate::hive::cells::{CellKind, HiveCell};

    fn config() -> SimulationConfig {
        SimulationConfig {
            spider_count: 0,
            wind_count: 0,
            ..SimulationConfig::default()
        }
    }

    struct Fixture {
        scheduler: TaskScheduler,
        ledger: ResourceLedger,
        cells: CellRegistry,
        clock: HiveClock,
        foraging: ForagingMap,
        population: Population,
        config: SimulationConfig,
    }

    fn fixture() -> Fixture {
        let config = config();
        let mut population = Population::new(&config);
        for i in 0..4 {
            population.spawn_worker(format!("Worker {}", i), Vec2::default(), &config);
        }
        Fixture {
            scheduler: TaskScheduler::new(&config),
            ledger: ResourceLedger::new(100.0, 50.0, 20.0, 10.0, 2.0, 5.0),
            cells: CellRegistry::new(&config),
            clock: HiveClock::new(&config),
            foraging: ForagingMap::new(&config),
            population,
            config,
        }
    }

    fn run_tick(f: &mut Fixture, dt: f32, now: f32) -> Vec<TaskEvent> {
        f.scheduler.tick(
            dt,
            now,
            &f.ledger,
            &f.cells,
            &f.clock,
            &mut f.foraging,
            &mut f.population,
        )
    }

    #[test]
    fn test_generation_from_low_stocks() {
        let mut f = fixture();
        // Drain honey below threshold (50)
        f.ledger.try_consume(ResourceKind::Honey, 60.0);
        f.ledger.drain_events();

        // Generation fires after 5s
        let events = run_tick(&mut f, 5.0, 5.0);
        let created: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, TaskEvent::Created(_)))
            .collect();
        assert!(!created.is_empty());

        assert!(f
            .scheduler
            .tasks()
            .iter()
            .any(|t| t.kind == TaskKind::Forage));

        // Second pass does not duplicate the forage task
        let before = f.scheduler.total_count();
        run_tick(&mut f, 5.0, 10.0);
        let forage_count = f
            .scheduler
            .tasks()
            .iter()
            .filter(|t| t.kind == TaskKind::Forage)
            .count();
        assert_eq!(forage_count, 1);
        assert!(f.scheduler.total_count() >= before);
    }

    #[test]
    fn test_build_task_generation_and_cell_built() {
        let mut f = fixture();
        let cell = f
            .cells
            .add_cell(HiveCell::new(CellKind::Basic, Vec2::default(), &f.config));

        run_tick(&mut f, 5.0, 5.0);
        assert!(f
            .scheduler
            .tasks()
            .iter()
            .any(|t| t.kind == TaskKind::Build && t.target == Some(TaskTarget::Cell(cell))));

        f.scheduler.handle_cell_built(cell);
        assert!(!f
            .scheduler
            .tasks()
            .iter()
            .any(|t| t.kind == TaskKind::Build));
    }

    #[test]
    fn test_task_cap_drops_overflow() {
        let mut f = fixture();
        for i in 0..30 {
            f.scheduler.create_task(HiveTask::new(
                TaskKind::Clean,
                TaskPriority::Low,
                &format!("Clean {}", i),
                5.0,
                0.0,
            ));
        }
        assert_eq!(f.scheduler.total_count(), f.config.max_concurrent_tasks);
    }

    #[test]
    fn test_priority_assignment_order() {
        let mut f = fixture();
        // One idle worker only
        f.population.bees.truncate(1);

        f.scheduler.create_task(HiveTask::new(
            TaskKind::Clean,
            TaskPriority::Low,
            "Clean cells",
            5.0,
            0.0,
        ));
        let critical = f
            .scheduler
            .create_feed_queen_task(BeeId::new(), 0.0)
            .unwrap();

        // Categories refresh on the 1s update boundary, then assignment runs
        let events = run_tick(&mut f, 1.0, 1.0);
        let assigned: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                TaskEvent::Assigned { task, .. } => Some(*task),
                _ => None,
            })
            .collect();
        assert_eq!(assigned, vec![critical]);
    }

    #[test]
    fn test_forage_requires_daylight_and_route() {
        let mut f = fixture();
        f.scheduler.create_task(
            HiveTask::new(TaskKind::Forage, TaskPriority::High, "Collect honey", 5.0, 0.0)
                .with_resource(ResourceKind::Honey, 10.0),
        );

        // No discovered node yet: task stays available
        run_tick(&mut f, 1.0, 1.0);
        assert_eq!(f.foraging.active_forager_count(), 0);

        // Discover a node by hand
        let mut node = ResourceNode::new(ResourceKind::Honey, Vec2::new(10.0, 0.0), 100.0, 1.0, 2.0);
        node.set_path(vec![Vec2::default(), Vec2::new(10.0, 0.0)]);
        let node_id = node.id;
        f.foraging.add_node(node);
        let route = crate::foraging::route::ForagingRoute::new(
            node_id,
            vec![Vec2::default(), Vec2::new(10.0, 0.0)],
        );
        f.foraging.add_route(route);

        run_tick(&mut f, 1.0, 2.0);
        assert_eq!(f.foraging.active_forager_count(), 1);

        // At night the same setup assigns nothing
        let mut night = fixture();
        night.clock.advance(250.0); // past nightfall
        assert!(!night.clock.can_forage());
        night.scheduler.create_task(
            HiveTask::new(TaskKind::Forage, TaskPriority::High, "Collect honey", 5.0, 0.0)
                .with_resource(ResourceKind::Honey, 10.0),
        );
        run_tick(&mut night, 1.0, 1.0);
        assert_eq!(night.foraging.active_forager_count(), 0);
    }

    #[test]
    fn test_progress_completes_on_update_interval() {
        let mut f = fixture();
        let id = f
            .scheduler
            .create_task(HiveTask::new(
                TaskKind::Clean,
                TaskPriority::Low,
                "Clean cells",
                2.0,
                0.0,
            ))
            .unwrap();

        let mut completed = false;
        for i in 1..=10 {
            let events = run_tick(&mut f, 1.0, i as f32);
            if events.contains(&TaskEvent::Completed(id)) {
                completed = true;
                break;
            }
        }
        assert!(completed);
    }

    #[test]
    fn test_bee_death_resets_tasks() {
        let mut f = fixture();
        let id = f
            .scheduler
            .create_task(HiveTask::new(
                TaskKind::Clean,
                TaskPriority::Low,
                "Clean cells",
                50.0,
                0.0,
            ))
            .unwrap();

        run_tick(&mut f, 1.0, 1.0);
        let task = f.scheduler.get_task(id).unwrap();
        assert!(task.is_active());
        let bee = task.assigned_bee.unwrap();

        f.scheduler.handle_bee_death(bee);
        assert!(f.scheduler.get_task(id).unwrap().is_available());
    }

    #[test]
    fn test_cleanup_purges_old_completed() {
        let mut f = fixture();
        let id = f
            .scheduler
            .create_task(HiveTask::new(
                TaskKind::Clean,
                TaskPriority::Low,
                "Clean cells",
                1.0,
                0.0,
            ))
            .unwrap();
        run_tick(&mut f, 1.0, 1.0);
        run_tick(&mut f, 1.0, 2.0);
        assert!(f.scheduler.get_task(id).unwrap().is_completed());

        // Young completed tasks survive cleanup
        f.scheduler.cleanup(10.0);
        assert!(f.scheduler.get_task(id).is_some());

        // Past the retention window they are purged
        f.scheduler.cleanup(2000.0);
        assert!(f.scheduler.get_task(id).is_none());
    }
}
