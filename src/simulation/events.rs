//! Aggregated outbound events
//!
//! Every subsystem reports plain event enums; the session wraps them into
//! `SimEvent` and hands the whole batch to the caller once per tick. This
//! replaces per-object signal subscriptions: external layers drain the queue
//! instead of hooking into entities.

use crate::core::clock::ClockEvent;
use crate::foraging::map::ForagingEvent;
use crate::hive::cells::CellEvent;
use crate::hive::ledger::ResourceEvent;
use crate::simulation::lifecycle::LifecycleEvent;
use crate::tasks::scheduler::TaskEvent;

/// One simulation occurrence, in tick order
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Clock(ClockEvent),
    Resource(ResourceEvent),
    Lifecycle(LifecycleEvent),
    Cell(CellEvent),
    Foraging(ForagingEvent),
    Task(TaskEvent),
}

impl From<ClockEvent> for SimEvent {
    fn from(event: ClockEvent) -> Self {
        SimEvent::Clock(event)
    }
}

impl From<ResourceEvent> for SimEvent {
    fn from(event: ResourceEvent) -> Self {
        SimEvent::Resource(event)
    }
}

impl From<LifecycleEvent> for SimEvent {
    fn from(event: LifecycleEvent) -> Self {
        SimEvent::Lifecycle(event)
    }
}

impl From<CellEvent> for SimEvent {
    fn from(event: CellEvent) -> Self {
        SimEvent::Cell(event)
    }
}

impl From<ForagingEvent> for SimEvent {
    fn from(event: ForagingEvent) -> Self {
        SimEvent::Foraging(event)
    }
}

impl From<TaskEvent> for SimEvent {
    fn from(event: TaskEvent) -> Self {
        SimEvent::Task(event)
    }
}
