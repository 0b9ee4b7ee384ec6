//! Colony tasks - the units of work the scheduler hands to idle bees

use crate::core::types::{BeeId, BroodId, CellId, TaskId, Vec2};
use crate::entity::bee::BeeRole;
use crate::hive::ledger::ResourceKind;
use serde::{Deserialize, Serialize};

/// What kind of work a task represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Build,
    Supply,
    Clean,
    Forage,
    Thermoregulate,
    ProduceRoyalJelly,
    ProduceBeeswax,
}

impl TaskKind {
    /// Role a bee takes on when it accepts this task
    pub fn role(&self, resource: Option<ResourceKind>) -> BeeRole {
        match self {
            TaskKind::Forage => match resource {
                Some(ResourceKind::Pollen) => BeeRole::ForagePollen,
                _ => BeeRole::ForageHoney,
            },
            TaskKind::Build => BeeRole::BuildCells,
            TaskKind::Supply => BeeRole::NurseLarvae,
            TaskKind::Clean => BeeRole::CleanCells,
            TaskKind::Thermoregulate => BeeRole::Thermoregulate,
            TaskKind::ProduceRoyalJelly => BeeRole::ProduceRoyalJelly,
            TaskKind::ProduceBeeswax => BeeRole::ProduceBeeswax,
        }
    }
}

/// Task priority with explicit ordering values
///
/// Higher numeric value = more urgent. Assignment relies on this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TaskPriority {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

/// Task lifecycle status; transitions are monotonic except `reset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Available,
    Assigned,
    InProgress,
    Completed,
    Failed,
}

/// What a task is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TaskTarget {
    Cell(CellId),
    Brood(BroodId),
    Queen(BeeId),
    Position(Vec2),
}

/// A unit of colony work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiveTask {
    pub id: TaskId,
    pub kind: TaskKind,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub description: String,
    pub target: Option<TaskTarget>,
    pub resource: Option<(ResourceKind, f32)>,
    pub duration: f32,
    pub progress: f32,
    pub assigned_bee: Option<BeeId>,
    /// Timestamps in simulation seconds
    pub created_at: f32,
    pub assigned_at: Option<f32>,
    pub completed_at: Option<f32>,
}

impl HiveTask {
    pub fn new(kind: TaskKind, priority: TaskPriority, description: &str, duration: f32, now: f32) -> Self {
        Self {
            id: TaskId::new(),
            kind,
            priority,
            status: TaskStatus::Available,
            description: description.to_string(),
            target: None,
            resource: None,
            duration,
            progress: 0.0,
            assigned_bee: None,
            created_at: now,
            assigned_at: None,
            completed_at: None,
        }
    }

    pub fn with_target(mut self, target: TaskTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_resource(mut self, kind: ResourceKind, amount: f32) -> Self {
        self.resource = Some((kind, amount));
        self
    }

    pub fn is_available(&self) -> bool {
        self.status == TaskStatus::Available
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, TaskStatus::Assigned | TaskStatus::InProgress)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn progress_percentage(&self) -> f32 {
        if self.duration > 0.0 {
            self.progress / self.duration
        } else {
            0.0
        }
    }

    pub fn assign(&mut self, bee: BeeId, now: f32) {
        self.status = TaskStatus::Assigned;
        self.assigned_bee = Some(bee);
        self.assigned_at = Some(now);
    }

    pub fn start(&mut self) {
        self.status = TaskStatus::InProgress;
    }

    /// Accumulate progress; returns true when the task just finished
    pub fn update_progress(&mut self, dt: f32, now: f32) -> bool {
        if self.status != TaskStatus::InProgress {
            return false;
        }
        self.progress += dt;
        if self.progress >= self.duration {
            self.complete(now);
            return true;
        }
        false
    }

    pub fn complete(&mut self, now: f32) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
    }

    pub fn fail(&mut self) {
        self.status = TaskStatus::Failed;
    }

    /// Return the task to the pool, clearing progress and assignment
    pub fn reset(&mut self) {
        self.status = TaskStatus::Available;
        self.progress = 0.0;
        self.assigned_bee = None;
        self.assigned_at = None;
    }
}
