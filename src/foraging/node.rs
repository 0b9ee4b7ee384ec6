//! Resource nodes on the external map
//!
//! Nodes deplete when harvested and slowly refill over time. A node stays
//! unknown to the colony until a pioneer records a path to it.

use crate::core::types::{NodeId, Vec2};
use crate::hive::ledger::ResourceKind;
use serde::{Deserialize, Serialize};

/// A harvestable source of honey or pollen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: NodeId,
    pub kind: ResourceKind,
    pub position: Vec2,
    pub current: f32,
    pub max: f32,
    /// Refill per second
    pub regen_rate: f32,
    pub harvest_rate: f32,
    pub discovered: bool,
    pub accessible: bool,
    /// Path recorded by the pioneer that found this node
    pub saved_path: Vec<Vec2>,
    pub times_harvested: u32,
}

impl ResourceNode {
    pub fn new(kind: ResourceKind, position: Vec2, max: f32, regen_rate: f32, harvest_rate: f32) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            position,
            current: max,
            max,
            regen_rate,
            harvest_rate,
            discovered: false,
            accessible: true,
            saved_path: Vec::new(),
            times_harvested: 0,
        }
    }

    pub fn can_harvest(&self) -> bool {
        self.current > 0.0 && self.accessible
    }

    pub fn is_exhausted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fill_percentage(&self) -> f32 {
        self.current / self.max
    }

    pub fn has_saved_path(&self) -> bool {
        !self.saved_path.is_empty()
    }

    /// Take up to `amount`, returning what was actually harvested
    pub fn harvest(&mut self, amount: f32) -> f32 {
        let harvested = amount.min(self.current);
        self.current -= harvested;
        self.times_harvested += 1;
        harvested
    }

    /// Refill over time, clamped to capacity
    pub fn regenerate(&mut self, dt: f32) {
        if self.current < self.max {
            self.current = (self.current + self.regen_rate * dt).min(self.max);
        }
    }

    /// Record the discovered path to this node
    pub fn set_path(&mut self, path: Vec<Vec2>) {
        self.saved_path = path;
        self.discovered = true;
    }
}
