//! Reusable foraging routes discovered by pioneers
//!
//! A route caches the path from hive to one resource node together with
//! usage statistics. Routes reference their node by id; node lifetime is
//! owned by the map.

use crate::core::types::{NodeId, RouteId, Vec2};
use serde::{Deserialize, Serialize};

/// Reference speed for traversal-time estimates
///
/// Deliberately fixed rather than the assigned bee's own speed, so the
/// estimate is a property of the route alone.
const REFERENCE_SPEED: f32 = 5.0;

/// Smoothing weight for the success rate
const SUCCESS_WEIGHT: f32 = 0.1;

/// A cached path from the hive to a resource node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForagingRoute {
    pub id: RouteId,
    pub target_node: NodeId,
    pub path: Vec<Vec2>,
    pub total_distance: f32,
    pub estimated_time: f32,
    pub use_count: u32,
    /// Exponentially smoothed success rate in [0, 1]
    pub success_rate: f32,
    pub last_used: f32,
}

impl ForagingRoute {
    pub fn new(target_node: NodeId, path: Vec<Vec2>) -> Self {
        let total_distance = path_distance(&path);
        Self {
            id: RouteId::new(),
            target_node,
            path,
            total_distance,
            estimated_time: total_distance / REFERENCE_SPEED,
            use_count: 0,
            success_rate: 1.0,
            last_used: 0.0,
        }
    }

    /// Record an assignment of this route
    pub fn record_use(&mut self, now: f32) {
        self.use_count += 1;
        self.last_used = now;
    }

    /// Fold one trip outcome into the smoothed success rate
    pub fn report_outcome(&mut self, success: bool) {
        let sample = if success { 1.0 } else { 0.0 };
        self.success_rate = self.success_rate * (1.0 - SUCCESS_WEIGHT) + sample * SUCCESS_WEIGHT;
    }

    pub fn is_recently_used(&self, now: f32, threshold: f32) -> bool {
        now - self.last_used < threshold
    }
}

/// Sum of consecutive segment lengths; a single point has distance zero
pub fn path_distance(path: &[Vec2]) -> f32 {
    path.windows(2).map(|pair| pair[0].distance(&pair[1])).sum()
}
