//! Pioneer session - a steered scouting flight that records a new route
//!
//! An explicit state machine advanced once per simulation tick. The session
//! holds the recorded path until the target is reached or the flight is
//! cancelled.

use crate::core::types::{BeeId, NodeId, Vec2};
use serde::{Deserialize, Serialize};

/// Distance below which the pioneer counts as arrived
const ARRIVAL_EPSILON: f32 = 0.5;

/// What a pioneer advance produced this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PioneerProgress {
    /// No target chosen yet; the bee waits at its current position
    AwaitingTarget,
    Flying,
    Arrived,
}

/// In-flight state of a pioneer recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PioneerSession {
    pub bee: BeeId,
    pub target: Option<NodeId>,
    pub path: Vec<Vec2>,
    sample_timer: f32,
    sample_interval: f32,
    speed: f32,
}

impl PioneerSession {
    pub fn new(bee: BeeId, start: Vec2, speed: f32, sample_interval: f32) -> Self {
        Self {
            bee,
            target: None,
            path: vec![start],
            sample_timer: 0.0,
            sample_interval,
            speed,
        }
    }

    pub fn set_target(&mut self, node: NodeId) {
        self.target = Some(node);
    }

    /// Move the pioneer toward the target and record path samples
    ///
    /// The caller owns the bee position and the node lookup; this advances
    /// one tick of the flight.
    pub fn advance(&mut self, dt: f32, bee_position: &mut Vec2, node_position: Vec2) -> PioneerProgress {
        if self.target.is_none() {
            return PioneerProgress::AwaitingTarget;
        }

        let distance = bee_position.distance(&node_position);
        let step = self.speed * dt;
        if step >= distance {
            // Clamp to the node so a large step cannot overshoot
            *bee_position = node_position;
        } else {
            let direction = (node_position - *bee_position).normalize();
            *bee_position = *bee_position + direction * step;
        }

        self.sample_timer += dt;
        if self.sample_timer >= self.sample_interval {
            self.sample_timer -= self.sample_interval;
            self.path.push(*bee_position);
        }

        if bee_position.distance(&node_position) < ARRIVAL_EPSILON {
            return PioneerProgress::Arrived;
        }

        PioneerProgress::Flying
    }

    /// Finalize the recording by appending the node position itself
    pub fn into_path(mut self, node_position: Vec2) -> Vec<Vec2> {
        self.path.push(node_position);
        self.path
    }
}
