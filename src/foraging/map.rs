//! External map - node registry, hazards, route discovery and foragers
//!
//! Owns everything outside the hive: resource nodes, hazards, the route
//! registry, the active pioneer session and all autonomous foragers.

use crate::core::config::SimulationConfig;
use crate::core::types::{BeeId, NodeId, RouteId, Vec2};
use crate::entity::bee::{Bee, BeeRole, BeeState};
use crate::entity::population::Population;
use crate::foraging::hazard::{Hazard, HazardKind};
use crate::foraging::node::ResourceNode;
use crate::foraging::pioneer::{PioneerProgress, PioneerSession};
use crate::foraging::route::ForagingRoute;
use crate::hive::ledger::{ResourceKind, ResourceLedger};
use ahash::AHashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Distance below which a forager counts as having reached a waypoint
const WAYPOINT_EPSILON: f32 = 0.5;

/// Foraging occurrences reported to the outside
#[derive(Debug, Clone, PartialEq)]
pub enum ForagingEvent {
    NodeDiscovered(NodeId),
    RouteEstablished(RouteId),
    ResourceCollected {
        bee: BeeId,
        kind: ResourceKind,
        amount: f32,
    },
    HazardEncountered {
        bee: BeeId,
        hazard: crate::core::types::HazardId,
    },
    ForagersRecalled {
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum ForagerLeg {
    Outbound,
    Inbound,
}

/// Per-forager traversal bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActiveForager {
    route: RouteId,
    node: NodeId,
    kind: ResourceKind,
    leg: ForagerLeg,
    waypoint: usize,
    carrying: f32,
}

/// The world outside the hive entrance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForagingMap {
    nodes: Vec<ResourceNode>,
    hazards: Vec<Hazard>,
    routes: Vec<ForagingRoute>,
    active_foragers: AHashMap<BeeId, ActiveForager>,
    pioneer: Option<PioneerSession>,
    hive_entrance: Vec2,
    max_concurrent_foragers: usize,
    foraging_speed: f32,
    sample_interval: f32,
}

impl ForagingMap {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            nodes: Vec::new(),
            hazards: Vec::new(),
            routes: Vec::new(),
            active_foragers: AHashMap::new(),
            pioneer: None,
            hive_entrance: Vec2::default(),
            max_concurrent_foragers: config.max_concurrent_foragers,
            foraging_speed: config.foraging_speed,
            sample_interval: config.path_sample_interval,
        }
    }

    /// Populate nodes and hazards at random map positions
    pub fn generate(config: &SimulationConfig, rng: &mut impl Rng) -> Self {
        let mut map = Self::new(config);

        for _ in 0..config.honey_node_count {
            let position = map.random_position(config, rng);
            map.nodes.push(ResourceNode::new(
                ResourceKind::Honey,
                position,
                config.honey_node_capacity,
                config.node_regen_rate,
                config.node_harvest_rate,
            ));
        }
        for _ in 0..config.pollen_node_count {
            let position = map.random_position(config, rng);
            map.nodes.push(ResourceNode::new(
                ResourceKind::Pollen,
                position,
                config.pollen_node_capacity,
                config.node_regen_rate,
                config.node_harvest_rate,
            ));
        }

        for _ in 0..config.spider_count {
            let position = map.random_position(config, rng);
            map.hazards.push(Hazard::new(
                HazardKind::Spider,
                position,
                config.spider_radius,
                config.spider_damage,
                config.spider_activation_chance,
                config.spider_duration,
            ));
        }
        for _ in 0..config.wind_count {
            let position = map.random_position(config, rng);
            map.hazards.push(Hazard::new(
                HazardKind::Wind,
                position,
                config.wind_radius,
                config.wind_damage,
                config.wind_activation_chance,
                config.wind_duration,
            ));
        }

        map
    }

    fn random_position(&self, config: &SimulationConfig, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.gen_range(-config.map_width / 2.0..config.map_width / 2.0),
            rng.gen_range(-config.map_height / 2.0..config.map_height / 2.0),
        )
    }

    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn routes(&self) -> &[ForagingRoute] {
        &self.routes
    }

    pub fn hive_entrance(&self) -> Vec2 {
        self.hive_entrance
    }

    pub fn set_hive_entrance(&mut self, position: Vec2) {
        self.hive_entrance = position;
    }

    pub fn active_forager_count(&self) -> usize {
        self.active_foragers.len()
    }

    pub fn is_pioneer_active(&self) -> bool {
        self.pioneer.is_some()
    }

    pub fn add_node(&mut self, node: ResourceNode) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    pub fn add_hazard(&mut self, hazard: Hazard) {
        self.hazards.push(hazard);
    }

    /// Register an externally constructed route (e.g. a seeded scenario)
    pub fn add_route(&mut self, route: ForagingRoute) -> RouteId {
        let id = route.id;
        self.routes.push(route);
        id
    }

    pub fn get_node(&self, id: NodeId) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn discovered_nodes(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.discovered).map(|n| n.id).collect()
    }

    pub fn undiscovered_nodes(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| !n.discovered).map(|n| n.id).collect()
    }

    pub fn nodes_by_kind(&self, kind: ResourceKind) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.kind == kind).map(|n| n.id).collect()
    }

    /// Best discovered harvestable node of a kind: largest stock wins,
    /// discovery order breaks ties
    pub fn best_node(&self, kind: ResourceKind) -> Option<NodeId> {
        use ordered_float::OrderedFloat;
        use std::cmp::Reverse;
        self.nodes
            .iter()
            .filter(|n| n.kind == kind && n.discovered && n.can_harvest())
            .min_by_key(|n| Reverse(OrderedFloat(n.current)))
            .map(|n| n.id)
    }

    /// Begin a pioneer flight with the given bee
    ///
    /// The caller is responsible for checking that foraging is currently
    /// permitted by the clock.
    pub fn start_pioneer(&mut self, bee: &mut Bee) -> bool {
        if self.pioneer.is_some() || !bee.is_alive() || self.active_foragers.contains_key(&bee.id) {
            return false;
        }

        self.pioneer = Some(PioneerSession::new(
            bee.id,
            bee.position,
            self.foraging_speed,
            self.sample_interval,
        ));
        bee.state = BeeState::Foraging;
        tracing::debug!(bee = %bee.name, "pioneer flight started");
        true
    }

    /// Resolve a steering click to the nearest node and set it as target
    pub fn set_pioneer_target(&mut self, position: Vec2) -> Option<NodeId> {
        use ordered_float::OrderedFloat;
        let Some(session) = self.pioneer.as_mut() else {
            return None;
        };

        let nearest = self
            .nodes
            .iter()
            .min_by_key(|n| OrderedFloat(n.position.distance(&position)))
            .map(|n| n.id)?;
        session.set_target(nearest);
        Some(nearest)
    }

    /// Cancel the pioneer flight, discarding the recording
    pub fn end_pioneer(&mut self, population: &mut Population) {
        if let Some(session) = self.pioneer.take() {
            if let Some(bee) = population.get_mut(session.bee) {
                bee.position = self.hive_entrance;
                bee.state = BeeState::Idling;
            }
        }
    }

    /// Put a bee onto an established route
    ///
    /// Fails when the concurrency cap is reached, the bee is already
    /// foraging, or the route is unknown. Failure leaves the forager set
    /// untouched.
    pub fn assign_bee_to_route(&mut self, bee: &mut Bee, route_id: RouteId, now: f32) -> bool {
        if self.active_foragers.len() >= self.max_concurrent_foragers {
            return false;
        }
        if self.active_foragers.contains_key(&bee.id) || !bee.is_alive() {
            return false;
        }
        let Some(route) = self.routes.iter_mut().find(|r| r.id == route_id) else {
            return false;
        };
        let node_id = route.target_node;
        let Some(node) = self.nodes.iter().find(|n| n.id == node_id) else {
            return false;
        };

        route.record_use(now);
        self.active_foragers.insert(
            bee.id,
            ActiveForager {
                route: route_id,
                node: node_id,
                kind: node.kind,
                leg: ForagerLeg::Outbound,
                waypoint: 0,
                carrying: 0.0,
            },
        );
        bee.state = BeeState::Foraging;
        true
    }

    /// Assign through the first route that targets the given node
    pub fn assign_bee_to_node(&mut self, bee: &mut Bee, node_id: NodeId, now: f32) -> bool {
        let Some(route_id) = self
            .routes
            .iter()
            .find(|r| r.target_node == node_id)
            .map(|r| r.id)
        else {
            return false;
        };
        self.assign_bee_to_route(bee, route_id, now)
    }

    /// Clear a bee's foraging bookkeeping and snap it back to the entrance
    pub fn return_bee_to_hive(&mut self, id: BeeId, population: &mut Population) {
        self.active_foragers.remove(&id);
        if let Some(bee) = population.get_mut(id) {
            bee.position = self.hive_entrance;
            if bee.state == BeeState::Foraging {
                bee.state = BeeState::Idling;
                bee.role = BeeRole::Idle;
            }
        }
    }

    /// Force every active forager home and cancel any pioneer flight
    ///
    /// Triggered by nightfall and by the onset of winter.
    pub fn recall_all(&mut self, population: &mut Population) -> usize {
        let ids: Vec<BeeId> = self.active_foragers.keys().copied().collect();
        let count = ids.len();
        for id in ids {
            self.return_bee_to_hive(id, population);
        }
        self.end_pioneer(population);
        count
    }

    /// Handle a bee death observed by the population sweep
    ///
    /// A death mid-route counts against the route's success rate.
    pub fn handle_bee_death(&mut self, id: BeeId) {
        if let Some(state) = self.active_foragers.remove(&id) {
            if let Some(route) = self.routes.iter_mut().find(|r| r.id == state.route) {
                route.report_outcome(false);
            }
        }
        if self.pioneer.as_ref().map(|p| p.bee) == Some(id) {
            self.pioneer = None;
        }
    }

    /// Advance the whole map by one tick
    pub fn tick(
        &mut self,
        dt: f32,
        population: &mut Population,
        ledger: &mut ResourceLedger,
        rng: &mut impl Rng,
    ) -> Vec<ForagingEvent> {
        let mut events = Vec::new();

        for node in &mut self.nodes {
            node.regenerate(dt);
        }
        for hazard in &mut self.hazards {
            hazard.update(dt, rng);
        }

        self.tick_pioneer(dt, population, ledger, &mut events);
        self.tick_foragers(dt, population, ledger, &mut events);
        self.apply_hazards(population, &mut events);

        events
    }

    fn tick_pioneer(
        &mut self,
        dt: f32,
        population: &mut Population,
        ledger: &mut ResourceLedger,
        events: &mut Vec<ForagingEvent>,
    ) {
        let Some(mut session) = self.pioneer.take() else {
            return;
        };

        let Some(target) = session.target else {
            self.pioneer = Some(session);
            return;
        };
        let Some(node_position) = self.nodes.iter().find(|n| n.id == target).map(|n| n.position)
        else {
            // Target node vanished; drop the flight
            self.end_pioneer_session(session, population);
            return;
        };
        let Some(bee) = population.get_mut(session.bee) else {
            return;
        };
        if !bee.is_alive() {
            return;
        }

        match session.advance(dt, &mut bee.position, node_position) {
            PioneerProgress::Arrived => {
                let bee_id = bee.id;
                let carry = bee.stats.carry_capacity;
                let path = session.into_path(node_position);

                let route = ForagingRoute::new(target, path.clone());
                let route_id = route.id;
                self.routes.push(route);

                let node = self
                    .nodes
                    .iter_mut()
                    .find(|n| n.id == target)
                    .expect("node existence checked above");
                node.set_path(path);
                let collected = node.harvest(carry);
                let kind = node.kind;

                if collected > 0.0 {
                    ledger.add(kind, collected);
                    events.push(ForagingEvent::ResourceCollected {
                        bee: bee_id,
                        kind,
                        amount: collected,
                    });
                }

                events.push(ForagingEvent::NodeDiscovered(target));
                events.push(ForagingEvent::RouteEstablished(route_id));
                tracing::info!(?target, "pioneer route established");

                // Flight over; the pioneer walks home for free
                if let Some(bee) = population.get_mut(bee_id) {
                    bee.position = self.hive_entrance;
                    bee.state = BeeState::Idling;
                    bee.role = BeeRole::Idle;
                }
            }
            PioneerProgress::Flying | PioneerProgress::AwaitingTarget => {
                self.pioneer = Some(session);
            }
        }
    }

    fn end_pioneer_session(&mut self, session: PioneerSession, population: &mut Population) {
        if let Some(bee) = population.get_mut(session.bee) {
            bee.position = self.hive_entrance;
            bee.state = BeeState::Idling;
        }
    }

    fn tick_foragers(
        &mut self,
        dt: f32,
        population: &mut Population,
        ledger: &mut ResourceLedger,
        events: &mut Vec<ForagingEvent>,
    ) {
        let ids: Vec<BeeId> = self.active_foragers.keys().copied().collect();

        for id in ids {
            // A forager whose route record went missing is simply dropped
            let route_ok = match self.active_foragers.get(&id) {
                Some(state) => self
                    .routes
                    .iter()
                    .any(|r| r.id == state.route && !r.path.is_empty()),
                None => continue,
            };
            if !route_ok {
                self.active_foragers.remove(&id);
                continue;
            }

            let Some(bee) = population.get_mut(id) else {
                self.active_foragers.remove(&id);
                continue;
            };
            if !bee.is_alive() {
                continue;
            }

            // (route id, kind, amount) for a completed delivery
            let mut delivered: Option<(RouteId, ResourceKind, f32)> = None;

            {
                let state = self
                    .active_foragers
                    .get_mut(&id)
                    .expect("forager checked above");
                let route = self
                    .routes
                    .iter()
                    .find(|r| r.id == state.route)
                    .expect("route checked above");

                let target = route.path[state.waypoint.min(route.path.len() - 1)];
                let distance = bee.position.distance(&target);
                let step = self.foraging_speed * dt;
                if step >= distance {
                    // Clamp to the waypoint so a large step cannot overshoot
                    bee.position = target;
                } else {
                    let direction = (target - bee.position).normalize();
                    bee.position = bee.position + direction * step;
                }

                if bee.position.distance(&target) < WAYPOINT_EPSILON {
                    match state.leg {
                        ForagerLeg::Outbound => {
                            if state.waypoint + 1 < route.path.len() {
                                state.waypoint += 1;
                            } else {
                                // At the node: load up and turn around
                                let carry = bee.stats.carry_capacity;
                                let node_id = state.node;
                                if let Some(node) =
                                    self.nodes.iter_mut().find(|n| n.id == node_id)
                                {
                                    state.carrying = node.harvest(carry);
                                }
                                state.leg = ForagerLeg::Inbound;
                                state.waypoint = route.path.len().saturating_sub(2);
                            }
                        }
                        ForagerLeg::Inbound => {
                            if state.waypoint > 0 {
                                state.waypoint -= 1;
                            } else {
                                delivered = Some((state.route, state.kind, state.carrying));
                            }
                        }
                    }
                }
            }

            if let Some((route_id, kind, amount)) = delivered {
                if amount > 0.0 {
                    ledger.add(kind, amount);
                    events.push(ForagingEvent::ResourceCollected { bee: id, kind, amount });
                }
                if let Some(route) = self.routes.iter_mut().find(|r| r.id == route_id) {
                    route.report_outcome(true);
                }
                self.return_bee_to_hive(id, population);
            }
        }
    }

    /// Active hazards damage every bee inside their radius, every tick
    fn apply_hazards(&mut self, population: &mut Population, events: &mut Vec<ForagingEvent>) {
        let mut killed = Vec::new();

        for bee in population.bees.iter_mut() {
            if bee.state != BeeState::Foraging || !bee.is_alive() {
                continue;
            }
            for hazard in &self.hazards {
                if hazard.active && hazard.in_range(bee.position) {
                    events.push(ForagingEvent::HazardEncountered {
                        bee: bee.id,
                        hazard: hazard.id,
                    });
                    if bee.take_damage(hazard.damage) {
                        killed.push(bee.id);
                        break;
                    }
                }
            }
        }

        for id in killed {
            self.handle_bee_death(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn safe_config() -> SimulationConfig {
        // No hazards so flights are deterministic
        SimulationConfig {
            spider_count: 0,
            wind_count: 0,
            ..SimulationConfig::default()
        }
    }

    fn setup() -> (ForagingMap, Population, ResourceLedger, SimulationConfig, ChaCha8Rng) {
        let config = safe_config();
        let map = ForagingMap::new(&config);
        let mut population = Population::new(&config);
        for i in 0..3 {
            population.spawn_worker(format!("Worker {}", i), Vec2::default(), &config);
        }
        let ledger = ResourceLedger::new(0.0, 0.0, 0.0, 0.0, 2.0, 5.0);
        let rng = ChaCha8Rng::seed_from_u64(42);
        (map, population, ledger, config, rng)
    }

    fn honey_node(position: Vec2) -> ResourceNode {
        ResourceNode::new(ResourceKind::Honey, position, 100.0, 0.0, 2.0)
    }

    /// Run the pioneer flow to completion, returning the discovered node id
    fn discover_node(
        map: &mut ForagingMap,
        population: &mut Population,
        ledger: &mut ResourceLedger,
        rng: &mut ChaCha8Rng,
    ) -> NodeId {
        let node_id = map.add_node(honey_node(Vec2::new(10.0, 0.0)));
        let pioneer = population.bees[0].id;

        assert!(map.start_pioneer(population.get_mut(pioneer).unwrap()));
        assert_eq!(map.set_pioneer_target(Vec2::new(10.0, 0.0)), Some(node_id));

        for _ in 0..200 {
            let events = map.tick(0.1, population, ledger, rng);
            if events
                .iter()
                .any(|e| matches!(e, ForagingEvent::RouteEstablished(_)))
            {
                return node_id;
            }
        }
        panic!("pioneer never completed its route");
    }

    #[test]
    fn test_generate_counts() {
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let map = ForagingMap::generate(&config, &mut rng);

        assert_eq!(map.nodes().len(), 6);
        assert_eq!(map.hazards().len(), 3);
        assert!(map.routes().is_empty());
        assert!(map.discovered_nodes().is_empty());
    }

    #[test]
    fn test_pioneer_discovery() {
        let (mut map, mut population, mut ledger, _config, mut rng) = setup();
        let node_id = discover_node(&mut map, &mut population, &mut ledger, &mut rng);

        let node = map.get_node(node_id).unwrap();
        assert!(node.discovered);
        assert!(node.has_saved_path());
        // Pioneer harvested its carry capacity on arrival
        assert!((ledger.get(ResourceKind::Honey) - 2.0).abs() < 0.001);
        assert!((node.current - 98.0).abs() < 0.001);

        // Pioneer is home and idle again
        let bee = &population.bees[0];
        assert_eq!(bee.state, BeeState::Idling);
        assert!(bee.position.distance(&map.hive_entrance()) < 0.001);
        assert!(!map.is_pioneer_active());
    }

    #[test]
    fn test_pioneer_cancel_discards_recording() {
        let (mut map, mut population, mut ledger, _config, mut rng) = setup();
        map.add_node(honey_node(Vec2::new(50.0, 0.0)));
        let pioneer = population.bees[0].id;

        map.start_pioneer(population.get_mut(pioneer).unwrap());
        map.set_pioneer_target(Vec2::new(50.0, 0.0));
        map.tick(0.5, &mut population, &mut ledger, &mut rng);

        map.end_pioneer(&mut population);
        assert!(!map.is_pioneer_active());
        assert!(map.routes().is_empty());
        assert_eq!(population.bees[0].state, BeeState::Idling);
    }

    #[test]
    fn test_only_one_pioneer_at_a_time() {
        let (mut map, mut population, _ledger, _config, _rng) = setup();
        let a = population.bees[0].id;
        let b = population.bees[1].id;

        assert!(map.start_pioneer(population.get_mut(a).unwrap()));
        assert!(!map.start_pioneer(population.get_mut(b).unwrap()));
    }

    #[test]
    fn test_forager_round_trip() {
        let (mut map, mut population, mut ledger, _config, mut rng) = setup();
        let node_id = discover_node(&mut map, &mut population, &mut ledger, &mut rng);
        let after_discovery = ledger.get(ResourceKind::Honey);

        let forager = population.bees[1].id;
        assert!(map.assign_bee_to_node(population.get_mut(forager).unwrap(), node_id, 0.0));
        assert_eq!(map.active_forager_count(), 1);
        assert_eq!(population.get(forager).unwrap().state, BeeState::Foraging);

        let mut collected = false;
        for _ in 0..400 {
            let events = map.tick(0.1, &mut population, &mut ledger, &mut rng);
            if events.iter().any(|e| {
                matches!(e, ForagingEvent::ResourceCollected { bee, .. } if *bee == forager)
            }) {
                collected = true;
                break;
            }
        }

        assert!(collected, "forager should complete a round trip");
        assert!(ledger.get(ResourceKind::Honey) > after_discovery);
        assert_eq!(map.active_forager_count(), 0);
        assert_eq!(population.get(forager).unwrap().state, BeeState::Idling);

        let route = &map.routes()[0];
        assert_eq!(route.use_count, 1);
    }

    #[test]
    fn test_forager_cap_rejection_leaves_set_unchanged() {
        let (mut map, mut population, mut ledger, _config, mut rng) = setup();
        let node_id = discover_node(&mut map, &mut population, &mut ledger, &mut rng);
        let route_id = map.routes()[0].id;

        // Shrink the cap to the current active count
        map.max_concurrent_foragers = 1;

        let first = population.bees[1].id;
        let second = population.bees[2].id;
        assert!(map.assign_bee_to_route(population.get_mut(first).unwrap(), route_id, 0.0));

        assert!(!map.assign_bee_to_route(population.get_mut(second).unwrap(), route_id, 0.0));
        assert_eq!(map.active_forager_count(), 1);
        assert_eq!(population.get(second).unwrap().state, BeeState::Idling);

        // Same bee cannot be assigned twice either
        assert!(!map.assign_bee_to_node(population.get_mut(first).unwrap(), node_id, 0.0));
    }

    #[test]
    fn test_recall_all() {
        let (mut map, mut population, mut ledger, _config, mut rng) = setup();
        let node_id = discover_node(&mut map, &mut population, &mut ledger, &mut rng);

        let forager = population.bees[1].id;
        map.assign_bee_to_node(population.get_mut(forager).unwrap(), node_id, 0.0);
        map.tick(0.1, &mut population, &mut ledger, &mut rng);

        let recalled = map.recall_all(&mut population);
        assert_eq!(recalled, 1);
        assert_eq!(map.active_forager_count(), 0);

        let bee = population.get(forager).unwrap();
        assert_eq!(bee.state, BeeState::Idling);
        assert!(bee.position.distance(&map.hive_entrance()) < 0.001);
    }

    #[test]
    fn test_best_node_selection() {
        let (mut map, ..) = setup();
        let a = map.add_node(honey_node(Vec2::new(5.0, 0.0)));
        let b = map.add_node(honey_node(Vec2::new(9.0, 0.0)));

        // Undiscovered nodes are never candidates
        assert_eq!(map.best_node(ResourceKind::Honey), None);

        for id in [a, b] {
            let node = map.nodes.iter_mut().find(|n| n.id == id).unwrap();
            node.discovered = true;
        }
        map.nodes.iter_mut().find(|n| n.id == b).unwrap().current = 30.0;
        assert_eq!(map.best_node(ResourceKind::Honey), Some(a));

        // Exhausted nodes drop out
        map.nodes.iter_mut().find(|n| n.id == a).unwrap().current = 0.0;
        assert_eq!(map.best_node(ResourceKind::Honey), Some(b));

        assert_eq!(map.best_node(ResourceKind::Pollen), None);
    }

    #[test]
    fn test_death_mid_route_reports_failure() {
        let (mut map, mut population, mut ledger, _config, mut rng) = setup();
        let node_id = discover_node(&mut map, &mut population, &mut ledger, &mut rng);

        let forager = population.bees[1].id;
        map.assign_bee_to_node(population.get_mut(forager).unwrap(), node_id, 0.0);
        let before = map.routes()[0].success_rate;

        population.get_mut(forager).unwrap().take_damage(1000.0);
        map.handle_bee_death(forager);

        assert_eq!(map.active_forager_count(), 0);
        assert!(map.routes()[0].success_rate < before);
    }
}
