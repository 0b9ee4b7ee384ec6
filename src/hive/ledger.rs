//! Resource ledger - the authoritative store of colony resources
//!
//! Four fungible quantities with all-or-nothing consumption. Every change
//! is reported through the event buffer so the notification layer can react
//! without subscribing to the ledger directly.

use serde::{Deserialize, Serialize};

/// The four colony resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Honey,
    Pollen,
    Beeswax,
    RoyalJelly,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Honey,
        ResourceKind::Pollen,
        ResourceKind::Beeswax,
        ResourceKind::RoyalJelly,
    ];
}

/// Ledger changes reported to the outside
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    Added { kind: ResourceKind, amount: f32 },
    Consumed { kind: ResourceKind, amount: f32 },
    /// Fired after every add/consume with the new total
    Changed { kind: ResourceKind, amount: f32 },
    /// Stock hit exactly zero
    Depleted(ResourceKind),
}

/// Colony-wide resource store
///
/// Quantities never go negative; consumption fails atomically when stock is
/// insufficient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLedger {
    honey: f32,
    pollen: f32,
    beeswax: f32,
    royal_jelly: f32,

    honey_per_bee_per_cycle: f32,
    royal_jelly_per_queen_per_cycle: f32,

    #[serde(skip)]
    events: Vec<ResourceEvent>,
}

impl ResourceLedger {
    pub fn new(
        honey: f32,
        pollen: f32,
        beeswax: f32,
        royal_jelly: f32,
        honey_per_bee_per_cycle: f32,
        royal_jelly_per_queen_per_cycle: f32,
    ) -> Self {
        Self {
            honey,
            pollen,
            beeswax,
            royal_jelly,
            honey_per_bee_per_cycle,
            royal_jelly_per_queen_per_cycle,
            events: Vec::new(),
        }
    }

    pub fn get(&self, kind: ResourceKind) -> f32 {
        match kind {
            ResourceKind::Honey => self.honey,
            ResourceKind::Pollen => self.pollen,
            ResourceKind::Beeswax => self.beeswax,
            ResourceKind::RoyalJelly => self.royal_jelly,
        }
    }

    fn set(&mut self, kind: ResourceKind, amount: f32) {
        match kind {
            ResourceKind::Honey => self.honey = amount,
            ResourceKind::Pollen => self.pollen = amount,
            ResourceKind::Beeswax => self.beeswax = amount,
            ResourceKind::RoyalJelly => self.royal_jelly = amount,
        }
    }

    pub fn has(&self, kind: ResourceKind, amount: f32) -> bool {
        self.get(kind) >= amount
    }

    /// Add resources; non-positive amounts are a no-op
    pub fn add(&mut self, kind: ResourceKind, amount: f32) {
        if amount <= 0.0 {
            return;
        }

        self.set(kind, self.get(kind) + amount);
        self.events.push(ResourceEvent::Added { kind, amount });
        self.events.push(ResourceEvent::Changed {
            kind,
            amount: self.get(kind),
        });
    }

    /// Consume resources atomically; returns false (no change) on shortfall
    ///
    /// Non-positive amounts succeed trivially with no effect.
    pub fn try_consume(&mut self, kind: ResourceKind, amount: f32) -> bool {
        if amount <= 0.0 {
            return true;
        }

        let current = self.get(kind);
        if current < amount {
            return false;
        }

        self.set(kind, current - amount);
        self.events.push(ResourceEvent::Consumed { kind, amount });
        self.events.push(ResourceEvent::Changed {
            kind,
            amount: self.get(kind),
        });

        if self.get(kind) <= 0.0 {
            self.events.push(ResourceEvent::Depleted(kind));
        }

        true
    }

    /// Convert two input resources into an output resource
    ///
    /// Both inputs are checked up front and consumed before the output is
    /// produced. If the second consumption fails after the check (impossible
    /// under single-threaded access), the first is rolled back so no partial
    /// effect remains.
    pub fn convert(
        &mut self,
        input1: ResourceKind,
        amount1: f32,
        input2: ResourceKind,
        amount2: f32,
        output: ResourceKind,
        output_amount: f32,
    ) -> bool {
        if !self.has(input1, amount1) || !self.has(input2, amount2) {
            return false;
        }

        if !self.try_consume(input1, amount1) {
            return false;
        }
        if !self.try_consume(input2, amount2) {
            self.add(input1, amount1);
            return false;
        }

        self.add(output, output_amount);
        true
    }

    /// Cycle-end upkeep: honey per worker, royal jelly per queen
    ///
    /// Shortfalls are tolerated silently; starvation is surfaced by the
    /// lifecycle components observing the resulting stock, not here.
    pub fn consume_cyclic(&mut self, worker_count: usize, queen_count: usize, honey_multiplier: f32) {
        let honey = worker_count as f32 * self.honey_per_bee_per_cycle * honey_multiplier;
        let royal_jelly = queen_count as f32 * self.royal_jelly_per_queen_per_cycle;

        if !self.try_consume(ResourceKind::Honey, honey) {
            tracing::debug!(needed = honey, stock = self.honey, "cyclic honey shortfall");
        }
        if !self.try_consume(ResourceKind::RoyalJelly, royal_jelly) {
            tracing::debug!(
                needed = royal_jelly,
                stock = self.royal_jelly,
                "cyclic royal jelly shortfall"
            );
        }
    }

    /// Drain buffered events for this tick
    pub fn drain_events(&mut self) -> Vec<ResourceEvent> {
        std::mem::take(&mut self.events)
    }
}
