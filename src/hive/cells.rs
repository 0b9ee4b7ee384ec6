//! Hive cells - construction, storage, nursery occupancy and heating

use crate::core::config::SimulationConfig;
use crate::core::types::{CellId, Vec2};
use serde::{Deserialize, Serialize};

/// What a cell is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Basic,
    Nursery,
    HoneyStorage,
    PollenStorage,
}

/// Cell changes reported to the outside
#[derive(Debug, Clone, PartialEq)]
pub enum CellEvent {
    /// Construction reached completion
    Built(CellId),
    ResourceStored { cell: CellId, amount: f32 },
    ResourceRemoved { cell: CellId, amount: f32 },
    Heated(CellId),
    EggPlaced(CellId),
}

/// A single cell in the hive comb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiveCell {
    pub id: CellId,
    pub kind: CellKind,
    pub position: Vec2,
    pub capacity: f32,
    pub stored: f32,
    pub temperature: f32,
    pub target_temperature: f32,
    pub occupied: bool,
    pub construction_progress: f32,
}

impl HiveCell {
    pub fn new(kind: CellKind, position: Vec2, config: &SimulationConfig) -> Self {
        let capacity = match kind {
            CellKind::Basic => config.basic_cell_capacity,
            CellKind::Nursery => config.nursery_cell_capacity,
            CellKind::HoneyStorage => config.honey_cell_capacity,
            CellKind::PollenStorage => config.pollen_cell_capacity,
        };
        let target_temperature = match kind {
            CellKind::Nursery => config.nursery_target_temperature,
            _ => 25.0,
        };

        Self {
            id: CellId::new(),
            kind,
            position,
            capacity,
            stored: 0.0,
            temperature: config.ambient_temperature,
            target_temperature,
            occupied: false,
            construction_progress: 0.0,
        }
    }

    pub fn is_constructed(&self) -> bool {
        self.construction_progress >= 1.0
    }

    pub fn is_empty(&self) -> bool {
        self.stored <= 0.0 && !self.occupied
    }

    pub fn is_full(&self) -> bool {
        self.stored >= self.capacity
    }

    pub fn fill_percentage(&self) -> f32 {
        self.stored / self.capacity
    }

    /// Nurseries below target temperature need thermoregulation
    pub fn needs_heating(&self) -> bool {
        self.kind == CellKind::Nursery && self.temperature < self.target_temperature
    }

    pub fn can_store(&self, amount: f32) -> bool {
        self.is_constructed() && self.stored + amount <= self.capacity && !self.occupied
    }
}

/// Registry of every cell in the hive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellRegistry {
    cells: Vec<HiveCell>,
    ambient_temperature: f32,
    temperature_decay_rate: f32,

    #[serde(skip)]
    events: Vec<CellEvent>,
}

impl CellRegistry {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            cells: Vec::new(),
            ambient_temperature: config.ambient_temperature,
            temperature_decay_rate: config.cell_temperature_decay_rate,
            events: Vec::new(),
        }
    }

    pub fn add_cell(&mut self, cell: HiveCell) -> CellId {
        let id = cell.id;
        self.cells.push(cell);
        id
    }

    pub fn get(&self, id: CellId) -> Option<&HiveCell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut HiveCell> {
        self.cells.iter_mut().find(|c| c.id == id)
    }

    pub fn cells(&self) -> &[HiveCell] {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.cells.len()
    }

    /// Nursery temperature decays toward ambient every tick
    pub fn tick(&mut self, dt: f32) {
        for cell in &mut self.cells {
            if cell.kind == CellKind::Nursery && cell.temperature > self.ambient_temperature {
                cell.temperature = (cell.temperature - self.temperature_decay_rate * dt)
                    .max(self.ambient_temperature);
            }
        }
    }

    /// Apply construction work; returns true if the cell just completed
    pub fn build(&mut self, id: CellId, amount: f32) -> bool {
        let Some(cell) = self.cells.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if cell.is_constructed() {
            return false;
        }

        cell.construction_progress = (cell.construction_progress + amount).min(1.0);
        if cell.is_constructed() {
            self.events.push(CellEvent::Built(id));
            return true;
        }
        false
    }

    /// Store into a constructed, unoccupied cell
    pub fn store(&mut self, id: CellId, amount: f32) -> bool {
        let Some(cell) = self.cells.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if !cell.can_store(amount) {
            return false;
        }

        cell.stored += amount;
        self.events.push(CellEvent::ResourceStored { cell: id, amount });
        true
    }

    pub fn remove(&mut self, id: CellId, amount: f32) -> bool {
        let Some(cell) = self.cells.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if cell.stored < amount {
            return false;
        }

        cell.stored -= amount;
        self.events.push(CellEvent::ResourceRemoved { cell: id, amount });
        true
    }

    /// Heat a nursery toward its target temperature
    pub fn heat(&mut self, id: CellId, amount: f32) -> bool {
        let Some(cell) = self.cells.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if cell.kind != CellKind::Nursery {
            return false;
        }

        cell.temperature = (cell.temperature + amount).min(cell.target_temperature);
        self.events.push(CellEvent::Heated(id));
        true
    }

    /// Mark a nursery as holding an egg
    pub fn place_egg(&mut self, id: CellId) -> bool {
        let Some(cell) = self.cells.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if cell.kind != CellKind::Nursery || !cell.is_empty() || !cell.is_constructed() {
            return false;
        }

        cell.occupied = true;
        self.events.push(CellEvent::EggPlaced(id));
        true
    }

    /// Free a nursery after its brood matured or died
    pub fn vacate(&mut self, id: CellId) {
        if let Some(cell) = self.cells.iter_mut().find(|c| c.id == id) {
            cell.occupied = false;
        }
    }

    /// Constructed, empty nursery cells available for egg laying
    pub fn empty_nurseries(&self) -> Vec<CellId> {
        self.cells
            .iter()
            .filter(|c| c.kind == CellKind::Nursery && c.is_constructed() && c.is_empty())
            .map(|c| c.id)
            .collect()
    }

    /// Cells still under construction
    pub fn unconstructed(&self) -> Vec<CellId> {
        self.cells
            .iter()
            .filter(|c| !c.is_constructed())
            .map(|c| c.id)
            .collect()
    }

    /// Nurseries below their target temperature
    pub fn nurseries_below_target(&self) -> Vec<CellId> {
        self.cells
            .iter()
            .filter(|c| c.needs_heating())
            .map(|c| c.id)
            .collect()
    }

    /// Coldest nursery below target, if any
    pub fn coldest_nursery(&self) -> Option<CellId> {
        use ordered_float::OrderedFloat;
        self.cells
            .iter()
            .filter(|c| c.needs_heating())
            .min_by_key(|c| OrderedFloat(c.temperature))
            .map(|c| c.id)
    }

    /// Drain buffered events for this tick
    pub fn drain_events(&mut self) -> Vec<CellEvent> {
        std::mem::take(&mut self.events)
    }
}
