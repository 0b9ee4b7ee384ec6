//! Map hazards that damage bees passing through them

use crate::core::types::{HazardId, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    Spider,
    Wind,
    Rain,
    Predator,
}

/// A hazard zone that toggles between dormant and active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: HazardId,
    pub kind: HazardKind,
    pub position: Vec2,
    pub radius: f32,
    /// Damage dealt per tick to every bee in range while active
    pub damage: f32,
    /// Activation probability per second while dormant
    pub activation_chance: f32,
    pub active: bool,
    pub duration: f32,
    timer: f32,
}

impl Hazard {
    pub fn new(
        kind: HazardKind,
        position: Vec2,
        radius: f32,
        damage: f32,
        activation_chance: f32,
        duration: f32,
    ) -> Self {
        Self {
            id: HazardId::new(),
            kind,
            position,
            radius,
            damage,
            activation_chance,
            active: false,
            duration,
            timer: 0.0,
        }
    }

    pub fn in_range(&self, position: Vec2) -> bool {
        self.position.distance(&position) <= self.radius
    }

    /// Dormant hazards roll for activation; active ones expire on a timer
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.active {
            self.timer += dt;
            if self.timer >= self.duration {
                self.active = false;
                self.timer = 0.0;
            }
        } else if rng.gen::<f32>() < self.activation_chance * dt {
            self.active = true;
            self.timer = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn hazard(chance: f32) -> Hazard {
        Hazard::new(HazardKind::Spider, Vec2::new(5.0, 5.0), 3.0, 20.0, chance, 5.0)
    }

    #[test]
    fn test_in_range() {
        let h = hazard(0.1);
        assert!(h.in_range(Vec2::new(5.0, 5.0)));
        assert!(h.in_range(Vec2::new(8.0, 5.0))); // boundary inclusive
        assert!(!h.in_range(Vec2::new(9.0, 5.0)));
    }

    #[test]
    fn test_certain_activation() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut h = hazard(1.0);
        h.update(1.0, &mut rng);
        assert!(h.active);
    }

    #[test]
    fn test_zero_chance_never_activates() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut h = hazard(0.0);
        for _ in 0..1000 {
            h.update(1.0, &mut rng);
        }
        assert!(!h.active);
    }

    #[test]
    fn test_deactivates_after_duration() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut h = hazard(1.0);
        h.update(1.0, &mut rng); // activates
        assert!(h.active);

        h.update(4.9, &mut rng);
        assert!(h.active);
        h.update(0.1, &mut rng);
        assert!(!h.active);
    }
}
