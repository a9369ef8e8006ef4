mod exchange;
mod sequence;

use serde::{Deserialize, Serialize};

use crate::units::{Unit, UnitAttributes};

pub use exchange::{simulate_combat, ExchangeDistribution};
pub use sequence::{
    simulate_sequence, Attack, HealthDistribution, HealthState, SequenceHistory,
};

/// One side of an exchange: the unit plus where it stands and whether it crits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub unit: Unit,
    pub terrain_defense: f64,
    pub crit: bool,
}

impl Combatant {
    pub fn new(unit: Unit, terrain_defense: f64) -> Self {
        Self {
            unit,
            terrain_defense,
            crit: false,
        }
    }

    pub fn with_crit(self, crit: bool) -> Self {
        Self { crit, ..self }
    }

    pub fn with_health(self, health: i32) -> Self {
        Self {
            unit: self.unit.with_health(health),
            ..self
        }
    }

    pub fn crit_multiplier<A: UnitAttributes + ?Sized>(&self, attrs: &A) -> f64 {
        if self.crit {
            attrs.crit_multiplier(self.unit.unit_type)
        } else {
            1.0
        }
    }
}
