use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{OddsError, Result};

pub const MAX_HEALTH: i32 = 100;

/// Index of a unit type inside its attribute provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitType(pub usize);

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub move_type: String,
    pub move_range: u32,
}

/// Read-only stat lookups the resolvers need about unit types.
pub trait UnitAttributes {
    /// `None` when the attacker has no valid attack against the defender.
    fn base_damage(&self, attacker: UnitType, defender: UnitType) -> Option<i32>;

    fn crit_multiplier(&self, unit: UnitType) -> f64;

    fn can_counter(&self, unit: UnitType) -> bool;

    fn movement(&self, _unit: UnitType) -> Option<Movement> {
        None
    }
}

/// A unit on the board: its type plus current health (0..=100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub unit_type: UnitType,
    pub health: i32,
}

impl Unit {
    pub fn new(unit_type: UnitType, health: i32) -> Self {
        Self { unit_type, health }
    }

    pub fn with_health(self, health: i32) -> Self {
        Self { health, ..self }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

pub(crate) fn check_health(health: i32) -> Result<()> {
    if (0..=MAX_HEALTH).contains(&health) {
        Ok(())
    } else {
        Err(OddsError::HealthOutOfRange(health))
    }
}

fn default_crit() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStats {
    /// Base damage against each defender name. `None` or negative = cannot target.
    #[serde(default)]
    pub damage: IndexMap<String, Option<i32>>,
    #[serde(default = "default_crit")]
    pub crit: f64,
    #[serde(default)]
    pub can_counter: bool,
    /// Read from flat `moveType` / `moveRange` fields; absent when either is missing.
    #[serde(flatten)]
    pub movement: Option<Movement>,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            damage: IndexMap::new(),
            crit: default_crit(),
            can_counter: false,
            movement: None,
        }
    }
}

impl UnitStats {
    pub fn new(crit: f64, can_counter: bool) -> Self {
        Self {
            crit,
            can_counter,
            ..Self::default()
        }
    }

    pub fn with_damage(mut self, defender: impl Into<String>, base_damage: i32) -> Self {
        self.damage.insert(defender.into(), Some(base_damage));
        self
    }

    pub fn with_no_target(mut self, defender: impl Into<String>) -> Self {
        self.damage.insert(defender.into(), None);
        self
    }

    pub fn with_movement(mut self, move_type: impl Into<String>, move_range: u32) -> Self {
        self.movement = Some(Movement {
            move_type: move_type.into(),
            move_range,
        });
        self
    }
}

/// In-memory attribute table keyed by unit name. A name's insertion position
/// is its [`UnitType`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitTable {
    units: IndexMap<String, UnitStats>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a unit; replacing keeps the original index.
    pub fn insert(&mut self, name: impl Into<String>, stats: UnitStats) -> UnitType {
        let (index, _) = self.units.insert_full(name.into(), stats);
        UnitType(index)
    }

    pub fn with_unit(mut self, name: impl Into<String>, stats: UnitStats) -> Self {
        self.insert(name, stats);
        self
    }

    pub fn unit_type(&self, name: &str) -> Option<UnitType> {
        self.units.get_index_of(name).map(UnitType)
    }

    pub fn name(&self, unit: UnitType) -> Option<&str> {
        self.units.get_index(unit.0).map(|(name, _)| name.as_str())
    }

    pub fn stats(&self, unit: UnitType) -> Option<&UnitStats> {
        self.units.get_index(unit.0).map(|(_, stats)| stats)
    }

    pub fn spawn(&self, name: &str, health: i32) -> Option<Unit> {
        self.unit_type(name).map(|t| Unit::new(t, health))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl UnitAttributes for UnitTable {
    fn base_damage(&self, attacker: UnitType, defender: UnitType) -> Option<i32> {
        let target = self.name(defender)?;
        self.stats(attacker)?
            .damage
            .get(target)
            .copied()
            .flatten()
            .filter(|dmg| *dmg >= 0)
    }

    fn crit_multiplier(&self, unit: UnitType) -> f64 {
        self.stats(unit).map_or(1.0, |s| s.crit)
    }

    fn can_counter(&self, unit: UnitType) -> bool {
        self.stats(unit).is_some_and(|s| s.can_counter)
    }

    fn movement(&self, unit: UnitType) -> Option<Movement> {
        self.stats(unit).and_then(|s| s.movement.clone())
    }
}
