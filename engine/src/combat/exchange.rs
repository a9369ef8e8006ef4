use std::collections::BTreeMap;

use tracing::debug;

use super::Combatant;
use crate::damage::DamageParams;
use crate::error::{OddsError, Result};
use crate::pmf::damage_pmf;
use crate::search::SearchConfig;
use crate::units::{check_health, UnitAttributes};

/// (final attacker health, final defender health) -> probability.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeDistribution(BTreeMap<(i32, i32), f64>);

impl ExchangeDistribution {
    pub(crate) fn add(&mut self, attacker_health: i32, defender_health: i32, p: f64) {
        *self.0.entry((attacker_health, defender_health)).or_insert(0.0) += p;
    }

    pub fn get(&self, attacker_health: i32, defender_health: i32) -> f64 {
        self.0
            .get(&(attacker_health, defender_health))
            .copied()
            .unwrap_or(0.0)
    }

    /// Outcomes ordered by attacker health, then defender health.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), f64)> + '_ {
        self.0.iter().map(|(&key, &p)| (key, p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn attacker_death_probability(&self) -> f64 {
        self.iter()
            .filter(|((atk, _), _)| *atk == 0)
            .map(|(_, p)| p)
            .sum()
    }

    pub fn defender_death_probability(&self) -> f64 {
        self.iter()
            .filter(|((_, def), _)| *def == 0)
            .map(|(_, p)| p)
            .sum()
    }

    pub fn expected_attacker_health(&self) -> f64 {
        self.iter().map(|((atk, _), p)| f64::from(atk) * p).sum()
    }

    pub fn expected_defender_health(&self) -> f64 {
        self.iter().map(|((_, def), p)| f64::from(def) * p).sum()
    }
}

/// Resolves one attack plus the defender's counter, if it survives and can
/// counter.
///
/// The counter is struck by the defender at its post-hit health against the
/// attacker's terrain. A defender that can counter but has no base damage
/// against the attacker's type does not counter.
pub fn simulate_combat<A: UnitAttributes + ?Sized>(
    attrs: &A,
    attacker: &Combatant,
    defender: &Combatant,
    search: &SearchConfig,
) -> Result<ExchangeDistribution> {
    let atk_unit = attacker.unit;
    let def_unit = defender.unit;
    check_health(atk_unit.health)?;
    check_health(def_unit.health)?;

    let base_damage = attrs
        .base_damage(atk_unit.unit_type, def_unit.unit_type)
        .ok_or(OddsError::NoBaseDamage {
            attacker: atk_unit.unit_type,
            defender: def_unit.unit_type,
        })?;
    let attack = damage_pmf(
        &DamageParams {
            base_damage,
            atk_health: atk_unit.health,
            def_health: def_unit.health,
            terrain_defense: defender.terrain_defense,
            crit_multiplier: attacker.crit_multiplier(attrs),
        },
        search,
    )?;

    let counter_base = if attrs.can_counter(def_unit.unit_type) {
        let base = attrs.base_damage(def_unit.unit_type, atk_unit.unit_type);
        if base.is_none() {
            debug!(
                defender = %def_unit.unit_type,
                attacker = %atk_unit.unit_type,
                "defender cannot target attacker; no counter"
            );
        }
        base
    } else {
        None
    };
    let counter_crit = defender.crit_multiplier(attrs);

    let mut outcomes = ExchangeDistribution::default();
    for (damage, p) in attack.iter() {
        let def_health = (def_unit.health - damage).max(0);
        match counter_base {
            Some(base_damage) if def_health > 0 => {
                let counter = damage_pmf(
                    &DamageParams {
                        base_damage,
                        atk_health: def_health,
                        def_health: atk_unit.health,
                        terrain_defense: attacker.terrain_defense,
                        crit_multiplier: counter_crit,
                    },
                    search,
                )?;
                for (counter_damage, q) in counter.iter() {
                    let atk_health = (atk_unit.health - counter_damage).max(0);
                    outcomes.add(atk_health, def_health, p * q);
                }
            }
            _ => outcomes.add(atk_unit.health, def_health, p),
        }
    }

    debug!(
        attacker = %atk_unit.unit_type,
        defender = %def_unit.unit_type,
        outcomes = outcomes.len(),
        total = outcomes.total(),
        "exchange resolved"
    );
    Ok(outcomes)
}
