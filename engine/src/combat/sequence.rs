use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{simulate_combat, Combatant};
use crate::error::Result;
use crate::search::SearchConfig;
use crate::units::{check_health, UnitAttributes};

/// Where a defender can be between attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum HealthState {
    Dead,
    Alive(i32),
    /// Attack `n` (0-based) required a kill and did not get one.
    LethalFailure(usize),
}

impl HealthState {
    pub fn from_health(health: i32) -> Self {
        if health <= 0 {
            Self::Dead
        } else {
            Self::Alive(health)
        }
    }

    /// Dead and failure states absorb: later attacks never leave them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Alive(_))
    }

    pub fn health(&self) -> Option<i32> {
        match self {
            Self::Dead => Some(0),
            Self::Alive(health) => Some(*health),
            Self::LethalFailure(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthDistribution(BTreeMap<HealthState, f64>);

impl HealthDistribution {
    pub fn certain(state: HealthState) -> Self {
        Self(BTreeMap::from([(state, 1.0)]))
    }

    fn add(&mut self, state: HealthState, p: f64) {
        *self.0.entry(state).or_insert(0.0) += p;
    }

    pub fn get(&self, state: HealthState) -> f64 {
        self.0.get(&state).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (HealthState, f64)> + '_ {
        self.0.iter().map(|(&state, &p)| (state, p))
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

    pub fn lethal_probability(&self) -> f64 {
        self.get(HealthState::Dead)
    }

    pub fn survival_probability(&self) -> f64 {
        self.iter()
            .filter(|(state, _)| matches!(state, HealthState::Alive(_)))
            .map(|(_, p)| p)
            .sum()
    }

    pub fn failure_probability(&self) -> f64 {
        self.iter()
            .filter(|(state, _)| matches!(state, HealthState::LethalFailure(_)))
            .map(|(_, p)| p)
            .sum()
    }

    pub fn failure_probability_at(&self, attack_index: usize) -> f64 {
        self.get(HealthState::LethalFailure(attack_index))
    }

    /// Mean defender health over the dead and alive states only.
    /// `None` when all mass sits in failure states.
    pub fn expected_health(&self) -> Option<f64> {
        let (mass, weighted) = self
            .iter()
            .filter_map(|(state, p)| state.health().map(|h| (p, f64::from(h) * p)))
            .fold((0.0, 0.0), |(m, w), (p, hp)| (m + p, w + hp));
        (mass > 0.0).then(|| weighted / mass)
    }
}

/// One entry of an attack sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub attacker: Combatant,
    /// Suicide-attack semantics: the exchange only counts if the attacker
    /// ends it dead. Otherwise the chain lands in `LethalFailure`.
    pub requires_lethal: bool,
}

impl Attack {
    pub fn new(attacker: Combatant) -> Self {
        Self {
            attacker,
            requires_lethal: false,
        }
    }

    pub fn requiring_lethal(self) -> Self {
        Self {
            requires_lethal: true,
            ..self
        }
    }
}

/// Defender health distribution before the first attack and after each one.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceHistory(Vec<HealthDistribution>);

impl SequenceHistory {
    pub fn steps(&self) -> &[HealthDistribution] {
        &self.0
    }

    pub fn get(&self, step: usize) -> Option<&HealthDistribution> {
        self.0.get(step)
    }

    pub fn initial(&self) -> &HealthDistribution {
        &self.0[0]
    }

    pub fn last(&self) -> &HealthDistribution {
        &self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HealthDistribution> + '_ {
        self.0.iter()
    }
}

/// Runs `attacks` in order against one defender, tracking the distribution of
/// its health as a Markov chain.
///
/// Each alive state is resolved with the defender's health set to that state,
/// on a copy of the defender. Step `i + 1` of the result is the distribution
/// after `attacks[i]`.
pub fn simulate_sequence<A: UnitAttributes + ?Sized>(
    attrs: &A,
    defender: &Combatant,
    attacks: &[Attack],
    search: &SearchConfig,
) -> Result<SequenceHistory> {
    check_health(defender.unit.health)?;

    let mut current = HealthDistribution::certain(HealthState::from_health(defender.unit.health));
    let mut history = Vec::with_capacity(attacks.len() + 1);
    history.push(current.clone());

    for (index, attack) in attacks.iter().enumerate() {
        let mut next = HealthDistribution::default();
        for (state, p) in current.iter() {
            let HealthState::Alive(health) = state else {
                next.add(state, p);
                continue;
            };

            let target = defender.with_health(health);
            let exchange = simulate_combat(attrs, &attack.attacker, &target, search)?;
            for ((atk_health, def_health), q) in exchange.iter() {
                let landed = if attack.requires_lethal && atk_health > 0 {
                    HealthState::LethalFailure(index)
                } else {
                    HealthState::from_health(def_health)
                };
                next.add(landed, p * q);
            }
        }

        debug!(
            step = index + 1,
            states = next.len(),
            lethal = next.lethal_probability(),
            failed = next.failure_probability(),
            "sequence step resolved"
        );
        history.push(next.clone());
        current = next;
    }

    Ok(SequenceHistory(history))
}
