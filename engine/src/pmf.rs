use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::damage::DamageParams;
use crate::error::Result;
use crate::search::{find_breakpoints, BreakpointMap, SearchConfig};

/// Probability of each whole-number damage outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamagePmf(BTreeMap<i32, f64>);

impl DamagePmf {
    pub fn get(&self, damage: i32) -> f64 {
        self.0.get(&damage).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.0.iter().map(|(&damage, &p)| (damage, p))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn expected_damage(&self) -> f64 {
        self.iter().map(|(damage, p)| f64::from(damage) * p).sum()
    }

    pub fn min_damage(&self) -> Option<i32> {
        self.0.keys().next().copied()
    }

    pub fn max_damage(&self) -> Option<i32> {
        self.0.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Turns breakpoints into probability mass.
///
/// Each damage value owns the luck interval from its breakpoint up to the
/// next recorded breakpoint (or 1.0 for the highest). Values the search
/// never recorded get nothing. Masses are not rounded, so the total is 1
/// up to float error; breakpoint positions carry the search resolution.
pub fn to_pmf(breakpoints: &BreakpointMap) -> DamagePmf {
    let entries: Vec<(i32, f64)> = breakpoints.iter().collect();
    let mut masses = BTreeMap::new();
    for (i, &(damage, luck)) in entries.iter().enumerate() {
        let next = entries.get(i + 1).map_or(1.0, |&(_, next)| next);
        let mass = next - luck;
        if mass > 0.0 {
            masses.insert(damage, mass);
        }
    }
    DamagePmf(masses)
}

pub fn damage_pmf(params: &DamageParams, search: &SearchConfig) -> Result<DamagePmf> {
    Ok(to_pmf(&find_breakpoints(params, search)?))
}
