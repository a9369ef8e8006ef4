use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::damage::DamageParams;
use crate::error::{OddsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Recursion levels below the root interval.
    pub depth: u32,
    /// Sub-intervals per level.
    pub fanout: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            fanout: 10,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fanout < 2 {
            return Err(OddsError::FanoutTooSmall(self.fanout));
        }
        Ok(())
    }

    /// Width of the narrowest luck interval the search can resolve.
    pub fn resolution(&self) -> f64 {
        (self.fanout as f64).powi(-(self.depth as i32))
    }
}

/// Damage value -> lowest luck at which it first appears.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakpointMap(BTreeMap<i32, f64>);

impl BreakpointMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `damage` at `luck`, keeping the lower luck if already present.
    pub fn record(&mut self, damage: i32, luck: f64) {
        self.0
            .entry(damage)
            .and_modify(|existing| *existing = existing.min(luck))
            .or_insert(luck);
    }

    pub fn get(&self, damage: i32) -> Option<f64> {
        self.0.get(&damage).copied()
    }

    /// Entries in ascending damage order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.0.iter().map(|(&damage, &luck)| (damage, luck))
    }

    pub fn min_damage(&self) -> Option<i32> {
        self.0.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Makes the lowest plateau start at luck 0 by adding the damage value
    /// just below it when the search missed the bottom of the domain.
    pub fn anchor(&mut self) {
        if let Some((&min, &luck)) = self.0.first_key_value() {
            if luck > 0.0 {
                self.0.insert(min - 1, 0.0);
            }
        }
    }
}

impl FromIterator<(i32, f64)> for BreakpointMap {
    fn from_iter<I: IntoIterator<Item = (i32, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (damage, luck) in iter {
            map.record(damage, luck);
        }
        map
    }
}

/// Finds where each attainable damage value starts on the luck axis.
///
/// Damage is a non-decreasing step function of luck, so only the
/// sub-intervals where it rises need refining. Breakpoints land on the right
/// edge of the narrowest interval containing each step, so they are accurate
/// to [`SearchConfig::resolution`].
///
/// With `depth == 0` no refinement happens: the whole domain is one bucket
/// holding the damage at the top of the luck range.
pub fn find_breakpoints(params: &DamageParams, search: &SearchConfig) -> Result<BreakpointMap> {
    search.validate()?;

    let mut breakpoints = BreakpointMap::new();
    if search.depth == 0 {
        breakpoints.record(params.damage(1.0), 0.0);
        return Ok(breakpoints);
    }

    breakpoints.record(params.damage(0.0), 0.0);
    refine(params, 0.0, 1.0, search.depth, search.fanout, &mut breakpoints);
    // No-op here since luck 0 is always recorded; matters for hand-built maps.
    breakpoints.anchor();

    trace!(
        base_damage = params.base_damage,
        atk_health = params.atk_health,
        def_health = params.def_health,
        breakpoints = breakpoints.len(),
        "breakpoint search done"
    );
    Ok(breakpoints)
}

fn refine(
    params: &DamageParams,
    low: f64,
    high: f64,
    depth: u32,
    fanout: usize,
    out: &mut BreakpointMap,
) {
    if depth == 0 {
        out.record(params.damage(high), high);
        return;
    }

    let points = sample_points(low, high, fanout);
    let damages = params.damage_many(&points);
    for (dmg, luck) in damages.windows(2).zip(points.windows(2)) {
        if dmg[1] > dmg[0] {
            refine(params, luck[0], luck[1], depth - 1, fanout, out);
        }
    }
}

/// `fanout + 1` evenly spaced points; the last one is exactly `high`.
fn sample_points(low: f64, high: f64, fanout: usize) -> Vec<f64> {
    let step = (high - low) / fanout as f64;
    (0..=fanout)
        .map(|i| if i == fanout { high } else { low + step * i as f64 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_points_cover_both_edges() {
        let points = sample_points(0.2, 0.3, 10);
        assert_eq!(points.len(), 11);
        assert_eq!(points[0], 0.2);
        assert_eq!(points[10], 0.3);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn record_keeps_lowest_luck() {
        let mut map = BreakpointMap::new();
        map.record(7, 0.5);
        map.record(7, 0.25);
        map.record(7, 0.75);
        assert_eq!(map.get(7), Some(0.25));
    }
}
