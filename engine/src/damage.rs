use serde::{Deserialize, Serialize};

/// Width of the luck bonus, as a fraction of base damage (10 points).
const LUCK_SWING: f64 = 0.1;
/// Any attack above this raw value deals at least 1 damage.
const MIN_DAMAGE_THRESHOLD: f64 = 0.001;

/// Combat parameters that stay fixed while luck varies.
///
/// Health values are percentages (0..=100). `terrain_defense` runs from
/// about -0.2 (favours the attacker) to 0.4 (favours the defender).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageParams {
    pub base_damage: i32,
    pub atk_health: i32,
    pub def_health: i32,
    pub terrain_defense: f64,
    pub crit_multiplier: f64,
}

impl DamageParams {
    /// Unrounded damage as a fraction of full health.
    pub fn raw(&self, luck: f64) -> f64 {
        // Crits narrow the luck range but keep it centred on the same mean.
        let rng_scale = 1.0 / self.crit_multiplier.max(1.0);
        let rng_bonus = LUCK_SWING * (luck * rng_scale + (1.0 - rng_scale) / 2.0);

        let offense = f64::from(self.base_damage) / 100.0 + rng_bonus;
        let defense = 1.0
            - (f64::from(self.def_health) / 100.0 * self.terrain_defense.max(0.0)
                - (-self.terrain_defense).max(0.0));
        f64::from(self.atk_health) / 100.0 * defense * offense * self.crit_multiplier
    }

    /// Whole-number damage dealt at `luck`. Non-decreasing in `luck`.
    pub fn damage(&self, luck: f64) -> i32 {
        let raw = self.raw(luck);
        let whole = (100.0 * raw + 0.5).floor() as i32;
        if raw > MIN_DAMAGE_THRESHOLD && whole < 1 {
            1
        } else {
            whole
        }
    }

    pub fn damage_many(&self, lucks: &[f64]) -> Vec<i32> {
        lucks.iter().map(|&luck| self.damage(luck)).collect()
    }
}
