//! Exact outcome odds for luck-based combat exchanges.
//!
//! Damage is a deterministic function of a hidden luck value in [0, 1).
//! Rather than sampling luck, the resolvers locate the luck breakpoints
//! between whole damage values and turn them into exact distributions for a
//! single exchange (attack plus counter) and for chains of attacks.

pub mod api;
pub mod combat;
pub mod damage;
pub mod error;
pub mod pmf;
pub mod search;
pub mod units;

pub use combat::{
    simulate_combat, simulate_sequence, Attack, Combatant, ExchangeDistribution,
    HealthDistribution, HealthState, SequenceHistory,
};
pub use damage::DamageParams;
pub use error::{OddsError, Result};
pub use pmf::{damage_pmf, to_pmf, DamagePmf};
pub use search::{find_breakpoints, BreakpointMap, SearchConfig};
pub use units::{Movement, Unit, UnitAttributes, UnitStats, UnitTable, UnitType, MAX_HEALTH};
