use thiserror::Error;

use crate::units::UnitType;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OddsError {
    /// The attribute provider has no base damage for this pairing.
    #[error("{attacker} has no base damage against {defender}")]
    NoBaseDamage {
        attacker: UnitType,
        defender: UnitType,
    },
    #[error("health {0} is outside 0..=100")]
    HealthOutOfRange(i32),
    #[error("search fan-out must be at least 2 (got {0})")]
    FanoutTooSmall(usize),
}

pub type Result<T, E = OddsError> = std::result::Result<T, E>;
