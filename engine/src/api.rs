use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::combat::{
    simulate_combat, simulate_sequence, Attack, Combatant, HealthDistribution, HealthState,
};
use crate::search::SearchConfig;
use crate::units::{UnitTable, MAX_HEALTH};

fn full_health() -> i32 {
    MAX_HEALTH
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CombatantConfig {
    pub unit: String,
    #[serde(default = "full_health")]
    pub health: i32,
    #[serde(default)]
    pub terrain_defense: f64,
    #[serde(default)]
    pub crit: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExchangeConfig {
    pub attacker: CombatantConfig,
    pub defender: CombatantConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AttackConfig {
    #[serde(flatten)]
    pub attacker: CombatantConfig,
    #[serde(default)]
    pub requires_lethal: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SequenceConfig {
    pub defender: CombatantConfig,
    pub attacks: Vec<AttackConfig>,
    #[serde(default)]
    pub search: SearchConfig,
}

impl ExchangeConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        parse_json(text, "exchange")
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        parse_yaml(text, "exchange")
    }
}

impl SequenceConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        parse_json(text, "sequence")
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        parse_yaml(text, "sequence")
    }
}

fn parse_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    serde_json::from_str(text).with_context(|| format!("failed to parse {} JSON", what))
}

fn parse_yaml<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    serde_yaml::from_str(text).with_context(|| format!("failed to parse {} YAML", what))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutcomeRow {
    pub attacker_health: i32,
    pub defender_health: i32,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExchangeReport {
    pub outcomes: Vec<OutcomeRow>,
    pub attacker_death_chance: f64,
    pub defender_death_chance: f64,
    pub expected_attacker_health: f64,
    pub expected_defender_health: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StateRow {
    pub state: HealthState,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StepReport {
    pub step: usize,
    pub lethal_chance: f64,
    pub failure_chance: f64,
    pub expected_health: Option<f64>,
    pub states: Vec<StateRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SequenceReport {
    pub steps: Vec<StepReport>,
}

pub fn simulate_exchange(cfg: &ExchangeConfig, table: &UnitTable) -> Result<ExchangeReport> {
    let attacker = resolve_combatant(table, &cfg.attacker)?;
    let defender = resolve_combatant(table, &cfg.defender)?;
    let dist = simulate_combat(table, &attacker, &defender, &cfg.search).with_context(|| {
        format!(
            "failed to resolve {} attacking {}",
            cfg.attacker.unit, cfg.defender.unit
        )
    })?;

    Ok(ExchangeReport {
        outcomes: dist
            .iter()
            .map(|((attacker_health, defender_health), probability)| OutcomeRow {
                attacker_health,
                defender_health,
                probability,
            })
            .collect(),
        attacker_death_chance: dist.attacker_death_probability(),
        defender_death_chance: dist.defender_death_probability(),
        expected_attacker_health: dist.expected_attacker_health(),
        expected_defender_health: dist.expected_defender_health(),
    })
}

pub fn simulate_attack_sequence(cfg: &SequenceConfig, table: &UnitTable) -> Result<SequenceReport> {
    let defender = resolve_combatant(table, &cfg.defender)?;
    let attacks = cfg
        .attacks
        .iter()
        .map(|a| {
            Ok(Attack {
                attacker: resolve_combatant(table, &a.attacker)?,
                requires_lethal: a.requires_lethal,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let history = simulate_sequence(table, &defender, &attacks, &cfg.search)
        .with_context(|| format!("failed to resolve attack sequence on {}", cfg.defender.unit))?;

    Ok(SequenceReport {
        steps: history.iter().enumerate().map(step_report).collect(),
    })
}

fn step_report((step, dist): (usize, &HealthDistribution)) -> StepReport {
    StepReport {
        step,
        lethal_chance: dist.lethal_probability(),
        failure_chance: dist.failure_probability(),
        expected_health: dist.expected_health(),
        states: dist
            .iter()
            .map(|(state, probability)| StateRow { state, probability })
            .collect(),
    }
}

fn resolve_combatant(table: &UnitTable, cfg: &CombatantConfig) -> Result<Combatant> {
    let unit = table
        .spawn(&cfg.unit, cfg.health)
        .ok_or_else(|| anyhow!("unknown unit '{}'", cfg.unit))?;
    Ok(Combatant::new(unit, cfg.terrain_defense).with_crit(cfg.crit))
}
