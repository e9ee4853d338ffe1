use std::collections::BTreeMap;

use hexfront_protocol::{Buildable, UnitType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing unit type: {0}")]
    MissingUnitType(&'static str),
    #[error("unknown unit type: {0}")]
    UnknownUnitType(String),
    #[error("invalid rule value: {0}")]
    Invalid(String),
}

pub enum RulesSource<'a> {
    Embedded,
    Path(String),
    Str(&'a str),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub combat_strength: i32,
    pub movement: u32,
    pub health: i32,
    pub cost: u32,
    #[serde(default)]
    pub can_found_city: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatRules {
    pub base_damage: i32,
    pub lethal_damage: i32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            base_damage: 30,
            lethal_damage: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionRules {
    pub queue_limit: usize,
    pub overflow_cap_percent: u32,
}

impl Default for ProductionRules {
    fn default() -> Self {
        Self {
            queue_limit: 5,
            overflow_cap_percent: 50,
        }
    }
}

impl ProductionRules {
    /// Largest carry-in an item of `next_cost` may start with.
    pub fn overflow_cap(&self, next_cost: u32) -> u32 {
        next_cost * self.overflow_cap_percent / 100
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthRules {
    pub base_threshold: i32,
    pub threshold_per_pop: i32,
    pub food_per_pop: i32,
}

impl Default for GrowthRules {
    fn default() -> Self {
        Self {
            base_threshold: 15,
            threshold_per_pop: 6,
            food_per_pop: 2,
        }
    }
}

impl GrowthRules {
    pub fn threshold(&self, population: u32) -> i32 {
        self.base_threshold + population as i32 * self.threshold_per_pop
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiRules {
    /// Below this many cities the AI strongly prefers building settlers.
    pub settler_city_target: usize,
    pub max_steps_per_unit: usize,
}

impl Default for AiRules {
    fn default() -> Self {
        Self {
            settler_city_target: 3,
            max_steps_per_unit: 8,
        }
    }
}

/// Validated, typed game rules.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    units: BTreeMap<UnitType, UnitStats>,
    pub combat: CombatRules,
    pub production: ProductionRules,
    pub growth: GrowthRules,
    pub ai: AiRules,
}

impl Rules {
    pub fn unit(&self, unit_type: UnitType) -> &UnitStats {
        // Construction guarantees every UnitType has an entry.
        &self.units[&unit_type]
    }

    pub fn cost(&self, item: Buildable) -> u32 {
        self.unit(item.unit_type()).cost
    }
}

#[derive(Debug, Deserialize)]
struct RawRules {
    units: BTreeMap<String, UnitStats>,
    #[serde(default)]
    combat: CombatRules,
    #[serde(default)]
    production: ProductionRules,
    #[serde(default)]
    growth: GrowthRules,
    #[serde(default)]
    ai: AiRules,
}

pub fn load_rules(source: RulesSource<'_>) -> Result<Rules, RulesError> {
    let raw: RawRules = match source {
        RulesSource::Embedded => serde_yaml::from_str(include_str!("../data/rules.yaml"))?,
        RulesSource::Path(path) => serde_yaml::from_str(&std::fs::read_to_string(path)?)?,
        RulesSource::Str(text) => serde_yaml::from_str(text)?,
    };
    compile_rules(raw)
}

fn compile_rules(raw: RawRules) -> Result<Rules, RulesError> {
    let mut units = BTreeMap::new();
    for (name, stats) in raw.units {
        let unit_type = UnitType::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| RulesError::UnknownUnitType(name.clone()))?;
        if stats.health <= 0 {
            return Err(RulesError::Invalid(format!("{name}: health must be positive")));
        }
        if stats.combat_strength < 0 {
            return Err(RulesError::Invalid(format!(
                "{name}: combat_strength must not be negative"
            )));
        }
        units.insert(unit_type, stats);
    }
    for unit_type in UnitType::ALL {
        if !units.contains_key(&unit_type) {
            return Err(RulesError::MissingUnitType(unit_type.name()));
        }
    }
    if raw.production.overflow_cap_percent > 100 {
        return Err(RulesError::Invalid(
            "production.overflow_cap_percent must be <= 100".to_string(),
        ));
    }

    Ok(Rules {
        units,
        combat: raw.combat,
        production: raw.production,
        growth: raw.growth,
        ai: raw.ai,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_rules_match_documented_defaults() {
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        assert_eq!(rules.cost(Buildable::Warrior), 40);
        assert_eq!(rules.cost(Buildable::Scout), 30);
        assert_eq!(rules.cost(Buildable::Settler), 80);
        assert_eq!(rules.unit(UnitType::Settler).combat_strength, 0);
        assert!(rules.unit(UnitType::Settler).can_found_city);
        assert!(!rules.unit(UnitType::Warrior).can_found_city);
        assert_eq!(rules.combat, CombatRules::default());
        assert_eq!(rules.production, ProductionRules::default());
        assert_eq!(rules.growth, GrowthRules::default());
    }

    #[test]
    fn missing_unit_type_is_rejected() {
        let yaml = "units:\n  warrior: { combat_strength: 1, movement: 1, health: 10, cost: 5 }\n";
        let err = load_rules(RulesSource::Str(yaml)).unwrap_err();
        assert!(matches!(err, RulesError::MissingUnitType("scout")));
    }

    #[test]
    fn unknown_unit_type_is_rejected() {
        let yaml = "units:\n  catapult: { combat_strength: 1, movement: 1, health: 10, cost: 5 }\n";
        let err = load_rules(RulesSource::Str(yaml)).unwrap_err();
        assert!(matches!(err, RulesError::UnknownUnitType(name) if name == "catapult"));
    }

    #[test]
    fn overflow_cap_floors() {
        let production = ProductionRules::default();
        assert_eq!(production.overflow_cap(40), 20);
        assert_eq!(production.overflow_cap(35), 17);
        assert_eq!(production.overflow_cap(1), 0);
    }

    #[test]
    fn growth_threshold_scales_with_population() {
        let growth = GrowthRules::default();
        assert_eq!(growth.threshold(1), 21);
        assert_eq!(growth.threshold(3), 33);
    }
}
