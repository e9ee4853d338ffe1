use crate::{map::TileMap, rules::CombatRules, unit::Unit};
use hexfront_protocol::Hex;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatInput {
    pub attacker_strength: i32,
    pub defender_strength: i32,
    pub attacker_health: i32,
    pub defender_health: i32,
    /// Additive fraction applied to the defender's strength (0.25 = +25%).
    pub defense_modifier: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatOutcome {
    pub attacker_damage: i32,
    pub defender_damage: i32,
    pub attacker_survives: bool,
    pub defender_survives: bool,
}

impl CombatInput {
    /// Input for `attacker` striking `defender` where it stands.
    pub fn between(attacker: &Unit, defender: &Unit, map: &TileMap) -> Self {
        Self {
            attacker_strength: attacker.combat_strength,
            defender_strength: defender.combat_strength,
            attacker_health: attacker.health,
            defender_health: defender.health,
            defense_modifier: defense_modifier_at(map, defender.position),
        }
    }
}

/// Terrain/feature defense bonus at `hex`; off-board hexes give none.
pub fn defense_modifier_at(map: &TileMap, hex: Hex) -> f64 {
    map.get(hex).map(|t| t.defense_modifier()).unwrap_or(0.0)
}

/// Resolve one exchange. Deterministic: no randomness, no state.
///
/// A fixed pool of `base_damage` is split by the strength ratio. Terrain only scales the
/// defender's effective strength, so a better position can never increase damage taken.
pub fn calculate_combat(input: CombatInput, rules: &CombatRules) -> CombatOutcome {
    let lethal = rules.lethal_damage;

    if input.defender_strength <= 0 {
        return CombatOutcome {
            attacker_damage: 0,
            defender_damage: lethal,
            attacker_survives: true,
            defender_survives: false,
        };
    }
    if input.attacker_strength <= 0 {
        return resolve(input, lethal, 0);
    }

    let base = f64::from(rules.base_damage);
    let attacker = f64::from(input.attacker_strength);
    let defender = f64::from(input.defender_strength);
    let defender_effective = defender * (1.0 + input.defense_modifier.max(0.0));

    let defender_damage = scaled_damage(base * attacker / defender_effective, lethal);
    let attacker_damage = scaled_damage(base * defender / attacker, lethal);
    resolve(input, attacker_damage, defender_damage)
}

fn scaled_damage(raw: f64, lethal: i32) -> i32 {
    (raw.round() as i32).clamp(0, lethal)
}

fn resolve(input: CombatInput, attacker_damage: i32, defender_damage: i32) -> CombatOutcome {
    CombatOutcome {
        attacker_damage,
        defender_damage,
        attacker_survives: input.attacker_health - attacker_damage > 0,
        defender_survives: input.defender_health - defender_damage > 0,
    }
}
