use serde::{Deserialize, Serialize};

use hexfront_protocol::{Hex, PlayerId, UnitType};

use crate::rules::Rules;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub unit_type: UnitType,
    pub owner: PlayerId,
    pub position: Hex,
    pub health: i32,
    pub max_health: i32,
    pub movement: u32,
    pub max_movement: u32,
    pub combat_strength: i32,
}

impl Unit {
    /// Fresh unit at full health and movement.
    pub fn new(unit_type: UnitType, owner: PlayerId, position: Hex, rules: &Rules) -> Self {
        let stats = rules.unit(unit_type);
        Self {
            unit_type,
            owner,
            position,
            health: stats.health,
            max_health: stats.health,
            movement: stats.movement,
            max_movement: stats.movement,
            combat_strength: stats.combat_strength,
        }
    }

    pub fn can_move(&self) -> bool {
        self.movement > 0
    }

    /// Has the movement and strength to attack; adjacency is checked by the caller.
    pub fn is_combat_ready(&self) -> bool {
        self.movement > 0 && self.combat_strength > 0
    }

    pub fn is_settler(&self, rules: &Rules) -> bool {
        rules.unit(self.unit_type).can_found_city
    }

    /// Spend movement. Movement only ever decreases within a turn.
    pub fn spend_movement(&mut self, cost: u32) {
        self.movement = self.movement.saturating_sub(cost);
    }

    pub fn exhaust(&mut self) {
        self.movement = 0;
    }

    pub fn restore_movement(&mut self) {
        self.movement = self.max_movement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{load_rules, RulesSource};

    #[test]
    fn new_units_take_stats_from_rules() {
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        let scout = Unit::new(UnitType::Scout, PlayerId(0), Hex::ORIGIN, &rules);
        assert_eq!(scout.movement, 3);
        assert_eq!(scout.combat_strength, 10);
        assert_eq!(scout.health, scout.max_health);
        assert!(scout.is_combat_ready());
        assert!(!scout.is_settler(&rules));

        let settler = Unit::new(UnitType::Settler, PlayerId(0), Hex::ORIGIN, &rules);
        assert!(settler.is_settler(&rules));
        assert!(!settler.is_combat_ready());
    }

    #[test]
    fn movement_saturates_and_restores_to_max() {
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        let mut warrior = Unit::new(UnitType::Warrior, PlayerId(1), Hex::ORIGIN, &rules);
        warrior.spend_movement(5);
        assert_eq!(warrior.movement, 0);
        assert!(!warrior.can_move());
        warrior.restore_movement();
        assert_eq!(warrior.movement, 2);
    }
}
