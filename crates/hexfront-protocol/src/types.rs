use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    Warrior,
    Scout,
    Settler,
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Warrior, UnitType::Scout, UnitType::Settler];

    pub fn name(self) -> &'static str {
        match self {
            UnitType::Warrior => "warrior",
            UnitType::Scout => "scout",
            UnitType::Settler => "settler",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something a city can put into production. Currently only units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Buildable {
    Warrior,
    Scout,
    Settler,
}

impl Buildable {
    pub const ALL: [Buildable; 3] = [Buildable::Warrior, Buildable::Scout, Buildable::Settler];

    pub fn unit_type(self) -> UnitType {
        match self {
            Buildable::Warrior => UnitType::Warrior,
            Buildable::Scout => UnitType::Scout,
            Buildable::Settler => UnitType::Settler,
        }
    }
}

impl fmt::Display for Buildable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unit_type().name())
    }
}

/// Turn phase cycle: `PlayerAction -> TurnEnd -> TurnStart -> PlayerAction`. No terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    #[default]
    PlayerAction,
    TurnEnd,
    TurnStart,
}

impl TurnPhase {
    pub fn next(self) -> Self {
        match self {
            TurnPhase::PlayerAction => TurnPhase::TurnEnd,
            TurnPhase::TurnEnd => TurnPhase::TurnStart,
            TurnPhase::TurnStart => TurnPhase::PlayerAction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_cycle_returns_to_player_action() {
        let mut phase = TurnPhase::PlayerAction;
        let mut seen = Vec::new();
        for _ in 0..3 {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![TurnPhase::TurnEnd, TurnPhase::TurnStart, TurnPhase::PlayerAction]
        );
    }

    #[test]
    fn every_buildable_maps_to_a_unit() {
        for item in Buildable::ALL {
            assert_eq!(item.to_string(), item.unit_type().name());
        }
    }
}
