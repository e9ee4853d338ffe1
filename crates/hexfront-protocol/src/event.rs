use serde::{Deserialize, Serialize};

use crate::{Buildable, CityId, Hex, PlayerId, UnitId, UnitType};

/// A single sim→consumer notification. Events carry enough ids and coordinates to be applied
/// by a renderer without querying world state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Milliseconds since the Unix epoch, as reported by the engine clock.
    pub timestamp_ms: u64,
    pub kind: EventKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventKind {
    // Turn flow
    TurnEnded {
        player: PlayerId,
        turn: u32,
    },
    TurnStarted {
        player: PlayerId,
        turn: u32,
    },
    PlayerEliminated {
        player: PlayerId,
    },

    // Units
    UnitMoved {
        unit: UnitId,
        player: PlayerId,
        from: Hex,
        to: Hex,
        path: Vec<Hex>,
        cost: u32,
        movement_left: u32,
    },
    CombatResolved {
        attacker: UnitId,
        defender: UnitId,
        attacker_player: PlayerId,
        defender_player: PlayerId,
        attacker_damage: i32,
        defender_damage: i32,
        attacker_health: i32,
        defender_health: i32,
        at: Hex,
    },
    UnitDestroyed {
        unit: UnitId,
        player: PlayerId,
        at: Hex,
    },
    UnitSpawned {
        unit: UnitId,
        city: CityId,
        player: PlayerId,
        unit_type: UnitType,
        at: Hex,
    },

    // Cities
    CityFounded {
        city: CityId,
        player: PlayerId,
        at: Hex,
        claimed: Vec<Hex>,
    },
    ProductionChanged {
        city: CityId,
        player: PlayerId,
        item: Buildable,
        queued: bool,
    },
    ProductionCompleted {
        city: CityId,
        player: PlayerId,
        item: Buildable,
    },
    PopulationGrowth {
        city: CityId,
        player: PlayerId,
        population: u32,
        food_stockpile: i32,
    },
}

impl Event {
    pub fn new(timestamp_ms: u64, kind: EventKind) -> Self {
        Self { timestamp_ms, kind }
    }
}
