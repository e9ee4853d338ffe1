use std::collections::BTreeMap;

use serde::Serialize;

use hexfront_protocol::{
    wire::hash_bytes_fnv1a64, CityId, CityTag, Hex, PlayerId, TurnPhase, UnitId, UnitTag,
    UnitType,
};

use crate::{
    city::City,
    entities::EntityStore,
    map::TileMap,
    players::{PlayerAssets, PlayerManager},
    production::ProductionQueue,
    rules::Rules,
    territory::TerritoryManager,
    unit::Unit,
};

/// Everything the simulation mutates. Only executors take `&mut GameState`.
#[derive(Clone, Debug)]
pub struct GameState {
    pub turn: u32,
    pub current_player: PlayerId,
    pub phase: TurnPhase,
    pub map: TileMap,
    pub rules: Rules,
    pub players: PlayerManager,
    pub units: EntityStore<Unit, UnitTag>,
    pub cities: EntityStore<City, CityTag>,
    pub territory: TerritoryManager,
    pub queues: BTreeMap<CityId, ProductionQueue>,
}

impl GameState {
    pub fn new(map: TileMap, players: PlayerManager, rules: Rules) -> Self {
        let current_player = players.active().next().unwrap_or(PlayerId(0));
        Self {
            turn: 1,
            current_player,
            phase: TurnPhase::PlayerAction,
            map,
            rules,
            players,
            units: EntityStore::default(),
            cities: EntityStore::default(),
            territory: TerritoryManager::new(),
            queues: BTreeMap::new(),
        }
    }

    pub fn spawn_unit(&mut self, unit_type: UnitType, owner: PlayerId, at: Hex) -> UnitId {
        self.units
            .insert(Unit::new(unit_type, owner, at, &self.rules))
    }

    pub fn units_at(&self, hex: Hex) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units
            .iter_ordered()
            .filter(move |(_, unit)| unit.position == hex)
    }

    pub fn has_enemy_unit_at(&self, hex: Hex, player: PlayerId) -> bool {
        self.units_at(hex).any(|(_, unit)| unit.owner != player)
    }

    pub fn city_at(&self, hex: Hex) -> Option<(CityId, &City)> {
        self.cities
            .iter_ordered()
            .find(|(_, city)| city.position == hex)
    }

    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units
            .iter_ordered()
            .filter(move |(_, unit)| unit.owner == player)
    }

    pub fn cities_of(&self, player: PlayerId) -> impl Iterator<Item = (CityId, &City)> {
        self.cities
            .iter_ordered()
            .filter(move |(_, city)| city.owner == player)
    }

    pub fn queue(&self, city: CityId) -> Option<&ProductionQueue> {
        self.queues.get(&city)
    }

    pub fn queue_mut(&mut self, city: CityId) -> &mut ProductionQueue {
        let limit = self.rules.production.queue_limit;
        self.queues
            .entry(city)
            .or_insert_with(|| ProductionQueue::new(limit))
    }

    /// Where a unit produced by a city at `center` appears: the city tile if no unit stands
    /// there, else the first free passable neighbor in direction order, else stacked on the
    /// city tile.
    pub fn spawn_hex(&self, center: Hex) -> Hex {
        if self.units_at(center).next().is_none() {
            return center;
        }
        center
            .neighbors()
            .find(|&hex| {
                self.map.get(hex).is_some_and(|t| t.movement_cost().is_some())
                    && self.units_at(hex).next().is_none()
            })
            .unwrap_or(center)
    }

    /// Flag `player` eliminated if it has nothing left. `true` the first time only.
    pub fn check_elimination(&mut self, player: PlayerId) -> bool {
        let holdings = Holdings {
            units: &self.units,
            cities: &self.cities,
        };
        self.players.check_elimination(&holdings, player)
    }

    /// Stable hash over everything commands can change. Two states reached by the same
    /// command sequence hash equal.
    pub fn state_hash(&self) -> u64 {
        let snapshot = StateSnapshot {
            turn: self.turn,
            current_player: self.current_player,
            phase: self.phase,
            players: &self.players,
            units: self
                .units
                .iter_ordered()
                .map(|(id, unit)| (id.to_raw(), unit))
                .collect(),
            cities: self
                .cities
                .iter_ordered()
                .map(|(id, city)| {
                    let tiles: Vec<Hex> = self.territory.tiles_of(id).collect();
                    (id.to_raw(), city, tiles)
                })
                .collect(),
            queues: self
                .queues
                .iter()
                .map(|(id, queue)| (id.to_raw(), queue))
                .collect(),
        };
        match serde_json::to_vec(&snapshot) {
            Ok(bytes) => hash_bytes_fnv1a64(&bytes),
            Err(err) => {
                tracing::warn!(%err, "state snapshot failed to serialize");
                0
            }
        }
    }
}

struct Holdings<'a> {
    units: &'a EntityStore<Unit, UnitTag>,
    cities: &'a EntityStore<City, CityTag>,
}

impl PlayerAssets for Holdings<'_> {
    fn unit_count(&self, player: PlayerId) -> usize {
        self.units
            .iter_ordered()
            .filter(|(_, u)| u.owner == player)
            .count()
    }

    fn city_count(&self, player: PlayerId) -> usize {
        self.cities
            .iter_ordered()
            .filter(|(_, c)| c.owner == player)
            .count()
    }
}

#[derive(Serialize)]
struct StateSnapshot<'a> {
    turn: u32,
    current_player: PlayerId,
    phase: TurnPhase,
    players: &'a PlayerManager,
    units: Vec<(u64, &'a Unit)>,
    cities: Vec<(u64, &'a City, Vec<Hex>)>,
    queues: Vec<(u64, &'a ProductionQueue)>,
}
