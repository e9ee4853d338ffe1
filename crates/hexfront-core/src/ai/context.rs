use std::collections::BTreeMap;

use hexfront_protocol::{Buildable, CityId, Hex, PlayerId, UnitId, UnitType};

use crate::{
    map::TileMap,
    pathfinding::HexPathfinder,
    pipeline::founding_site_error,
    players::PlayerManager,
    rules::Rules,
    state::GameState,
    territory::TerritoryManager,
};

/// Owned copy of the unit fields scoring looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitView {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub owner: PlayerId,
    pub position: Hex,
    pub health: i32,
    pub movement: u32,
    pub combat_strength: i32,
    /// Movement left and non-zero strength.
    pub combat_ready: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CityView {
    pub id: CityId,
    pub position: Hex,
    pub population: u32,
    pub current_item: Option<Buildable>,
    pub progress: u32,
    pub cost: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnitCapabilities {
    pub can_move: bool,
    pub can_attack: bool,
    pub can_found_city: bool,
}

impl UnitCapabilities {
    pub fn any(self) -> bool {
        self.can_move || self.can_attack || self.can_found_city
    }
}

/// Read-only snapshot of the world from one player's seat.
///
/// Borrows the `GameState` it was built from, so no command can execute while a context is
/// alive; callers rebuild it after every executed command.
pub struct AiContext<'a> {
    pub player: PlayerId,
    pub my_units: Vec<UnitView>,
    pub my_cities: Vec<CityView>,
    pub enemy_units: BTreeMap<PlayerId, Vec<UnitView>>,
    pub tile_map: &'a TileMap,
    pub territory: &'a TerritoryManager,
    pub players: &'a PlayerManager,
    pub rules: &'a Rules,
    pub pathfinder: HexPathfinder<'a>,
    state: &'a GameState,
}

impl<'a> AiContext<'a> {
    pub fn build(state: &'a GameState, player: PlayerId) -> Self {
        let mut my_units = Vec::new();
        let mut enemy_units: BTreeMap<PlayerId, Vec<UnitView>> = BTreeMap::new();
        for (id, unit) in state.units.iter_ordered() {
            let view = UnitView {
                id,
                unit_type: unit.unit_type,
                owner: unit.owner,
                position: unit.position,
                health: unit.health,
                movement: unit.movement,
                combat_strength: unit.combat_strength,
                combat_ready: unit.is_combat_ready(),
            };
            if unit.owner == player {
                my_units.push(view);
            } else {
                enemy_units.entry(unit.owner).or_default().push(view);
            }
        }

        let my_cities = state
            .cities_of(player)
            .map(|(id, city)| CityView {
                id,
                position: city.position,
                population: city.population,
                current_item: city.current_item,
                progress: city.progress,
                cost: city.cost,
            })
            .collect();

        Self {
            player,
            my_units,
            my_cities,
            enemy_units,
            tile_map: &state.map,
            territory: &state.territory,
            players: &state.players,
            rules: &state.rules,
            pathfinder: HexPathfinder::new(&state.map),
            state,
        }
    }

    /// The state this context was built from, for validation.
    pub fn state(&self) -> &'a GameState {
        self.state
    }

    /// Any unit, own or enemy.
    pub fn unit(&self, id: UnitId) -> Option<&UnitView> {
        self.my_units
            .iter()
            .chain(self.enemies())
            .find(|u| u.id == id)
    }

    pub fn city(&self, id: CityId) -> Option<&CityView> {
        self.my_cities.iter().find(|c| c.id == id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &UnitView> {
        self.enemy_units.values().flatten()
    }

    pub fn has_enemy_at(&self, hex: Hex) -> bool {
        self.enemies().any(|u| u.position == hex)
    }

    /// Enemy units adjacent to `hex`, in player then id order.
    pub fn adjacent_enemies(&self, hex: Hex) -> impl Iterator<Item = &UnitView> {
        self.enemies().filter(move |u| u.position.is_adjacent(hex))
    }

    pub fn can_found_city(&self, unit: &UnitView) -> bool {
        self.rules.unit(unit.unit_type).can_found_city
            && founding_site_error(self.state, unit.position).is_none()
    }

    pub fn capabilities(&self, unit: &UnitView) -> UnitCapabilities {
        UnitCapabilities {
            can_move: unit.movement > 0,
            can_attack: unit.combat_ready
                && self.adjacent_enemies(unit.position).next().is_some(),
            can_found_city: self.can_found_city(unit),
        }
    }
}
