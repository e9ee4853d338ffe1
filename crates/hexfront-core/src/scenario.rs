use serde::{Deserialize, Serialize};

use hexfront_protocol::{wire::hash_bytes_fnv1a64, Hex, PlayerId, UnitType};

use crate::{
    map::TileMap,
    players::PlayerManager,
    rules::Rules,
    state::GameState,
    tile::{Feature, Resource, Terrain, Tile},
};

pub const MAX_PLAYERS: u8 = 16;

/// Everything needed to rebuild a starting position. Stored verbatim in replays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub width: i32,
    pub height: i32,
    pub players: u8,
    /// Seeds the terrain pattern; the same seed always yields the same map.
    pub seed: u64,
    pub starting_units: Vec<UnitType>,
    pub ai_players: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 12,
            players: 2,
            seed: 42,
            starting_units: vec![UnitType::Settler, UnitType::Warrior],
            ai_players: true,
        }
    }
}

impl ScenarioConfig {
    pub fn build(&self, rules: Rules) -> GameState {
        let width = self.width.max(3);
        let height = self.height.max(3);
        let players = self.players.clamp(1, MAX_PLAYERS);

        let mut map = TileMap::new();
        for q in 0..width {
            for r in 0..height {
                let hex = Hex::new(q, r);
                map.set(hex, patterned_tile(self.seed, hex));
            }
        }

        let starts = start_positions(width, height, players);
        for &start in &starts {
            // Clear the start so settlers can always found on turn one.
            for hex in start.within(1) {
                if map.contains(hex) {
                    map.set(hex, Tile::new(Terrain::Grassland));
                }
            }
        }

        let mut state = GameState::new(map, PlayerManager::new(players, self.ai_players), rules);
        for (index, start) in starts.into_iter().enumerate() {
            let owner = PlayerId(index as u8);
            for &unit_type in &self.starting_units {
                state.spawn_unit(unit_type, owner, start);
            }
        }
        state
    }
}

/// Players spread along the middle row, evenly spaced.
fn start_positions(width: i32, height: i32, players: u8) -> Vec<Hex> {
    let row = height / 2;
    let slots = i32::from(players) + 1;
    (1..=i32::from(players))
        .map(|i| Hex::new((i * width / slots).clamp(1, width - 2), row))
        .collect()
}

fn patterned_tile(seed: u64, hex: Hex) -> Tile {
    let mut bytes = [0_u8; 16];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..12].copy_from_slice(&hex.q.to_le_bytes());
    bytes[12..].copy_from_slice(&hex.r.to_le_bytes());
    let roll = hash_bytes_fnv1a64(&bytes);

    let tile = match roll % 20 {
        0..=6 => Tile::new(Terrain::Grassland),
        7..=11 => Tile::new(Terrain::Plains),
        12 => Tile::new(Terrain::Grassland).with_feature(Feature::Forest),
        13 => Tile::new(Terrain::Plains).with_feature(Feature::Forest),
        14 => Tile::new(Terrain::PlainsHill),
        15 => Tile::new(Terrain::GrasslandHill),
        16 => Tile::new(Terrain::Desert),
        17 => Tile::new(Terrain::Tundra),
        18 => Tile::new(Terrain::Mountain),
        _ => Tile::new(Terrain::Lake),
    };
    match (roll >> 16) % 12 {
        0 if tile.is_settleable() => tile.with_resource(Resource::Wheat),
        1 if tile.is_settleable() => tile.with_resource(Resource::Cattle),
        2 if tile.terrain.is_hill() => tile.with_resource(Resource::Iron),
        _ => tile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{load_rules, RulesSource};

    fn rules() -> Rules {
        load_rules(RulesSource::Embedded).expect("rules load")
    }

    #[test]
    fn same_seed_same_world() {
        let config = ScenarioConfig::default();
        let a = config.build(rules());
        let b = config.build(rules());
        assert_eq!(a.map, b.map);
        assert_eq!(a.state_hash(), b.state_hash());

        let other = ScenarioConfig {
            seed: 7,
            ..ScenarioConfig::default()
        }
        .build(rules());
        assert_ne!(a.map, other.map);
    }

    #[test]
    fn every_player_starts_with_units_on_clear_land() {
        let config = ScenarioConfig {
            players: 3,
            ..ScenarioConfig::default()
        };
        let state = config.build(rules());
        assert_eq!(state.players.len(), 3);
        assert_eq!(state.units.len(), 6);
        for player in 0..3 {
            let units: Vec<_> = state.units_of(PlayerId(player)).collect();
            assert_eq!(units.len(), 2);
            let start = units[0].1.position;
            assert!(state.map.get(start).is_some_and(Tile::is_settleable));
        }
        assert_eq!(state.current_player, PlayerId(0));
    }

    #[test]
    fn config_round_trips_through_json_with_defaults() {
        let config: ScenarioConfig = serde_json::from_str(r#"{"players": 4}"#).unwrap();
        assert_eq!(config.players, 4);
        assert_eq!(config.width, ScenarioConfig::default().width);
    }
}
