use std::collections::{BTreeMap, BTreeSet};

use hexfront_protocol::{CityId, Hex};

use crate::{map::TileMap, tile::Yields};

/// Radius of the ring a new city claims around its center.
pub const FOUNDING_RADIUS: i32 = 1;

/// Tile ownership, kept in both directions. The first claim on a tile wins for good.
#[derive(Clone, Debug, Default)]
pub struct TerritoryManager {
    tiles_by_city: BTreeMap<CityId, BTreeSet<Hex>>,
    owner_by_tile: BTreeMap<Hex, CityId>,
}

impl TerritoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `hex` for `city`. Returns `false` if another city already owns it.
    pub fn claim(&mut self, city: CityId, hex: Hex) -> bool {
        match self.owner_by_tile.get(&hex) {
            Some(owner) => *owner == city,
            None => {
                self.owner_by_tile.insert(hex, city);
                self.tiles_by_city.entry(city).or_default().insert(hex);
                true
            }
        }
    }

    /// Claim the founding ring around `center` (on-board tiles only), skipping tiles that
    /// belong to another city. Returns the newly claimed hexes, center first.
    pub fn initialize_city(&mut self, city: CityId, center: Hex, map: &TileMap) -> Vec<Hex> {
        self.tiles_by_city.entry(city).or_default();
        let mut claimed = Vec::new();
        for hex in center.within(FOUNDING_RADIUS) {
            if !map.contains(hex) || self.owner_by_tile.contains_key(&hex) {
                continue;
            }
            if self.claim(city, hex) {
                claimed.push(hex);
            }
        }
        claimed
    }

    pub fn owner_of(&self, hex: Hex) -> Option<CityId> {
        self.owner_by_tile.get(&hex).copied()
    }

    pub fn tiles_of(&self, city: CityId) -> impl Iterator<Item = Hex> + '_ {
        self.tiles_by_city
            .get(&city)
            .into_iter()
            .flat_map(|tiles| tiles.iter().copied())
    }

    pub fn tile_count(&self, city: CityId) -> usize {
        self.tiles_by_city.get(&city).map_or(0, BTreeSet::len)
    }

    /// Sum of tile yields over the city's territory.
    pub fn yields(&self, city: CityId, map: &TileMap) -> Yields {
        self.tiles_of(city)
            .filter_map(|hex| map.get(hex))
            .map(|tile| tile.yields())
            .sum()
    }
}
