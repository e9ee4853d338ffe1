use std::collections::BTreeMap;

use hexfront_protocol::Hex;
use serde::{Deserialize, Serialize};

use crate::tile::{Terrain, Tile};

/// Read-only tile lookup keyed by hex. Hexes missing from the map are off-board.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    tiles: BTreeMap<Hex, Tile>,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axial rectangle `0..width` × `0..height` filled with one terrain.
    pub fn rectangle(width: i32, height: i32, terrain: Terrain) -> Self {
        let mut map = Self::new();
        for q in 0..width {
            for r in 0..height {
                map.set(Hex::new(q, r), Tile::new(terrain));
            }
        }
        map
    }

    /// Every hex within `radius` of `center` filled with one terrain.
    pub fn disc(center: Hex, radius: i32, terrain: Terrain) -> Self {
        let mut map = Self::new();
        for hex in center.within(radius) {
            map.set(hex, Tile::new(terrain));
        }
        map
    }

    pub fn set(&mut self, hex: Hex, tile: Tile) {
        self.tiles.insert(hex, tile);
    }

    pub fn get(&self, hex: Hex) -> Option<&Tile> {
        self.tiles.get(&hex)
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.tiles.contains_key(&hex)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Hex, &Tile)> {
        self.tiles.iter().map(|(hex, tile)| (*hex, tile))
    }

    /// On-board neighbors in direction order.
    pub fn neighbors(&self, hex: Hex) -> impl Iterator<Item = Hex> + '_ {
        hex.neighbors().filter(move |n| self.contains(*n))
    }

    /// Tiles keyed by their `"q,r"` string, the form external tools exchange.
    pub fn to_keyed(&self) -> BTreeMap<String, Tile> {
        self.tiles
            .iter()
            .map(|(hex, tile)| (hex.key(), *tile))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_skip_off_board_hexes() {
        let map = TileMap::rectangle(3, 3, Terrain::Plains);
        assert_eq!(map.len(), 9);
        assert_eq!(map.neighbors(Hex::new(0, 0)).count(), 2);
        assert_eq!(map.neighbors(Hex::new(1, 1)).count(), 6);
    }

    #[test]
    fn keyed_view_uses_q_comma_r() {
        let map = TileMap::disc(Hex::new(0, 0), 1, Terrain::Grassland);
        let keyed = map.to_keyed();
        assert_eq!(keyed.len(), 7);
        assert!(keyed.contains_key("-1,1"));
    }
}
