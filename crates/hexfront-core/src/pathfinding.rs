use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
};

use hexfront_protocol::Hex;

use crate::map::TileMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathResult {
    /// Steps after the start, ending at the destination.
    pub path: Vec<Hex>,
    pub total_cost: u32,
}

/// Movement-cost oracle consumed by validation and the AI.
///
/// Contract: costs are non-negative, and a destination reachable with budget `b` stays
/// reachable (at the same cost) with any budget `>= b`.
pub trait Pathfinder {
    fn find_path(&self, from: Hex, to: Hex, budget: u32) -> Option<PathResult>;

    /// Every hex reachable within `budget`, including `from` at cost 0.
    fn reachable_tiles(&self, from: Hex, budget: u32) -> BTreeMap<Hex, u32>;
}

/// Dijkstra over terrain + feature entry costs. Impassable tiles are never entered.
#[derive(Clone, Copy, Debug)]
pub struct HexPathfinder<'a> {
    map: &'a TileMap,
}

impl<'a> HexPathfinder<'a> {
    pub fn new(map: &'a TileMap) -> Self {
        Self { map }
    }

    fn search(&self, from: Hex, budget: u32, goal: Option<Hex>) -> Search {
        let mut best: BTreeMap<Hex, u32> = BTreeMap::new();
        let mut came_from: BTreeMap<Hex, Hex> = BTreeMap::new();
        let mut heap = BinaryHeap::new();

        if self.map.contains(from) {
            best.insert(from, 0);
            heap.push(Reverse((0_u32, from)));
        }

        while let Some(Reverse((cost, hex))) = heap.pop() {
            if best.get(&hex).is_some_and(|&c| c < cost) {
                continue;
            }
            if Some(hex) == goal {
                break;
            }
            for next in self.map.neighbors(hex) {
                let Some(step) = self.map.get(next).and_then(|t| t.movement_cost()) else {
                    continue;
                };
                let next_cost = cost + step;
                if next_cost > budget {
                    continue;
                }
                if best.get(&next).is_some_and(|&c| c <= next_cost) {
                    continue;
                }
                best.insert(next, next_cost);
                came_from.insert(next, hex);
                heap.push(Reverse((next_cost, next)));
            }
        }

        Search { best, came_from }
    }
}

struct Search {
    best: BTreeMap<Hex, u32>,
    came_from: BTreeMap<Hex, Hex>,
}

impl Pathfinder for HexPathfinder<'_> {
    fn find_path(&self, from: Hex, to: Hex, budget: u32) -> Option<PathResult> {
        let search = self.search(from, budget, Some(to));
        let total_cost = *search.best.get(&to)?;

        let mut path = Vec::new();
        let mut cursor = to;
        while cursor != from {
            path.push(cursor);
            cursor = *search.came_from.get(&cursor)?;
        }
        path.reverse();
        Some(PathResult { path, total_cost })
    }

    fn reachable_tiles(&self, from: Hex, budget: u32) -> BTreeMap<Hex, u32> {
        self.search(from, budget, None).best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Feature, Terrain, Tile};

    #[test]
    fn one_movement_point_reaches_immediate_neighbors() {
        let map = TileMap::disc(Hex::ORIGIN, 3, Terrain::Plains);
        let reach = HexPathfinder::new(&map).reachable_tiles(Hex::ORIGIN, 1);
        assert_eq!(reach.len(), 7);
        assert_eq!(reach[&Hex::ORIGIN], 0);
        assert!(Hex::ORIGIN.neighbors().all(|n| reach[&n] == 1));
    }

    #[test]
    fn path_routes_around_expensive_tiles() {
        let mut map = TileMap::disc(Hex::ORIGIN, 3, Terrain::Plains);
        // Forested hill: entering costs 3, so the direct route totals 4.
        map.set(
            Hex::new(1, 0),
            Tile::new(Terrain::PlainsHill).with_feature(Feature::Forest),
        );
        let finder = HexPathfinder::new(&map);

        let result = finder.find_path(Hex::ORIGIN, Hex::new(2, 0), 5).unwrap();
        assert_eq!(result.total_cost, 3);
        assert_eq!(result.path.len(), 3);
        assert_eq!(result.path.last(), Some(&Hex::new(2, 0)));
        assert!(!result.path.contains(&Hex::new(1, 0)));
    }

    #[test]
    fn impassable_and_over_budget_targets_have_no_path() {
        let mut map = TileMap::disc(Hex::ORIGIN, 2, Terrain::Plains);
        map.set(Hex::new(1, 0), Tile::new(Terrain::Mountain));
        let finder = HexPathfinder::new(&map);

        assert!(finder.find_path(Hex::ORIGIN, Hex::new(1, 0), 10).is_none());
        // The mountain blocks the only two-step route.
        assert!(finder.find_path(Hex::ORIGIN, Hex::new(2, 0), 2).is_none());
        assert!(finder.find_path(Hex::ORIGIN, Hex::new(2, 0), 3).is_some());
    }

    #[test]
    fn larger_budget_never_loses_a_destination() {
        let mut map = TileMap::disc(Hex::ORIGIN, 3, Terrain::Grassland);
        map.set(Hex::new(0, 1), Tile::new(Terrain::GrasslandHill));
        let finder = HexPathfinder::new(&map);

        let small = finder.reachable_tiles(Hex::ORIGIN, 2);
        let large = finder.reachable_tiles(Hex::ORIGIN, 4);
        for (hex, cost) in small {
            assert_eq!(large.get(&hex), Some(&cost));
        }
    }
}
