//! Tile model: terrain, feature and resource, with their yields, movement costs and
//! defensive value.

use serde::{Deserialize, Serialize};

/// Movement cost reported for tiles land units can never enter.
pub const IMPASSABLE: u32 = 9999;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Grassland,
    Plains,
    Desert,
    Tundra,
    Snow,
    GrasslandHill,
    PlainsHill,
    DesertHill,
    TundraHill,
    SnowHill,
    Mountain,
    Coast,
    Ocean,
    Lake,
}

impl Terrain {
    pub fn yields(self) -> Yields {
        use Terrain::*;
        match self {
            Grassland | Lake => Yields::new(2, 0, 0),
            Plains => Yields::new(1, 1, 0),
            Tundra | Coast | Ocean => Yields::new(1, 0, 0),
            GrasslandHill | PlainsHill | DesertHill | TundraHill | SnowHill => {
                Yields::new(0, 2, 0)
            }
            Desert | Snow | Mountain => Yields::default(),
        }
    }

    pub fn movement_cost(self) -> u32 {
        if self.is_passable() {
            if self.is_hill() {
                2
            } else {
                1
            }
        } else {
            IMPASSABLE
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, Terrain::Coast | Terrain::Ocean | Terrain::Lake)
    }

    pub fn is_hill(self) -> bool {
        matches!(
            self,
            Terrain::GrasslandHill
                | Terrain::PlainsHill
                | Terrain::DesertHill
                | Terrain::TundraHill
                | Terrain::SnowHill
        )
    }

    pub fn is_passable(self) -> bool {
        !self.is_water() && self != Terrain::Mountain
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Forest,
    Jungle,
    Marsh,
    Floodplains,
    Oasis,
    Ice,
}

impl Feature {
    pub fn yield_modifier(self) -> Yields {
        match self {
            Feature::Forest => Yields::new(0, 1, 0),
            Feature::Jungle => Yields::new(0, -1, 0),
            Feature::Marsh => Yields::new(-1, 0, 0),
            Feature::Floodplains => Yields::new(2, 0, 0),
            Feature::Oasis => Yields::new(3, 0, 1),
            Feature::Ice => Yields::default(),
        }
    }

    pub fn extra_movement(self) -> u32 {
        match self {
            Feature::Forest | Feature::Jungle | Feature::Marsh => 1,
            _ => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Cattle,
    Sheep,
    Fish,
    Stone,
    Wheat,
    Deer,
    Horses,
    Iron,
    Gold,
    Gems,
    Silk,
}

impl Resource {
    /// Unimproved bonus.
    pub fn bonus(self) -> Yields {
        match self {
            Resource::Fish | Resource::Wheat | Resource::Deer => Yields::new(1, 0, 0),
            Resource::Cattle
            | Resource::Sheep
            | Resource::Stone
            | Resource::Horses
            | Resource::Iron => Yields::new(0, 1, 0),
            Resource::Gold | Resource::Silk => Yields::new(0, 0, 2),
            Resource::Gems => Yields::new(0, 0, 3),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Yields {
    pub food: i32,
    pub production: i32,
    pub gold: i32,
}

impl Yields {
    pub const fn new(food: i32, production: i32, gold: i32) -> Self {
        Self {
            food,
            production,
            gold,
        }
    }

    fn floored(self) -> Self {
        Self::new(self.food.max(0), self.production.max(0), self.gold.max(0))
    }
}

impl std::ops::Add for Yields {
    type Output = Yields;

    fn add(self, rhs: Yields) -> Yields {
        Yields::new(
            self.food + rhs.food,
            self.production + rhs.production,
            self.gold + rhs.gold,
        )
    }
}

impl std::iter::Sum for Yields {
    fn sum<I: Iterator<Item = Yields>>(iter: I) -> Self {
        iter.fold(Yields::default(), |acc, y| acc + y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    #[serde(default)]
    pub feature: Option<Feature>,
    #[serde(default)]
    pub resource: Option<Resource>,
}

impl Tile {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            feature: None,
            resource: None,
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Yields of the tile; each component floors at zero.
    pub fn yields(&self) -> Yields {
        let feature = self.feature.map(Feature::yield_modifier).unwrap_or_default();
        let resource = self.resource.map(Resource::bonus).unwrap_or_default();
        (self.terrain.yields() + feature + resource).floored()
    }

    /// Cost to enter, or `None` for impassable tiles.
    pub fn movement_cost(&self) -> Option<u32> {
        if !self.terrain.is_passable() {
            return None;
        }
        let extra = self.feature.map(Feature::extra_movement).unwrap_or(0);
        Some(self.terrain.movement_cost() + extra)
    }

    /// Additive defense fraction granted to a unit standing here: hills +0.25, forest +0.25.
    pub fn defense_modifier(&self) -> f64 {
        let mut modifier = 0.0;
        if self.terrain.is_hill() {
            modifier += 0.25;
        }
        if self.feature == Some(Feature::Forest) {
            modifier += 0.25;
        }
        modifier
    }

    /// Land a city can be founded on: not water, not impassable.
    pub fn is_settleable(&self) -> bool {
        !self.terrain.is_water() && self.terrain.is_passable()
    }
}
