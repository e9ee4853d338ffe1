use serde::{Deserialize, Serialize};

use hexfront_protocol::{Buildable, Hex, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub owner: PlayerId,
    pub position: Hex,
    pub population: u32,
    pub food_stockpile: i32,
    /// Item under construction; `None` with `progress == cost == 0` when idle.
    pub current_item: Option<Buildable>,
    pub progress: u32,
    pub cost: u32,
}

impl City {
    pub fn new(owner: PlayerId, position: Hex) -> Self {
        Self {
            owner,
            position,
            population: 1,
            food_stockpile: 0,
            current_item: None,
            progress: 0,
            cost: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.current_item.is_none()
    }

    /// Switch production. Progress survives only when the item is unchanged.
    pub fn set_production(&mut self, item: Buildable, cost: u32) {
        if self.current_item != Some(item) {
            self.progress = 0;
        }
        self.current_item = Some(item);
        self.cost = cost;
    }

    pub fn clear_production(&mut self) {
        self.current_item = None;
        self.progress = 0;
        self.cost = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_items_discards_progress() {
        let mut city = City::new(PlayerId(0), Hex::ORIGIN);
        assert!(city.is_idle());

        city.set_production(Buildable::Warrior, 40);
        city.progress = 25;
        city.set_production(Buildable::Warrior, 40);
        assert_eq!(city.progress, 25);

        city.set_production(Buildable::Scout, 30);
        assert_eq!(city.progress, 0);
        assert_eq!(city.cost, 30);
    }
}
