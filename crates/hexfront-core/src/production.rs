use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hexfront_protocol::Buildable;

use crate::{
    city::City,
    rules::{GrowthRules, ProductionRules, Rules},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("production queue is full ({limit} items)")]
pub struct QueueFull {
    pub limit: usize,
}

/// Bounded FIFO of items a city builds after its current one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionQueue {
    items: VecDeque<Buildable>,
    limit: usize,
}

impl ProductionQueue {
    pub fn new(limit: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn push(&mut self, item: Buildable) -> Result<(), QueueFull> {
        if self.is_full() {
            return Err(QueueFull { limit: self.limit });
        }
        self.items.push_back(item);
        Ok(())
    }

    pub fn pop_front(&mut self) -> Option<Buildable> {
        self.items.pop_front()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Buildable> + '_ {
        self.items.iter().copied()
    }
}

/// What one turn of production did to a city.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProductionStep {
    pub completed: Option<Buildable>,
    /// Item popped from the queue after a completion.
    pub started: Option<Buildable>,
}

/// Add `per_turn` to the current item and complete it if paid for.
///
/// On completion the city resets to idle, then the queue head (if any) becomes current with a
/// carry-in of the overflow, capped by `ProductionRules::overflow_cap`. Idle cities accumulate
/// nothing.
pub fn advance_production(
    city: &mut City,
    per_turn: u32,
    queue: &mut ProductionQueue,
    rules: &Rules,
) -> ProductionStep {
    let Some(item) = city.current_item else {
        return ProductionStep::default();
    };

    city.progress = city.progress.saturating_add(per_turn);
    if city.progress < city.cost {
        return ProductionStep::default();
    }

    let overflow = city.progress - city.cost;
    city.clear_production();

    let started = queue.pop_front();
    if let Some(next) = started {
        let next_cost = rules.cost(next);
        city.set_production(next, next_cost);
        city.progress = overflow.min(rules.production.overflow_cap(next_cost));
    }

    ProductionStep {
        completed: Some(item),
        started,
    }
}

/// Apply one turn of food. Returns `true` if the population grew.
///
/// Population grows by at most one per turn, however large the surplus.
pub fn apply_growth(city: &mut City, food: i32, rules: &GrowthRules) -> bool {
    let upkeep = city.population as i32 * rules.food_per_pop;
    city.food_stockpile = (city.food_stockpile + food - upkeep).max(0);

    let threshold = rules.threshold(city.population);
    if city.food_stockpile < threshold {
        return false;
    }
    city.population += 1;
    city.food_stockpile -= threshold;
    true
}

/// Cumulative turn on which the current item and then each queued item completes.
///
/// Mirrors `advance_production`: one completion per turn at most, and each queued item
/// starts with the previous overflow capped to its own cap. `None` when work remains but
/// `per_turn` is zero.
pub fn calculate_queue_turns(
    progress: u32,
    cost: u32,
    per_turn: u32,
    queued_costs: &[u32],
    rules: &ProductionRules,
) -> Option<Vec<u32>> {
    let mut costs = std::iter::once(cost)
        .chain(queued_costs.iter().copied())
        .peekable();
    let mut turns = Vec::with_capacity(queued_costs.len() + 1);
    let mut elapsed = 0_u32;
    let mut progress = progress;

    while let Some(item_cost) = costs.next() {
        let remaining = item_cost.saturating_sub(progress);
        let needed = match remaining {
            0 => 1,
            _ if per_turn == 0 => return None,
            _ => remaining.div_ceil(per_turn),
        };
        elapsed += needed;
        turns.push(elapsed);

        let overflow = (progress + needed * per_turn).saturating_sub(item_cost);
        progress = match costs.peek() {
            Some(&next) => overflow.min(rules.overflow_cap(next)),
            None => 0,
        };
    }

    Some(turns)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use hexfront_protocol::{Hex, PlayerId};

    use super::*;
    use crate::rules::{load_rules, RulesSource};

    fn rules() -> Rules {
        load_rules(RulesSource::Embedded).expect("rules load")
    }

    fn building(item: Buildable, progress: u32, rules: &Rules) -> City {
        let mut city = City::new(PlayerId(0), Hex::ORIGIN);
        city.set_production(item, rules.cost(item));
        city.progress = progress;
        city
    }

    #[test]
    fn warrior_at_33_completes_with_seven_production() {
        let rules = rules();
        let mut city = building(Buildable::Warrior, 33, &rules);
        let mut queue = ProductionQueue::new(rules.production.queue_limit);

        let step = advance_production(&mut city, 7, &mut queue, &rules);
        assert_eq!(step.completed, Some(Buildable::Warrior));
        assert_eq!(step.started, None);
        assert_eq!((city.current_item, city.progress, city.cost), (None, 0, 0));
    }

    #[test]
    fn idle_city_accumulates_nothing() {
        let rules = rules();
        let mut city = City::new(PlayerId(0), Hex::ORIGIN);
        let mut queue = ProductionQueue::new(5);
        let step = advance_production(&mut city, 12, &mut queue, &rules);
        assert_eq!(step, ProductionStep::default());
        assert_eq!(city.progress, 0);
    }

    #[test]
    fn overflow_into_next_item_is_capped() {
        let rules = rules();
        // 30 progress on a 30-cost scout plus 40 production: 40 overflow, warrior cap is 20.
        let mut city = building(Buildable::Scout, 30, &rules);
        let mut queue = ProductionQueue::new(5);
        queue.push(Buildable::Warrior).unwrap();

        let step = advance_production(&mut city, 40, &mut queue, &rules);
        assert_eq!(step.completed, Some(Buildable::Scout));
        assert_eq!(step.started, Some(Buildable::Warrior));
        assert_eq!(city.current_item, Some(Buildable::Warrior));
        assert_eq!(city.cost, 40);
        assert_eq!(city.progress, 20);
        assert!(queue.is_empty());
    }

    #[test]
    fn small_overflow_carries_in_full() {
        let rules = rules();
        let mut city = building(Buildable::Warrior, 38, &rules);
        let mut queue = ProductionQueue::new(5);
        queue.push(Buildable::Settler).unwrap();

        advance_production(&mut city, 7, &mut queue, &rules);
        assert_eq!(city.current_item, Some(Buildable::Settler));
        assert_eq!(city.progress, 5);
    }

    #[test]
    fn queue_rejects_pushes_past_limit() {
        let mut queue = ProductionQueue::new(2);
        queue.push(Buildable::Warrior).unwrap();
        queue.push(Buildable::Scout).unwrap();
        assert_eq!(queue.push(Buildable::Settler), Err(QueueFull { limit: 2 }));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![Buildable::Warrior, Buildable::Scout]);
    }

    #[test]
    fn growth_consumes_threshold() {
        let growth = GrowthRules::default();
        let mut city = City::new(PlayerId(0), Hex::ORIGIN);
        city.food_stockpile = 18;

        // net = 7 - 2 = 5 -> 23 >= 21
        assert!(apply_growth(&mut city, 7, &growth));
        assert_eq!(city.population, 2);
        assert_eq!(city.food_stockpile, 2);
    }

    #[test]
    fn starvation_floors_stockpile_at_zero() {
        let growth = GrowthRules::default();
        let mut city = City::new(PlayerId(0), Hex::ORIGIN);
        city.population = 4;
        city.food_stockpile = 3;
        assert!(!apply_growth(&mut city, 1, &growth));
        assert_eq!(city.food_stockpile, 0);
        assert_eq!(city.population, 4);
    }

    #[test]
    fn queue_turns_are_cumulative() {
        let production = ProductionRules::default();
        // Warrior 33/40 at 7: 1 turn. Scout 30 from 0 at 7: 5 more turns.
        assert_eq!(
            calculate_queue_turns(33, 40, 7, &[30], &production),
            Some(vec![1, 6])
        );
        // 30/turn: 20 overflow is capped to 15 for the scout, then 15 carries into the warrior.
        assert_eq!(
            calculate_queue_turns(30, 40, 30, &[30, 40], &production),
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn queue_turns_without_production() {
        let production = ProductionRules::default();
        assert_eq!(calculate_queue_turns(5, 40, 0, &[], &production), None);
        assert_eq!(calculate_queue_turns(40, 40, 0, &[], &production), Some(vec![1]));
    }

    proptest! {
        #[test]
        fn prop_carry_in_never_exceeds_cap(
            progress in 0..200u32,
            per_turn in 0..200u32,
            current in 0..3usize,
            next in 0..3usize,
        ) {
            let rules = rules();
            let mut city = building(Buildable::ALL[current], progress, &rules);
            let mut queue = ProductionQueue::new(5);
            queue.push(Buildable::ALL[next]).unwrap();

            let step = advance_production(&mut city, per_turn, &mut queue, &rules);
            if step.started.is_some() {
                let cap = rules.production.overflow_cap(city.cost);
                prop_assert!(city.progress <= cap);
            }
        }

        #[test]
        fn prop_growth_is_at_most_one_and_never_negative(
            population in 1..30u32,
            stockpile in 0..500i32,
            food in 0..500i32,
        ) {
            let growth = GrowthRules::default();
            let mut city = City::new(PlayerId(0), Hex::ORIGIN);
            city.population = population;
            city.food_stockpile = stockpile;

            let grew = apply_growth(&mut city, food, &growth);
            prop_assert!(city.food_stockpile >= 0);
            prop_assert_eq!(city.population, population + u32::from(grew));
        }
    }
}
