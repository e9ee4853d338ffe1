use hexfront_protocol::{
    Buildable, CityId, Command, Event, EventKind, Hex, PlayerId, TurnPhase, UnitId,
};

use crate::{
    city::City,
    clock::Clock,
    combat::{calculate_combat, CombatInput},
    pathfinding::{HexPathfinder, Pathfinder},
    production::{advance_production, apply_growth, ProductionQueue},
    state::GameState,
};

use super::{SimError, ValidatedCommand};

/// Apply a validated command. All events from one call share a timestamp.
pub fn execute(
    validated: ValidatedCommand,
    state: &mut GameState,
    clock: &dyn Clock,
) -> Result<Vec<Event>, SimError> {
    let mut exec = Executor {
        state,
        now: clock.now_ms(),
        events: Vec::new(),
    };
    match validated.into_command() {
        Command::MoveUnit { unit, to, .. } => exec.move_unit(unit, to)?,
        Command::Attack {
            attacker, defender, ..
        } => exec.attack(attacker, defender)?,
        Command::FoundCity { player, unit } => exec.found_city(player, unit)?,
        Command::SetProduction { city, item, .. } => exec.set_production(city, item)?,
        Command::QueueProduction { city, item, .. } => exec.queue_production(city, item)?,
        Command::EndTurn { player } => exec.end_turn(player)?,
    }
    Ok(exec.events)
}

struct Executor<'a> {
    state: &'a mut GameState,
    now: u64,
    events: Vec<Event>,
}

impl Executor<'_> {
    fn emit(&mut self, kind: EventKind) {
        self.events.push(Event::new(self.now, kind));
    }

    fn move_unit(&mut self, id: UnitId, to: Hex) -> Result<(), SimError> {
        let unit = self.state.units.get(id).ok_or(SimError::UnknownUnit(id))?;
        let from = unit.position;
        let path = HexPathfinder::new(&self.state.map)
            .find_path(from, to, unit.movement)
            .ok_or(SimError::NoPathForValidatedMove)?;

        let unit = self
            .state
            .units
            .get_mut(id)
            .ok_or(SimError::UnknownUnit(id))?;
        unit.spend_movement(path.total_cost);
        unit.position = to;
        let (player, movement_left) = (unit.owner, unit.movement);

        self.emit(EventKind::UnitMoved {
            unit: id,
            player,
            from,
            to,
            path: path.path,
            cost: path.total_cost,
            movement_left,
        });
        Ok(())
    }

    fn attack(&mut self, attacker_id: UnitId, defender_id: UnitId) -> Result<(), SimError> {
        let attacker = self
            .state
            .units
            .get(attacker_id)
            .ok_or(SimError::UnknownUnit(attacker_id))?;
        let defender = self
            .state
            .units
            .get(defender_id)
            .ok_or(SimError::UnknownUnit(defender_id))?;
        let input = CombatInput::between(attacker, defender, &self.state.map);
        let outcome = calculate_combat(input, &self.state.rules.combat);
        let at = defender.position;

        let (attacker, defender) = self
            .state
            .units
            .get2_mut(attacker_id, defender_id)
            .ok_or(SimError::UnknownUnit(defender_id))?;
        attacker.health -= outcome.attacker_damage;
        defender.health -= outcome.defender_damage;
        attacker.exhaust();
        let (attacker_player, attacker_health) = (attacker.owner, attacker.health);
        let (defender_player, defender_health) = (defender.owner, defender.health);

        self.emit(EventKind::CombatResolved {
            attacker: attacker_id,
            defender: defender_id,
            attacker_player,
            defender_player,
            attacker_damage: outcome.attacker_damage,
            defender_damage: outcome.defender_damage,
            attacker_health,
            defender_health,
            at,
        });
        tracing::debug!(
            %attacker_id,
            %defender_id,
            attacker_damage = outcome.attacker_damage,
            defender_damage = outcome.defender_damage,
            "combat resolved"
        );

        if !outcome.defender_survives {
            self.destroy_unit(defender_id)?;
        }
        if !outcome.attacker_survives {
            self.destroy_unit(attacker_id)?;
        }
        Ok(())
    }

    fn destroy_unit(&mut self, id: UnitId) -> Result<(), SimError> {
        let unit = self
            .state
            .units
            .remove(id)
            .ok_or(SimError::UnknownUnit(id))?;
        tracing::info!(unit = %id, player = %unit.owner, at = %unit.position, "unit destroyed");
        self.emit(EventKind::UnitDestroyed {
            unit: id,
            player: unit.owner,
            at: unit.position,
        });
        self.check_elimination(unit.owner);
        Ok(())
    }

    fn check_elimination(&mut self, player: PlayerId) {
        if self.state.check_elimination(player) {
            tracing::info!(%player, "player eliminated");
            self.emit(EventKind::PlayerEliminated { player });
        }
    }

    fn found_city(&mut self, player: PlayerId, settler: UnitId) -> Result<(), SimError> {
        let unit = self
            .state
            .units
            .remove(settler)
            .ok_or(SimError::UnknownUnit(settler))?;
        let at = unit.position;
        self.emit(EventKind::UnitDestroyed {
            unit: settler,
            player,
            at,
        });

        let city = self.state.cities.insert(City::new(player, at));
        let claimed = self
            .state
            .territory
            .initialize_city(city, at, &self.state.map);
        tracing::info!(%city, %player, %at, tiles = claimed.len(), "city founded");
        self.emit(EventKind::CityFounded {
            city,
            player,
            at,
            claimed,
        });
        self.check_elimination(player);
        Ok(())
    }

    fn set_production(&mut self, id: CityId, item: Buildable) -> Result<(), SimError> {
        let cost = self.state.rules.cost(item);
        let city = self
            .state
            .cities
            .get_mut(id)
            .ok_or(SimError::UnknownCity(id))?;
        city.set_production(item, cost);
        let player = city.owner;
        self.emit(EventKind::ProductionChanged {
            city: id,
            player,
            item,
            queued: false,
        });
        Ok(())
    }

    fn queue_production(&mut self, id: CityId, item: Buildable) -> Result<(), SimError> {
        let cost = self.state.rules.cost(item);
        let city = self
            .state
            .cities
            .get_mut(id)
            .ok_or(SimError::UnknownCity(id))?;
        let player = city.owner;
        if city.is_idle() {
            city.set_production(item, cost);
        } else {
            self.state
                .queue_mut(id)
                .push(item)
                .map_err(|_| SimError::QueueFull(id))?;
        }
        self.emit(EventKind::ProductionChanged {
            city: id,
            player,
            item,
            queued: true,
        });
        Ok(())
    }

    /// `PlayerAction -> TurnEnd -> TurnStart -> PlayerAction` for the ending player.
    fn end_turn(&mut self, ending: PlayerId) -> Result<(), SimError> {
        if self.state.players.get(ending).is_none() {
            return Err(SimError::UnknownPlayer(ending));
        }

        self.state.phase = TurnPhase::TurnEnd;
        let cities: Vec<CityId> = self.state.cities_of(ending).map(|(id, _)| id).collect();
        for city in cities {
            self.process_city(city)?;
        }
        self.emit(EventKind::TurnEnded {
            player: ending,
            turn: self.state.turn,
        });

        // With nobody left the seat stays with the ending player.
        let (next, wrapped) = self
            .state
            .players
            .next_active_after(ending)
            .unwrap_or((ending, true));
        if wrapped {
            self.state.turn += 1;
        }
        self.state.current_player = next;

        self.state.phase = TurnPhase::TurnStart;
        for (_, unit) in self.state.units.iter_ordered_mut() {
            if unit.owner == next {
                unit.restore_movement();
            }
        }
        tracing::info!(player = %next, turn = self.state.turn, "turn started");
        self.emit(EventKind::TurnStarted {
            player: next,
            turn: self.state.turn,
        });
        self.state.phase = TurnPhase::PlayerAction;
        Ok(())
    }

    /// Production first, then growth, both fed by the city's territory yields.
    fn process_city(&mut self, id: CityId) -> Result<(), SimError> {
        let yields = self.state.territory.yields(id, &self.state.map);
        let per_turn = yields.production.max(0) as u32;

        let city = self
            .state
            .cities
            .get_mut(id)
            .ok_or(SimError::UnknownCity(id))?;
        let step = match self.state.queues.get_mut(&id) {
            Some(queue) => advance_production(city, per_turn, queue, &self.state.rules),
            None => {
                let mut empty = ProductionQueue::new(0);
                advance_production(city, per_turn, &mut empty, &self.state.rules)
            }
        };
        let (player, center) = (city.owner, city.position);

        if let Some(item) = step.completed {
            tracing::info!(city = %id, %player, %item, "production completed");
            self.emit(EventKind::ProductionCompleted {
                city: id,
                player,
                item,
            });
            let at = self.state.spawn_hex(center);
            let unit_type = item.unit_type();
            let unit = self.state.spawn_unit(unit_type, player, at);
            self.emit(EventKind::UnitSpawned {
                unit,
                city: id,
                player,
                unit_type,
                at,
            });
        }
        if let Some(item) = step.started {
            self.emit(EventKind::ProductionChanged {
                city: id,
                player,
                item,
                queued: false,
            });
        }

        let city = self
            .state
            .cities
            .get_mut(id)
            .ok_or(SimError::UnknownCity(id))?;
        if apply_growth(city, yields.food, &self.state.rules.growth) {
            let (population, food_stockpile) = (city.population, city.food_stockpile);
            self.emit(EventKind::PopulationGrowth {
                city: id,
                player,
                population,
                food_stockpile,
            });
        }
        Ok(())
    }
}
