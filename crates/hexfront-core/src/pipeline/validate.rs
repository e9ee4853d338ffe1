use hexfront_protocol::{CityId, Command, Hex, PlayerId, TurnPhase, UnitId};

use crate::{
    city::City,
    pathfinding::{HexPathfinder, Pathfinder},
    state::GameState,
    unit::Unit,
};

use super::{ValidatedCommand, ValidationResult};

type Check<T> = Result<T, ValidationResult>;

/// Check `command` against `state` without touching it.
pub fn validate(command: &Command, state: &GameState) -> Check<ValidatedCommand> {
    let result = validate_inner(command, state);
    if let Err(rejection) = &result {
        tracing::debug!(
            kind = ?command.kind(),
            player = %command.player(),
            reason = rejection.error.as_deref().unwrap_or(""),
            "command rejected"
        );
    }
    result.map(|()| ValidatedCommand {
        command: command.clone(),
    })
}

/// [`validate`] flattened to a plain [`ValidationResult`].
pub fn check(command: &Command, state: &GameState) -> ValidationResult {
    match validate(command, state) {
        Ok(_) => ValidationResult::ok(),
        Err(rejection) => rejection,
    }
}

fn validate_inner(command: &Command, state: &GameState) -> Check<()> {
    let player = command.player();
    if player != state.current_player {
        return reject(format!("not {player}'s turn"));
    }

    match *command {
        Command::EndTurn { .. } => Ok(()),
        _ if state.phase != TurnPhase::PlayerAction => {
            reject(format!("cannot act during {:?}", state.phase))
        }
        Command::MoveUnit { unit, to, .. } => validate_move(state, player, unit, to),
        Command::Attack {
            attacker, defender, ..
        } => validate_attack(state, player, attacker, defender),
        Command::FoundCity { unit, .. } => validate_found_city(state, player, unit),
        Command::SetProduction { city, .. } => owned_city(state, player, city).map(|_| ()),
        Command::QueueProduction { city, .. } => {
            owned_city(state, player, city)?;
            match state.queue(city) {
                Some(queue) if queue.is_full() => reject("production queue is full"),
                _ => Ok(()),
            }
        }
    }
}

fn validate_move(state: &GameState, player: PlayerId, id: UnitId, to: Hex) -> Check<()> {
    let unit = owned_unit(state, player, id)?;
    if !unit.can_move() {
        return reject("unit has no movement left");
    }
    if unit.position == to {
        return reject("unit is already there");
    }
    if state.has_enemy_unit_at(to, player) {
        return reject("target tile is occupied by an enemy unit");
    }
    match HexPathfinder::new(&state.map).find_path(unit.position, to, unit.movement) {
        Some(path) if path.total_cost <= unit.movement => Ok(()),
        _ => reject("no path within remaining movement"),
    }
}

fn validate_attack(
    state: &GameState,
    player: PlayerId,
    attacker_id: UnitId,
    defender_id: UnitId,
) -> Check<()> {
    let attacker = owned_unit(state, player, attacker_id)?;
    let Some(defender) = state.units.get(defender_id) else {
        return reject("defender not found");
    };
    if attacker.movement == 0 {
        return reject("attacker has no movement left");
    }
    if attacker.combat_strength <= 0 {
        return reject("unit cannot attack");
    }
    if defender.owner == player {
        return reject("cannot attack own unit");
    }
    if !attacker.position.is_adjacent(defender.position) {
        return reject("defender is not adjacent");
    }
    Ok(())
}

fn validate_found_city(state: &GameState, player: PlayerId, id: UnitId) -> Check<()> {
    let unit = owned_unit(state, player, id)?;
    if !unit.is_settler(&state.rules) {
        return reject("only settlers can found cities");
    }
    match founding_site_error(state, unit.position) {
        Some(reason) => reject(reason),
        None => Ok(()),
    }
}

/// Why a city cannot be founded at `hex`, or `None` if it can.
pub fn founding_site_error(state: &GameState, hex: Hex) -> Option<&'static str> {
    let Some(tile) = state.map.get(hex) else {
        return Some("tile is off the map");
    };
    if tile.terrain.is_water() {
        return Some("cannot found a city on water");
    }
    if !tile.is_settleable() {
        return Some("tile is impassable");
    }
    if state.city_at(hex).is_some() {
        return Some("a city already occupies this tile");
    }
    None
}

fn owned_unit(state: &GameState, player: PlayerId, id: UnitId) -> Check<&Unit> {
    let Some(unit) = state.units.get(id) else {
        return reject("unit not found");
    };
    if unit.owner != player {
        return reject("unit belongs to another player");
    }
    Ok(unit)
}

fn owned_city(state: &GameState, player: PlayerId, id: CityId) -> Check<&City> {
    let Some(city) = state.cities.get(id) else {
        return reject("city not found");
    };
    if city.owner != player {
        return reject("city belongs to another player");
    }
    Ok(city)
}

fn reject<T>(reason: impl Into<String>) -> Check<T> {
    Err(ValidationResult::reject(reason))
}
