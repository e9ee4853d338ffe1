use hexfront_protocol::{CityId, Command, Event, PlayerId, UnitId};

use crate::{
    game::{CommandOutcome, GameEngine},
    pipeline::SimError,
};

use super::{
    action::AiEntity,
    context::AiContext,
    decision::{decide, ScoredCandidate},
    registry::ActionRegistry,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    pub commands: Vec<Command>,
    pub events: Vec<Event>,
}

/// Drives one seat through a whole turn: units first, then idle cities, then end turn.
pub struct AiPlayer<'r> {
    registry: &'r ActionRegistry,
}

impl<'r> AiPlayer<'r> {
    pub fn new(registry: &'r ActionRegistry) -> Self {
        Self { registry }
    }

    /// Play out `player`'s turn. Does nothing if it is not that player's turn.
    pub fn take_turn(
        &self,
        engine: &mut GameEngine,
        player: PlayerId,
    ) -> Result<TurnReport, SimError> {
        let mut report = TurnReport::default();
        if engine.state().current_player != player {
            return Ok(report);
        }

        let units: Vec<UnitId> = engine.state().units_of(player).map(|(id, _)| id).collect();
        let max_steps = engine.state().rules.ai.max_steps_per_unit;
        for unit in units {
            for _ in 0..max_steps {
                let Some(choice) = self.next_unit_step(engine, player, unit) else {
                    break;
                };
                if !self.submit(engine, choice.command, &mut report)? {
                    break;
                }
            }
        }

        let idle: Vec<CityId> = engine
            .state()
            .cities_of(player)
            .filter(|(_, city)| city.is_idle())
            .map(|(id, _)| id)
            .collect();
        for city in idle {
            let choice = {
                let ctx = AiContext::build(engine.state(), player);
                decide(self.registry, &ctx, AiEntity::City(city))
            };
            if let Some(choice) = choice {
                self.submit(engine, choice.command, &mut report)?;
            }
        }

        self.submit(engine, Command::EndTurn { player }, &mut report)?;
        Ok(report)
    }

    /// Best command for `unit` right now, or `None` once ending the turn ranks at least as
    /// high or the unit is gone.
    fn next_unit_step(
        &self,
        engine: &GameEngine,
        player: PlayerId,
        unit: UnitId,
    ) -> Option<ScoredCandidate> {
        let ctx = AiContext::build(engine.state(), player);
        if !ctx.my_units.iter().any(|u| u.id == unit) {
            return None;
        }
        let choice = decide(self.registry, &ctx, AiEntity::Unit(unit))?;
        let pass = decide(self.registry, &ctx, AiEntity::Player)
            .map_or(f64::NEG_INFINITY, |c| c.score);
        (choice.score > pass).then_some(choice)
    }

    fn submit(
        &self,
        engine: &mut GameEngine,
        command: Command,
        report: &mut TurnReport,
    ) -> Result<bool, SimError> {
        match engine.apply_command(command.clone())? {
            CommandOutcome::Executed(events) => {
                report.commands.push(command);
                report.events.extend(events);
                Ok(true)
            }
            CommandOutcome::Rejected(rejection) => {
                tracing::warn!(?command, reason = ?rejection.error, "ai command rejected");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hexfront_protocol::{Buildable, CommandKind, EventKind, Hex, UnitType};

    use super::*;
    use crate::{
        ai::actions::testing::{plains_state, ME, THEM},
        clock::FixedClock,
    };

    #[test]
    fn settler_founds_then_city_picks_production_then_turn_ends() {
        let mut state = plains_state();
        state.spawn_unit(UnitType::Settler, ME, Hex::ORIGIN);
        state.spawn_unit(UnitType::Warrior, THEM, Hex::new(4, 0));
        let mut engine = GameEngine::new(state, Box::new(FixedClock(0)));
        let registry = ActionRegistry::standard();

        let report = AiPlayer::new(&registry).take_turn(&mut engine, ME).unwrap();
        let kinds: Vec<_> = report.commands.iter().map(Command::kind).collect();
        assert_eq!(
            kinds,
            vec![
                CommandKind::FoundCity,
                CommandKind::SetProduction,
                CommandKind::EndTurn
            ]
        );

        let (_, city) = engine.state().city_at(Hex::ORIGIN).unwrap();
        assert_eq!(city.current_item, Some(Buildable::Settler));
        assert_eq!(engine.state().current_player, THEM);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e.kind, EventKind::TurnStarted { player: THEM, .. })));
    }

    #[test]
    fn unit_steps_are_bounded() {
        let mut state = plains_state();
        state.spawn_unit(UnitType::Scout, ME, Hex::ORIGIN);
        state.spawn_unit(UnitType::Warrior, THEM, Hex::new(-4, 4));
        let mut engine = GameEngine::new(state, Box::new(FixedClock(0)));
        let registry = ActionRegistry::standard();

        let report = AiPlayer::new(&registry).take_turn(&mut engine, ME).unwrap();
        let moves = report
            .commands
            .iter()
            .filter(|c| matches!(c, Command::MoveUnit { .. }))
            .count();
        assert!(moves >= 1);
        assert!(moves <= engine.state().rules.ai.max_steps_per_unit);
        assert!(matches!(report.commands.last(), Some(Command::EndTurn { .. })));
    }

    #[test]
    fn not_my_turn_is_a_no_op() {
        let state = plains_state();
        let mut engine = GameEngine::new(state, Box::new(FixedClock(0)));
        let registry = ActionRegistry::standard();
        let report = AiPlayer::new(&registry).take_turn(&mut engine, THEM).unwrap();
        assert_eq!(report, TurnReport::default());
    }
}
