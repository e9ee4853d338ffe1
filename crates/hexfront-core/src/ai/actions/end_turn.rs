use hexfront_protocol::{Command, CommandKind};

use crate::ai::{
    action::{ActionDefinition, AiEntity, EntityKind},
    context::AiContext,
};

const NOTHING_LEFT: f64 = 100.0;
const STILL_BUSY: f64 = 1.0;

/// Pass the turn. Only attractive once no unit has anything left to do.
pub struct EndTurnAction;

impl ActionDefinition for EndTurnAction {
    fn id(&self) -> &'static str {
        "end_turn"
    }

    fn command_kind(&self) -> CommandKind {
        CommandKind::EndTurn
    }

    fn applicable_to(&self) -> &'static [EntityKind] {
        &[EntityKind::Player]
    }

    fn generate_candidates(&self, ctx: &AiContext<'_>, _entity: AiEntity) -> Vec<Command> {
        vec![Command::EndTurn { player: ctx.player }]
    }

    fn score_candidate(&self, ctx: &AiContext<'_>, _candidate: &Command) -> f64 {
        if ctx.my_units.iter().any(|u| ctx.capabilities(u).any()) {
            STILL_BUSY
        } else {
            NOTHING_LEFT
        }
    }
}
