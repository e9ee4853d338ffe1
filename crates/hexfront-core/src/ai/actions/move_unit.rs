use hexfront_protocol::{Command, CommandKind};

use crate::{
    ai::{
        action::{ActionDefinition, AiEntity, EntityKind},
        context::AiContext,
    },
    pathfinding::Pathfinder,
};

use super::own_unit;

const MOVE_SCORE: f64 = 10.0;

/// Step to any tile reachable this turn.
pub struct MoveAction;

impl ActionDefinition for MoveAction {
    fn id(&self) -> &'static str {
        "move_unit"
    }

    fn command_kind(&self) -> CommandKind {
        CommandKind::MoveUnit
    }

    fn applicable_to(&self) -> &'static [EntityKind] {
        &[EntityKind::Unit]
    }

    fn generate_candidates(&self, ctx: &AiContext<'_>, entity: AiEntity) -> Vec<Command> {
        let Some(unit) = own_unit(ctx, entity) else {
            return Vec::new();
        };
        if unit.movement == 0 {
            return Vec::new();
        }
        ctx.pathfinder
            .reachable_tiles(unit.position, unit.movement)
            .into_keys()
            .filter(|&hex| hex != unit.position && !ctx.has_enemy_at(hex))
            .map(|to| Command::MoveUnit {
                player: ctx.player,
                unit: unit.id,
                to,
            })
            .collect()
    }

    fn score_candidate(&self, _ctx: &AiContext<'_>, _candidate: &Command) -> f64 {
        MOVE_SCORE
    }
}
