use hexfront_protocol::{Command, CommandKind};

use crate::{
    ai::{
        action::{ActionDefinition, AiEntity, EntityKind},
        context::AiContext,
        registry::clamp_score,
    },
    combat::{calculate_combat, defense_modifier_at, CombatInput},
};

use super::own_unit;

const BASE: f64 = 50.0;
const KILL_BONUS: f64 = 30.0;
const DEATH_PENALTY: f64 = 40.0;
const MAX_RATIO_BONUS: f64 = 20.0;
const UNHARMED_BONUS: f64 = 15.0;

/// Strike an adjacent enemy, rated on the predicted exchange.
pub struct AttackAction;

impl ActionDefinition for AttackAction {
    fn id(&self) -> &'static str {
        "attack"
    }

    fn command_kind(&self) -> CommandKind {
        CommandKind::Attack
    }

    fn applicable_to(&self) -> &'static [EntityKind] {
        &[EntityKind::Unit]
    }

    fn generate_candidates(&self, ctx: &AiContext<'_>, entity: AiEntity) -> Vec<Command> {
        let Some(unit) = own_unit(ctx, entity) else {
            return Vec::new();
        };
        if !unit.combat_ready {
            return Vec::new();
        }
        ctx.adjacent_enemies(unit.position)
            .map(|enemy| Command::Attack {
                player: ctx.player,
                attacker: unit.id,
                defender: enemy.id,
            })
            .collect()
    }

    fn score_candidate(&self, ctx: &AiContext<'_>, candidate: &Command) -> f64 {
        let Command::Attack {
            attacker, defender, ..
        } = *candidate
        else {
            return 0.0;
        };
        let (Some(attacker), Some(defender)) = (ctx.unit(attacker), ctx.unit(defender)) else {
            return 0.0;
        };

        let input = CombatInput {
            attacker_strength: attacker.combat_strength,
            defender_strength: defender.combat_strength,
            attacker_health: attacker.health,
            defender_health: defender.health,
            defense_modifier: defense_modifier_at(ctx.tile_map, defender.position),
        };
        let outcome = calculate_combat(input, &ctx.rules.combat);

        let mut score = BASE;
        if !outcome.defender_survives {
            score += KILL_BONUS;
        }
        if !outcome.attacker_survives {
            score -= DEATH_PENALTY;
        }
        score += if outcome.attacker_damage == 0 {
            UNHARMED_BONUS
        } else {
            let ratio = f64::from(outcome.defender_damage) / f64::from(outcome.attacker_damage);
            (10.0 * ratio).round().min(MAX_RATIO_BONUS)
        };
        clamp_score(score)
    }
}
