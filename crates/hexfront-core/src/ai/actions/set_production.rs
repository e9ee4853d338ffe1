use hexfront_protocol::{Buildable, Command, CommandKind};

use crate::ai::{
    action::{ActionDefinition, AiEntity, EntityKind},
    context::AiContext,
};

/// Pick what a city builds next.
pub struct SetProductionAction;

impl ActionDefinition for SetProductionAction {
    fn id(&self) -> &'static str {
        "set_production"
    }

    fn command_kind(&self) -> CommandKind {
        CommandKind::SetProduction
    }

    fn applicable_to(&self) -> &'static [EntityKind] {
        &[EntityKind::City]
    }

    fn generate_candidates(&self, ctx: &AiContext<'_>, entity: AiEntity) -> Vec<Command> {
        let AiEntity::City(id) = entity else {
            return Vec::new();
        };
        if ctx.city(id).is_none() {
            return Vec::new();
        }
        Buildable::ALL
            .into_iter()
            .map(|item| Command::SetProduction {
                player: ctx.player,
                city: id,
                item,
            })
            .collect()
    }

    fn score_candidate(&self, ctx: &AiContext<'_>, candidate: &Command) -> f64 {
        let Command::SetProduction { item, .. } = *candidate else {
            return 0.0;
        };
        match item {
            Buildable::Settler if ctx.my_cities.len() < ctx.rules.ai.settler_city_target => 80.0,
            Buildable::Settler => 40.0,
            Buildable::Warrior => 50.0,
            Buildable::Scout => 30.0,
        }
    }
}
