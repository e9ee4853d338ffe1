use hexfront_protocol::{Command, CommandKind};

use crate::ai::{
    action::{ActionDefinition, AiEntity, EntityKind},
    context::AiContext,
};

use super::own_unit;

const FOUND_SCORE: f64 = 70.0;

pub struct FoundCityAction;

impl ActionDefinition for FoundCityAction {
    fn id(&self) -> &'static str {
        "found_city"
    }

    fn command_kind(&self) -> CommandKind {
        CommandKind::FoundCity
    }

    fn applicable_to(&self) -> &'static [EntityKind] {
        &[EntityKind::Unit]
    }

    fn generate_candidates(&self, ctx: &AiContext<'_>, entity: AiEntity) -> Vec<Command> {
        match own_unit(ctx, entity) {
            Some(unit) if ctx.can_found_city(unit) => vec![Command::FoundCity {
                player: ctx.player,
                unit: unit.id,
            }],
            _ => Vec::new(),
        }
    }

    fn score_candidate(&self, _ctx: &AiContext<'_>, _candidate: &Command) -> f64 {
        FOUND_SCORE
    }
}

#[cfg(test)]
mod tests {
    use hexfront_protocol::{Hex, UnitType};

    use super::*;
    use crate::{
        ai::actions::testing::{plains_state, ME},
        city::City,
        tile::{Terrain, Tile},
    };

    #[test]
    fn only_settlers_on_open_land() {
        let mut state = plains_state();
        state.map.set(Hex::new(2, 0), Tile::new(Terrain::Lake));
        let settler = state.spawn_unit(UnitType::Settler, ME, Hex::ORIGIN);
        let wet = state.spawn_unit(UnitType::Settler, ME, Hex::new(2, 0));
        let crowded = state.spawn_unit(UnitType::Settler, ME, Hex::new(0, 2));
        let warrior = state.spawn_unit(UnitType::Warrior, ME, Hex::ORIGIN);
        state.cities.insert(City::new(ME, Hex::new(0, 2)));

        let ctx = AiContext::build(&state, ME);
        let count = |id| {
            FoundCityAction
                .generate_candidates(&ctx, AiEntity::Unit(id))
                .len()
        };
        assert_eq!(count(settler), 1);
        assert_eq!(count(wet), 0);
        assert_eq!(count(crowded), 0);
        assert_eq!(count(warrior), 0);
    }
}
