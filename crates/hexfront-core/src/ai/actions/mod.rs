mod attack;
mod end_turn;
mod found_city;
mod move_unit;
mod set_production;

pub use attack::AttackAction;
pub use end_turn::EndTurnAction;
pub use found_city::FoundCityAction;
pub use move_unit::MoveAction;
pub use set_production::SetProductionAction;

use hexfront_protocol::UnitId;

use super::{
    action::AiEntity,
    context::{AiContext, UnitView},
};

/// The context player's own unit behind `entity`, if it is one.
fn own_unit<'c>(ctx: &'c AiContext<'_>, entity: AiEntity) -> Option<&'c UnitView> {
    let AiEntity::Unit(id) = entity else {
        return None;
    };
    find_own(ctx, id)
}

fn find_own<'c>(ctx: &'c AiContext<'_>, id: UnitId) -> Option<&'c UnitView> {
    ctx.my_units.iter().find(|u| u.id == id)
}

#[cfg(test)]
pub(crate) mod testing {
    use hexfront_protocol::{Hex, PlayerId};

    use crate::{
        map::TileMap,
        players::PlayerManager,
        rules::{load_rules, RulesSource},
        state::GameState,
        tile::Terrain,
    };

    /// Two players on a radius-4 plains disc, nobody placed yet.
    pub fn plains_state() -> GameState {
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        GameState::new(
            TileMap::disc(Hex::ORIGIN, 4, Terrain::Plains),
            PlayerManager::new(2, true),
            rules,
        )
    }

    pub const ME: PlayerId = PlayerId(0);
    pub const THEM: PlayerId = PlayerId(1);
}
