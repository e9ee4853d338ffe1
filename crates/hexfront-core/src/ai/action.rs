use hexfront_protocol::{CityId, Command, CommandKind, UnitId};

use super::context::AiContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Unit,
    City,
    Player,
}

/// The thing an AI decision is being made for. `Player` means the context's own player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiEntity {
    Unit(UnitId),
    City(CityId),
    Player,
}

impl AiEntity {
    pub fn kind(self) -> EntityKind {
        match self {
            AiEntity::Unit(_) => EntityKind::Unit,
            AiEntity::City(_) => EntityKind::City,
            AiEntity::Player => EntityKind::Player,
        }
    }
}

/// One kind of move the AI knows how to propose and rate.
///
/// Implementations never mutate anything: candidates are plain commands, and scoring only reads
/// the context. Scores are expected in `[0, 100]`; the registry clamps whatever comes back.
pub trait ActionDefinition {
    fn id(&self) -> &'static str;

    fn command_kind(&self) -> CommandKind;

    fn applicable_to(&self) -> &'static [EntityKind];

    fn generate_candidates(&self, ctx: &AiContext<'_>, entity: AiEntity) -> Vec<Command>;

    fn score_candidate(&self, ctx: &AiContext<'_>, candidate: &Command) -> f64;
}
