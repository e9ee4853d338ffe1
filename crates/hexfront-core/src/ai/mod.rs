//! Utility AI: actions propose candidate commands, the registry scores them, and the
//! decision step picks the best one that validates.

pub mod action;
pub mod actions;
pub mod context;
pub mod decision;
pub mod player;
pub mod registry;

pub use action::{ActionDefinition, AiEntity, EntityKind};
pub use context::{AiContext, CityView, UnitCapabilities, UnitView};
pub use decision::{decide, rank_candidates, ScoredCandidate};
pub use player::{AiPlayer, TurnReport};
pub use registry::ActionRegistry;
