//! Deterministic simulation core for Hexfront: rules, world state, the validate/execute
//! command pipeline, and the utility AI that plays through it.

pub mod ai;
mod city;
mod clock;
mod combat;
mod entities;
mod game;
mod map;
mod pathfinding;
pub mod pipeline;
mod players;
mod production;
mod rules;
mod scenario;
pub mod selfplay;
mod state;
mod territory;
mod tile;
mod unit;

pub use crate::city::*;
pub use crate::clock::*;
pub use crate::combat::*;
pub use crate::entities::*;
pub use crate::game::*;
pub use crate::map::*;
pub use crate::pathfinding::*;
pub use crate::pipeline::{
    execute, validate, SimError, ValidatedCommand, ValidationResult,
};
pub use crate::players::*;
pub use crate::production::*;
pub use crate::rules::*;
pub use crate::scenario::*;
pub use crate::selfplay::{
    run_batch_selfplay, run_selfplay, AggregateMetrics, BatchSelfPlayResult, GameMetrics,
    PlayerStats, SelfPlayConfig, SelfPlayResult, VictoryCondition,
};
pub use crate::state::*;
pub use crate::territory::*;
pub use crate::tile::*;
pub use crate::unit::*;
