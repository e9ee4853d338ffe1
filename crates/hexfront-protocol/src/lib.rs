//! Wire-level types shared by the Hexfront simulation and its consumers.
//!
//! Nothing in here depends on simulation state: commands and events are plain data so they can
//! be logged, replayed, or sent across a transport unchanged.

mod command;
mod event;
mod hex;
mod ids;
mod replay;
mod types;
pub mod wire;

pub use crate::command::*;
pub use crate::event::*;
pub use crate::hex::*;
pub use crate::ids::*;
pub use crate::replay::*;
pub use crate::types::*;
