use serde::{Deserialize, Serialize};

use crate::{Command, PlayerId};

pub const REPLAY_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayFile {
    /// Replay file schema version.
    pub version: u32,
    /// Scenario the game was started from; opaque to the protocol crate.
    pub scenario: serde_json::Value,
    /// Deterministic hash of the final state, checked after re-running the commands.
    #[serde(default)]
    pub final_state_hash: Option<u64>,
    #[serde(default)]
    pub commands: Vec<ReplayCommand>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayCommand {
    pub turn: u32,
    pub player: PlayerId,
    pub command: Command,
}
