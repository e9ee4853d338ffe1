use thiserror::Error;

use hexfront_protocol::{Command, Event, ReplayCommand, ReplayFile, REPLAY_VERSION};

use crate::{
    clock::{Clock, FixedClock},
    pipeline::{execute, validate, SimError, ValidationResult},
    rules::Rules,
    scenario::ScenarioConfig,
    state::GameState,
};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("unsupported replay version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("invalid scenario: {0}")]
    Scenario(#[from] serde_json::Error),
    #[error("command {index} recorded on turn {recorded} but replayed on turn {actual}")]
    Desync {
        index: usize,
        recorded: u32,
        actual: u32,
    },
    #[error("command {index} rejected during replay: {reason}")]
    Rejected { index: usize, reason: String },
    #[error("final state hash {actual:#018x} does not match recorded {expected:#018x}")]
    HashMismatch { expected: u64, actual: u64 },
    #[error(transparent)]
    Sim(#[from] SimError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Executed(Vec<Event>),
    /// Validation failed; state is untouched.
    Rejected(ValidationResult),
}

impl CommandOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, CommandOutcome::Executed(_))
    }
}

/// Owns the game state and funnels every command through validate-then-execute.
pub struct GameEngine {
    scenario: Option<ScenarioConfig>,
    command_log: Vec<ReplayCommand>,
    clock: Box<dyn Clock>,
    state: GameState,
}

impl GameEngine {
    pub fn new(state: GameState, clock: Box<dyn Clock>) -> Self {
        Self {
            scenario: None,
            command_log: Vec::new(),
            clock,
            state,
        }
    }

    pub fn from_scenario(scenario: ScenarioConfig, rules: Rules, clock: Box<dyn Clock>) -> Self {
        let state = scenario.build(rules);
        Self {
            scenario: Some(scenario),
            ..Self::new(state, clock)
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scenario(&self) -> Option<&ScenarioConfig> {
        self.scenario.as_ref()
    }

    pub fn command_log(&self) -> &[ReplayCommand] {
        &self.command_log
    }

    /// Validate and, if valid, execute `command`. Executed commands are recorded for replay.
    pub fn apply_command(&mut self, command: Command) -> Result<CommandOutcome, SimError> {
        let validated = match validate(&command, &self.state) {
            Ok(validated) => validated,
            Err(rejection) => return Ok(CommandOutcome::Rejected(rejection)),
        };
        let turn = self.state.turn;
        let events = execute(validated, &mut self.state, self.clock.as_ref())?;
        self.command_log.push(ReplayCommand {
            turn,
            player: command.player(),
            command,
        });
        Ok(CommandOutcome::Executed(events))
    }

    pub fn state_hash(&self) -> u64 {
        self.state.state_hash()
    }

    pub fn export_replay(&self) -> Result<ReplayFile, ReplayError> {
        let scenario = match &self.scenario {
            Some(scenario) => serde_json::to_value(scenario)?,
            None => serde_json::Value::Null,
        };
        Ok(ReplayFile {
            version: REPLAY_VERSION,
            scenario,
            final_state_hash: Some(self.state_hash()),
            commands: self.command_log.clone(),
        })
    }

    /// Rebuild the recorded scenario and re-apply every command, failing on the first
    /// rejection, turn mismatch or final hash mismatch.
    pub fn replay(replay: ReplayFile, rules: Rules) -> Result<GameEngine, ReplayError> {
        if replay.version != REPLAY_VERSION {
            return Err(ReplayError::Version {
                found: replay.version,
                expected: REPLAY_VERSION,
            });
        }
        let scenario: ScenarioConfig = serde_json::from_value(replay.scenario)?;
        let mut engine = GameEngine::from_scenario(scenario, rules, Box::new(FixedClock(0)));

        for (index, recorded) in replay.commands.into_iter().enumerate() {
            let actual = engine.state.turn;
            if recorded.turn != actual {
                return Err(ReplayError::Desync {
                    index,
                    recorded: recorded.turn,
                    actual,
                });
            }
            if let CommandOutcome::Rejected(rejection) = engine.apply_command(recorded.command)? {
                return Err(ReplayError::Rejected {
                    index,
                    reason: rejection.error.unwrap_or_default(),
                });
            }
        }

        if let Some(expected) = replay.final_state_hash {
            let actual = engine.state_hash();
            if actual != expected {
                return Err(ReplayError::HashMismatch { expected, actual });
            }
        }
        tracing::debug!(commands = engine.command_log.len(), "replay verified");
        Ok(engine)
    }
}
