//! Command pipeline: pure validation, then mutation.
//!
//! `validate` is the only way to obtain a [`ValidatedCommand`], and `execute` only accepts
//! one, so a command can never reach an executor without having passed its validator.

mod execute;
mod validate;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hexfront_protocol::{CityId, Command, PlayerId, UnitId};

pub use execute::execute;
pub use validate::{check, founding_site_error, validate};

/// Outcome of validating a command. Business-rule rejections carry a human-readable reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(reason.into()),
        }
    }
}

/// A command that passed validation against some state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedCommand {
    command: Command,
}

impl ValidatedCommand {
    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Invariant violations hit while executing an already-validated command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),
    #[error("unknown city {0}")]
    UnknownCity(CityId),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("production queue of city {0} is full")]
    QueueFull(CityId),
    #[error("validated move has no path")]
    NoPathForValidatedMove,
}
