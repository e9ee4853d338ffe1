use serde::{Deserialize, Serialize};

use crate::{Buildable, CityId, Hex, PlayerId, UnitId};

/// All player→sim commands. Only ids, coordinates and enums, so every command can be
/// recorded and replayed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    MoveUnit {
        player: PlayerId,
        unit: UnitId,
        to: Hex,
    },
    Attack {
        player: PlayerId,
        attacker: UnitId,
        defender: UnitId,
    },
    FoundCity {
        player: PlayerId,
        unit: UnitId,
    },
    SetProduction {
        player: PlayerId,
        city: CityId,
        item: Buildable,
    },
    /// Append to the city's production queue instead of replacing the current item.
    QueueProduction {
        player: PlayerId,
        city: CityId,
        item: Buildable,
    },
    EndTurn {
        player: PlayerId,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CommandKind {
    MoveUnit,
    Attack,
    FoundCity,
    SetProduction,
    QueueProduction,
    EndTurn,
}

impl Command {
    pub fn player(&self) -> PlayerId {
        match *self {
            Command::MoveUnit { player, .. }
            | Command::Attack { player, .. }
            | Command::FoundCity { player, .. }
            | Command::SetProduction { player, .. }
            | Command::QueueProduction { player, .. }
            | Command::EndTurn { player } => player,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::MoveUnit { .. } => CommandKind::MoveUnit,
            Command::Attack { .. } => CommandKind::Attack,
            Command::FoundCity { .. } => CommandKind::FoundCity,
            Command::SetProduction { .. } => CommandKind::SetProduction,
            Command::QueueProduction { .. } => CommandKind::QueueProduction,
            Command::EndTurn { .. } => CommandKind::EndTurn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_type_tag() {
        let cmd = Command::MoveUnit {
            player: PlayerId(1),
            unit: UnitId::new(2, 0),
            to: Hex::new(3, -1),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "MoveUnit");
        assert_eq!(json["player"], 1);
        assert_eq!(json["to"]["q"], 3);

        let back: Command = serde_json::from_value(json).unwrap();
        assert_eq!(back, cmd);
        assert_eq!(back.kind(), CommandKind::MoveUnit);
        assert_eq!(back.player(), PlayerId(1));
    }
}
