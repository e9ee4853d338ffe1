use serde::{Deserialize, Serialize};

use hexfront_protocol::PlayerId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_ai: bool,
    pub eliminated: bool,
}

/// Read-only view of what a player still controls.
pub trait PlayerAssets {
    fn unit_count(&self, player: PlayerId) -> usize;
    fn city_count(&self, player: PlayerId) -> usize;
}

/// Seat order, elimination and turn rotation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerManager {
    players: Vec<Player>,
}

impl PlayerManager {
    /// Seats `count` players with ids `0..count` in turn order.
    pub fn new(count: u8, ai: bool) -> Self {
        let players = (0..count)
            .map(|i| Player {
                id: PlayerId(i),
                name: format!("Player {}", i + 1),
                is_ai: ai,
                eliminated: false,
            })
            .collect();
        Self { players }
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_active(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| !p.eliminated)
    }

    pub fn active(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().filter(|p| !p.eliminated).map(|p| p.id)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Mark `player` eliminated if it holds no units and no cities.
    ///
    /// Returns `true` only on the call that flips the flag, so callers emit
    /// `PlayerEliminated` exactly once.
    pub fn check_elimination(&mut self, assets: &impl PlayerAssets, player: PlayerId) -> bool {
        let Some(entry) = self.get_mut(player) else {
            return false;
        };
        if entry.eliminated {
            return false;
        }
        if assets.unit_count(player) > 0 || assets.city_count(player) > 0 {
            return false;
        }
        entry.eliminated = true;
        true
    }

    /// Next non-eliminated player after `current` in seat order, and whether the rotation
    /// wrapped past the last seat. `None` if nobody is left.
    pub fn next_active_after(&self, current: PlayerId) -> Option<(PlayerId, bool)> {
        let start = self.players.iter().position(|p| p.id == current)?;
        let len = self.players.len();
        (1..=len).find_map(|offset| {
            let index = (start + offset) % len;
            let player = &self.players[index];
            (!player.eliminated).then_some((player.id, start + offset >= len))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Default)]
    struct Counts(BTreeMap<PlayerId, (usize, usize)>);

    impl PlayerAssets for Counts {
        fn unit_count(&self, player: PlayerId) -> usize {
            self.0.get(&player).map_or(0, |c| c.0)
        }
        fn city_count(&self, player: PlayerId) -> usize {
            self.0.get(&player).map_or(0, |c| c.1)
        }
    }

    #[test]
    fn elimination_fires_once() {
        let mut players = PlayerManager::new(2, false);
        let mut counts = Counts::default();
        counts.0.insert(PlayerId(0), (1, 0));

        assert!(!players.check_elimination(&counts, PlayerId(0)));
        assert!(players.check_elimination(&counts, PlayerId(1)));
        assert!(!players.check_elimination(&counts, PlayerId(1)));
        assert!(!players.is_active(PlayerId(1)));
        assert_eq!(players.active_count(), 1);
    }

    #[test]
    fn a_lone_city_keeps_a_player_alive() {
        let mut players = PlayerManager::new(1, true);
        let mut counts = Counts::default();
        counts.0.insert(PlayerId(0), (0, 1));
        assert!(!players.check_elimination(&counts, PlayerId(0)));
    }

    #[test]
    fn rotation_skips_eliminated_and_reports_wrap() {
        let mut players = PlayerManager::new(3, false);
        assert_eq!(players.next_active_after(PlayerId(0)), Some((PlayerId(1), false)));
        assert_eq!(players.next_active_after(PlayerId(2)), Some((PlayerId(0), true)));

        players.check_elimination(&Counts::default(), PlayerId(1));
        assert_eq!(players.next_active_after(PlayerId(0)), Some((PlayerId(2), false)));

        players.check_elimination(&Counts::default(), PlayerId(2));
        players.check_elimination(&Counts::default(), PlayerId(0));
        assert_eq!(players.next_active_after(PlayerId(0)), None);
    }
}
