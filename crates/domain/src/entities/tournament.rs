//! Tournament listings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{TournamentId, UserId, UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    #[default]
    Pending,
    Ongoing,
    Finished,
    Cancelled,
}

impl TournamentStatus {
    /// Whether players may still join or leave.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Ongoing => "ongoing",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A tournament entry. `player_count` mirrors `players.len()`; mutate the roster
/// only through [`Tournament::set_players`] so the two never drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub status: TournamentStatus,
    #[serde(default)]
    pub players: Vec<UserSummary>,
    #[serde(default)]
    pub player_count: u32,
    pub created_by: UserId,
}

impl Tournament {
    pub fn new(id: TournamentId, name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id,
            name: name.into(),
            status: TournamentStatus::Pending,
            players: Vec::new(),
            player_count: 0,
            created_by,
        }
    }

    pub fn with_players(mut self, players: Vec<UserSummary>) -> Self {
        self.set_players(players);
        self
    }

    pub fn set_players(&mut self, players: Vec<UserSummary>) {
        self.player_count = players.len() as u32;
        self.players = players;
    }

    pub fn has_player(&self, user_id: UserId) -> bool {
        self.players.iter().any(|p| p.id == user_id)
    }

    /// Appends `player` unless already present. Returns whether it was added.
    pub fn add_player(&mut self, player: &UserSummary) -> bool {
        if self.has_player(player.id) {
            return false;
        }
        self.players.push(player.clone());
        self.player_count = self.players.len() as u32;
        true
    }

    /// Returns whether `user_id` was on the roster.
    pub fn remove_player(&mut self, user_id: UserId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != user_id);
        self.player_count = self.players.len() as u32;
        self.players.len() != before
    }

    /// Restores `player_count == players.len()` for snapshots from the wire.
    pub fn normalized(mut self) -> Self {
        self.player_count = self.players.len() as u32;
        self
    }
}
