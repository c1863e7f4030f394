//! Match statistics and history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameId, UserSummary};

/// Default number of finished games retained in history.
pub const DEFAULT_HISTORY_CAP: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
}

impl GameStats {
    pub fn record(&mut self, won: bool) {
        self.total_games += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    pub fn win_rate(&self) -> f32 {
        if self.total_games == 0 {
            0.0
        } else {
            self.wins as f32 / self.total_games as f32
        }
    }
}

/// One finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: GameId,
    pub opponent: UserSummary,
    pub player_score: u32,
    pub opponent_score: u32,
    pub won: bool,
    pub finished_at: DateTime<Utc>,
}

/// The match currently being set up or played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentGame {
    pub id: Option<GameId>,
    pub opponent: UserSummary,
}
