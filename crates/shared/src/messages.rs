//! Push frame types for the two realtime channels
//!
//! The chat channel and the notification channel each deliver JSON frames
//! tagged by a `type` field. Both enums are inbound-only for the client.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown `type` values deserialize to `Unknown` so a client never drops its
//!   channel because the server learned a new event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rally_domain::{
    AchievementId, ChatMessage, ConversationId, Friend, GameId, GameRecord, PresenceStatus,
    Tournament, TournamentId, TournamentStatus, UserId, UserSummary,
};

// =============================================================================
// Shared payload shapes
// =============================================================================

/// A user as it appears inside push payloads. Only the id is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: Option<PresenceStatus>,
}

impl WireUser {
    pub fn id_only(id: UserId) -> Self {
        Self {
            id,
            username: None,
            display_name: None,
            avatar: None,
            status: None,
        }
    }

    /// True when the payload carries enough to render the user without a lookup.
    pub fn is_complete(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }

    pub fn to_summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone().unwrap_or_default(),
            display_name: self.display_name.clone(),
            avatar: self.avatar.clone(),
        }
    }

    pub fn to_friend(&self) -> Friend {
        Friend::new(self.to_summary(), self.status.unwrap_or_default())
    }
}

impl From<&UserSummary> for WireUser {
    fn from(user: &UserSummary) -> Self {
        Self {
            id: user.id,
            username: Some(user.username.clone()),
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone(),
            status: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMember {
    pub user_id: UserId,
}

/// Conversation payload as pushed on the chat channel and returned by REST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConversation {
    pub id: ConversationId,
    pub members: Vec<WireMember>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub last_message: Option<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub status: TournamentStatus,
    #[serde(default)]
    pub players: Vec<WireUser>,
    #[serde(default)]
    pub player_count: u32,
    pub created_by: UserId,
}

impl WireTournament {
    /// Domain snapshot; `player_count` is recomputed from the roster.
    pub fn to_tournament(&self) -> Tournament {
        Tournament {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
            players: self.players.iter().map(WireUser::to_summary).collect(),
            player_count: self.player_count,
            created_by: self.created_by,
        }
        .normalized()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAchievement {
    pub id: AchievementId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGameResult {
    pub id: GameId,
    pub opponent: WireUser,
    pub player_score: u32,
    pub opponent_score: u32,
    pub won: bool,
    pub finished_at: DateTime<Utc>,
}

impl WireGameResult {
    pub fn to_record(&self, opponent: UserSummary) -> GameRecord {
        GameRecord {
            id: self.id,
            opponent,
            player_score: self.player_score,
            opponent_score: self.opponent_score,
            won: self.won,
            finished_at: self.finished_at,
        }
    }
}

// =============================================================================
// Chat channel
// =============================================================================

/// Frames delivered on the chat channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatFrame {
    /// A message was delivered; the message fields sit next to `type`
    #[serde(rename = "new_message")]
    NewMessage(ChatMessage),
    /// A conversation became visible to this user
    #[serde(rename = "CONVERSATION_ADDED")]
    ConversationAdded(WireConversation),
    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ChatFrame {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "new_message",
            Self::ConversationAdded(_) => "CONVERSATION_ADDED",
            Self::Unknown => "unknown",
        }
    }
}

// =============================================================================
// Notification channel
// =============================================================================

/// Frames delivered on the notification channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum NotificationFrame {
    FriendRequestReceived {
        user: WireUser,
        #[serde(default)]
        request_id: Option<rally_domain::FriendRequestId>,
        #[serde(default)]
        created_at: Option<DateTime<Utc>>,
    },
    FriendRequestAccepted {
        user: WireUser,
    },
    FriendRequestDeclined {
        user: WireUser,
    },
    StatusUpdate {
        user: WireUser,
    },
    FriendRemoved {
        user: WireUser,
    },
    GameInvite {
        user: WireUser,
        #[serde(default)]
        game_id: Option<GameId>,
    },
    GameAccepted {
        opponent: WireUser,
        #[serde(default)]
        game_id: Option<GameId>,
    },
    GameRejected {
        opponent: WireUser,
    },
    TournamentMatch {
        tournament_data: WireTournament,
        #[serde(default)]
        opponent: Option<WireUser>,
    },
    TournamentCreated {
        tournament_data: WireTournament,
    },
    TournamentUpdated {
        tournament_data: WireTournament,
    },
    TournamentCancelled {
        tournament_data: WireTournament,
    },
    TournamentJoined {
        tournament_data: WireTournament,
    },
    TournamentLeft {
        tournament_data: WireTournament,
    },
    AchievementUnlocked {
        achievement: WireAchievement,
    },
    GameFinished {
        game: WireGameResult,
    },
    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl NotificationFrame {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::FriendRequestReceived { .. } => "FRIEND_REQUEST_RECEIVED",
            Self::FriendRequestAccepted { .. } => "FRIEND_REQUEST_ACCEPTED",
            Self::FriendRequestDeclined { .. } => "FRIEND_REQUEST_DECLINED",
            Self::StatusUpdate { .. } => "STATUS_UPDATE",
            Self::FriendRemoved { .. } => "FRIEND_REMOVED",
            Self::GameInvite { .. } => "GAME_INVITE",
            Self::GameAccepted { .. } => "GAME_ACCEPTED",
            Self::GameRejected { .. } => "GAME_REJECTED",
            Self::TournamentMatch { .. } => "TOURNAMENT_MATCH",
            Self::TournamentCreated { .. } => "TOURNAMENT_CREATED",
            Self::TournamentUpdated { .. } => "TOURNAMENT_UPDATED",
            Self::TournamentCancelled { .. } => "TOURNAMENT_CANCELLED",
            Self::TournamentJoined { .. } => "TOURNAMENT_JOINED",
            Self::TournamentLeft { .. } => "TOURNAMENT_LEFT",
            Self::AchievementUnlocked { .. } => "ACHIEVEMENT_UNLOCKED",
            Self::GameFinished { .. } => "GAME_FINISHED",
            Self::Unknown => "unknown",
        }
    }
}
