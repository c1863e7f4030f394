//! REST response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rally_domain::{AchievementId, FriendRequest, FriendRequestId, GameRecord, GameStats, Profile};

use crate::messages::WireUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFriendRequest {
    pub id: FriendRequestId,
    pub user: WireUser,
    pub created_at: DateTime<Utc>,
}

impl WireFriendRequest {
    pub fn to_request(&self) -> FriendRequest {
        let mut request = FriendRequest::new(self.id, self.user.to_summary(), self.created_at);
        request.status = self.user.status.unwrap_or_default();
        request
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFriendRequests {
    #[serde(default)]
    pub sent: Vec<WireFriendRequest>,
    #[serde(default)]
    pub received: Vec<WireFriendRequest>,
}

/// Everything the client needs about the authenticated user, in one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapPayload {
    pub profile: Profile,
    #[serde(default)]
    pub game_history: Vec<GameRecord>,
    #[serde(default)]
    pub game_stats: GameStats,
    /// Ids of the achievements this user has unlocked
    #[serde(default)]
    pub achievements: Vec<AchievementId>,
    #[serde(default)]
    pub friends: Vec<WireUser>,
    #[serde(default)]
    pub friend_requests: WireFriendRequests,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineCountResponse {
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineStatusResponse {
    pub online: bool,
}

/// Error body returned by the REST API. Either field may carry the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}
