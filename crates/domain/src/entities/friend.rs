//! Friendship graph entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FriendRequestId, PresenceStatus, UserId, UserSummary};

/// An accepted friend with their last known presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub user: UserSummary,
    #[serde(default)]
    pub status: PresenceStatus,
}

impl Friend {
    pub fn new(user: UserSummary, status: PresenceStatus) -> Self {
        Self { user, status }
    }

    pub fn id(&self) -> UserId {
        self.user.id
    }
}

/// A pending friend request. `user` is always the counterpart, for both the
/// sent and the received side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub id: FriendRequestId,
    pub user: UserSummary,
    #[serde(default)]
    pub status: PresenceStatus,
    pub created_at: DateTime<Utc>,
}

impl FriendRequest {
    pub fn new(id: FriendRequestId, user: UserSummary, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user,
            status: PresenceStatus::Offline,
            created_at,
        }
    }

    pub fn counterpart(&self) -> UserId {
        self.user.id
    }
}

/// Both directions of pending requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequests {
    #[serde(default)]
    pub sent: Vec<FriendRequest>,
    #[serde(default)]
    pub received: Vec<FriendRequest>,
}

impl FriendRequests {
    pub fn involves(&self, user_id: UserId) -> bool {
        self.sent.iter().any(|r| r.counterpart() == user_id)
            || self.received.iter().any(|r| r.counterpart() == user_id)
    }
}
