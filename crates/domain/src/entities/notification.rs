//! Transient UI alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{NotificationId, UserSummary};

/// Default number of alerts kept before the oldest are dropped.
pub const DEFAULT_NOTIFICATION_CAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequest,
    FriendAccepted,
    GameInvite,
    GameAccepted,
    GameRejected,
    TournamentMatch,
    Achievement,
    /// A rejected optimistic action.
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub actor: Option<UserSummary>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            message: message.into(),
            actor: None,
            read: false,
            created_at,
        }
    }

    pub fn with_actor(mut self, actor: UserSummary) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn error(message: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(NotificationKind::Error, message, created_at)
    }
}
