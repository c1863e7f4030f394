//! User summaries and presence.
//!
//! A `UserSummary` is the denormalized view of another user that every slice
//! embeds (friend entries, request counterparts, conversation members,
//! notification actors). Reducers keep the copies converged by user id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DomainError, UserId};

/// Online presence of a user as last reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    #[default]
    Offline,
}

impl PresenceStatus {
    pub fn from_online(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

impl FromStr for PresenceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(DomainError::parse(format!(
                "Unknown presence status: {}",
                other
            ))),
        }
    }
}

/// Public identity of a user as embedded in other entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserSummary {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: None,
            avatar: None,
        }
    }

    /// Placeholder for an id the client could not resolve locally.
    pub fn unresolved(id: UserId) -> Self {
        Self::new(id, String::new())
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn is_resolved(&self) -> bool {
        !self.username.is_empty()
    }

    /// Name to show in alerts: display name, then username, then the raw id.
    pub fn label(&self) -> String {
        match (&self.display_name, self.username.is_empty()) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, false) => self.username.clone(),
            _ => self.id.to_string(),
        }
    }
}
