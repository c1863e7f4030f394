use serde::{Deserialize, Serialize};

use crate::{DomainError, UserId, UserSummary};

/// Maximum length of a profile bio, in characters.
pub const MAX_BIO_LEN: usize = 280;

/// The local user's editable profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub rank: u32,
}

impl Profile {
    pub fn summary(&self) -> UserSummary {
        let summary =
            UserSummary::new(self.id, self.username.clone()).with_display_name(&self.display_name);
        match &self.avatar {
            Some(avatar) => summary.with_avatar(avatar),
            None => summary,
        }
    }

    /// Apply the fields present in `patch`, validating them first.
    pub fn patched(&self, patch: &ProfilePatch) -> Result<Self, DomainError> {
        patch.validate()?;
        let mut next = self.clone();
        if let Some(display_name) = &patch.display_name {
            next.display_name = display_name.trim().to_string();
        }
        if let Some(bio) = &patch.bio {
            next.bio = bio.clone();
        }
        if let Some(avatar) = &patch.avatar {
            next.avatar = Some(avatar.clone());
        }
        Ok(next)
    }
}

/// Partial profile edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfilePatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.display_name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Display name cannot be empty"));
            }
        }
        if let Some(bio) = &self.bio {
            if bio.chars().count() > MAX_BIO_LEN {
                return Err(DomainError::validation(format!(
                    "Bio cannot exceed {} characters",
                    MAX_BIO_LEN
                )));
            }
        }
        Ok(())
    }
}
