use std::sync::Arc;

use rally_domain::{NotificationId, Profile, ProfilePatch};

use crate::application::optimistic::Optimistic;
use crate::application::ServiceError;
use crate::events::AppEvent;
use crate::ports::outbound::SocialApi;
use crate::state::ProfileSlice;

/// Profile edits and notification housekeeping for the local user.
#[derive(Clone)]
pub struct ProfileService {
    api: Arc<dyn SocialApi>,
    optimistic: Optimistic,
}

impl ProfileService {
    pub fn new(api: Arc<dyn SocialApi>, optimistic: Optimistic) -> Self {
        Self { api, optimistic }
    }

    /// Apply `patch` locally, then persist it. The previous profile is
    /// restored if the server refuses.
    pub async fn update_profile(&self, patch: ProfilePatch) -> Result<Profile, ServiceError> {
        let previous = self
            .optimistic
            .router()
            .store()
            .get::<ProfileSlice>()
            .map(|p| p.profile.clone())
            .ok_or(ServiceError::NoSession)?;
        let provisional = previous.patched(&patch)?;

        let saved = self
            .optimistic
            .run(
                AppEvent::ProfileUpdated {
                    profile: provisional,
                },
                AppEvent::ProfileUpdated { profile: previous },
                self.api.update_profile(patch),
            )
            .await?;
        Ok(saved)
    }

    pub fn mark_notification_read(&self, notification_id: NotificationId) {
        self.optimistic
            .router()
            .emit(AppEvent::NotificationRead { notification_id });
    }

    pub fn clear_notifications(&self) {
        self.optimistic
            .router()
            .emit(AppEvent::NotificationsCleared);
    }
}
