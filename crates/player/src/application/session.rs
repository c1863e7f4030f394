//! Session lifecycle: bootstrap and logout.
//!
//! Bootstrap fetches everything the client shows about the authenticated
//! user in parallel, fills every data slice, opens the push channels and only
//! then marks the session `Ready`. Logout tears the channels down before the
//! store is cleared, so no frame can land in a cleared store.

use std::sync::Arc;

use rally_domain::{
    FriendRequest, FriendRequests, UserId, DEFAULT_HISTORY_CAP, DEFAULT_NOTIFICATION_CAP,
};
use rally_shared::{WireFriendRequest, WireUser};

use crate::application::SessionError;
use crate::events::EventRouter;
use crate::infrastructure::realtime::ChannelManager;
use crate::ports::outbound::SocialApi;
use crate::reducers::pin_then_sort;
use crate::state::lookup;
use crate::state::{
    AchievementsSlice, GameSlice, IdentitySlice, MessagesSlice, NotificationsSlice,
    ProfileSlice, SessionPhase, SessionSlice, SocialSlice, TournamentsSlice,
};

/// Bounds applied to the slices a session creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub history_cap: usize,
    pub notification_cap: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            notification_cap: DEFAULT_NOTIFICATION_CAP,
        }
    }
}

#[derive(Clone)]
pub struct Session {
    router: EventRouter,
    api: Arc<dyn SocialApi>,
    channels: ChannelManager,
    token: Option<String>,
    limits: SessionLimits,
}

impl Session {
    pub fn new(
        router: EventRouter,
        api: Arc<dyn SocialApi>,
        channels: ChannelManager,
        token: Option<String>,
        limits: SessionLimits,
    ) -> Self {
        Self {
            router,
            api,
            channels,
            token,
            limits,
        }
    }

    /// Populate the store for `user_id` and open the push channels.
    ///
    /// On failure the store is cleared again and the error returned; the
    /// caller may retry.
    pub async fn bootstrap(&self, user_id: UserId) -> Result<(), SessionError> {
        let store = self.router.store();
        tracing::info!(%user_id, "Bootstrapping session");
        store.set(SessionSlice {
            user_id,
            phase: SessionPhase::Bootstrapping,
            started_at: self.router.now(),
        });

        let fetched = tokio::try_join!(
            self.api.fetch_bootstrap(),
            self.api.fetch_online_count(),
            self.api.fetch_conversations(),
            self.api.fetch_tournaments(),
            self.api.fetch_achievement_catalogue(),
        );
        let (payload, online_users, conversations, tournaments, catalogue) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!(%user_id, "Bootstrap fetch failed: {}", e);
                store.clear();
                return Err(e.into());
            }
        };

        if payload.profile.id != user_id {
            store.clear();
            return Err(SessionError::IdentityMismatch {
                expected: user_id,
                actual: payload.profile.id,
            });
        }

        store.set(IdentitySlice {
            id: user_id,
            online: true,
            last_seen: None,
        });
        store.set(ProfileSlice {
            profile: payload.profile,
        });
        store.set(GameSlice::new(
            payload.game_stats,
            payload.game_history,
            self.limits.history_cap,
        ));
        store.set(SocialSlice {
            friends: payload.friends.iter().map(WireUser::to_friend).collect(),
            friend_requests: FriendRequests {
                sent: requests(&payload.friend_requests.sent),
                received: requests(&payload.friend_requests.received),
            },
            online_users,
            blocked: Vec::new(),
        });
        store.set(AchievementsSlice::new(catalogue, payload.achievements));
        store.set(NotificationsSlice::new(self.limits.notification_cap));

        // Members resolve against the social slice, so it must be set first.
        let mut conversations: Vec<_> = conversations
            .iter()
            .map(|wire| lookup::conversation_from_wire(store, wire))
            .collect();
        pin_then_sort(&mut conversations, None);
        store.set(MessagesSlice::new(conversations));
        store.set(TournamentsSlice::new(tournaments));

        self.channels.open(self.token.clone());

        store.update::<SessionSlice>(|session| SessionSlice {
            phase: SessionPhase::Ready,
            ..session.clone()
        });
        tracing::info!(%user_id, "Session ready");
        Ok(())
    }

    pub fn logout(&self) {
        self.channels.terminate();
        self.router.store().clear();
        tracing::info!("Logged out");
    }
}

fn requests(wire: &[WireFriendRequest]) -> Vec<FriendRequest> {
    wire.iter().map(WireFriendRequest::to_request).collect()
}
