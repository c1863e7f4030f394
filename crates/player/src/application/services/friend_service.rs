//! Friend Service - friend requests, friendships and blocking
//!
//! Sending a request, removing a friend and (un)blocking are optimistic.
//! Accepting and declining wait for the server before touching the store.

use std::sync::Arc;

use rally_domain::{DomainError, Friend, FriendRequest, FriendRequestId, PresenceStatus, UserId};

use crate::application::optimistic::Optimistic;
use crate::application::ServiceError;
use crate::events::AppEvent;
use crate::ports::outbound::SocialApi;
use crate::state::lookup;
use crate::state::{MessagesSlice, SocialSlice};

#[derive(Clone)]
pub struct FriendService {
    api: Arc<dyn SocialApi>,
    optimistic: Optimistic,
}

impl FriendService {
    pub fn new(api: Arc<dyn SocialApi>, optimistic: Optimistic) -> Self {
        Self { api, optimistic }
    }

    pub async fn send_request(&self, user_id: UserId) -> Result<(), ServiceError> {
        let router = self.optimistic.router();
        let store = router.store();
        if lookup::local_user_id(store) == Some(user_id) {
            return Err(DomainError::validation("Cannot send a friend request to yourself").into());
        }

        let request = FriendRequest::new(
            FriendRequestId::new(),
            lookup::known_user(store, user_id),
            router.now(),
        );
        let request_id = request.id;
        self.optimistic
            .run(
                AppEvent::FriendRequestSent { request },
                AppEvent::FriendRequestRetracted { request_id },
                self.api.send_friend_request(user_id),
            )
            .await?;
        Ok(())
    }

    /// Accept an incoming request. The new friend's presence is probed so
    /// the friends list starts out with the right status.
    pub async fn accept_request(&self, user_id: UserId) -> Result<(), ServiceError> {
        self.optimistic
            .confirm(self.api.accept_friend_request(user_id))
            .await?;

        let store = self.optimistic.router().store();
        let status = match self.api.online_status(user_id).await {
            Ok(online) => PresenceStatus::from_online(online),
            Err(e) => {
                tracing::warn!(%user_id, "Presence probe failed: {}", e);
                lookup::known_presence(store, user_id).unwrap_or_default()
            }
        };
        let friend = Friend::new(lookup::known_user(store, user_id), status);
        self.optimistic
            .router()
            .emit(AppEvent::FriendRequestAccepted { friend });
        Ok(())
    }

    pub async fn decline_request(&self, user_id: UserId) -> Result<(), ServiceError> {
        self.optimistic
            .confirm(self.api.decline_friend_request(user_id))
            .await?;
        self.optimistic
            .router()
            .emit(AppEvent::FriendRequestDeclined { user_id });
        Ok(())
    }

    /// Remove a friend along with the conversations shared with them. A
    /// rejected removal puts both back where they were.
    pub async fn remove_friend(&self, user_id: UserId) -> Result<(), ServiceError> {
        let store = self.optimistic.router().store();
        let Some((index, friend)) = store.get::<SocialSlice>().and_then(|social| {
            social
                .friends
                .iter()
                .position(|f| f.id() == user_id)
                .map(|i| (i, social.friends[i].clone()))
        }) else {
            self.optimistic
                .confirm(self.api.remove_friend(user_id))
                .await?;
            return Ok(());
        };

        let (conversations, active_chat) = store
            .get::<MessagesSlice>()
            .map(|messages| {
                let shared = messages
                    .conversations
                    .iter()
                    .filter(|c| c.has_member(user_id))
                    .cloned()
                    .collect();
                (shared, messages.active_chat)
            })
            .unwrap_or_default();

        self.optimistic
            .run(
                AppEvent::FriendRemoved { user_id },
                AppEvent::FriendRestored {
                    friend,
                    index,
                    conversations,
                    active_chat,
                },
                self.api.remove_friend(user_id),
            )
            .await?;
        Ok(())
    }

    pub async fn block(&self, user_id: UserId) -> Result<(), ServiceError> {
        let store = self.optimistic.router().store();
        if lookup::local_user_id(store) == Some(user_id) {
            return Err(DomainError::validation("Cannot block yourself").into());
        }
        let already_blocked = store
            .get::<SocialSlice>()
            .is_some_and(|social| social.is_blocked(user_id));
        if already_blocked {
            self.optimistic.confirm(self.api.block_user(user_id)).await?;
            return Ok(());
        }

        let user = lookup::known_user(store, user_id);
        self.optimistic
            .run(
                AppEvent::UserBlocked { user },
                AppEvent::UserUnblocked { user_id },
                self.api.block_user(user_id),
            )
            .await?;
        Ok(())
    }

    pub async fn unblock(&self, user_id: UserId) -> Result<(), ServiceError> {
        let store = self.optimistic.router().store();
        let blocked = store.get::<SocialSlice>().and_then(|social| {
            social.blocked.iter().find(|u| u.id == user_id).cloned()
        });
        let Some(user) = blocked else {
            self.optimistic
                .confirm(self.api.unblock_user(user_id))
                .await?;
            return Ok(());
        };

        self.optimistic
            .run(
                AppEvent::UserUnblocked { user_id },
                AppEvent::UserBlocked { user },
                self.api.unblock_user(user_id),
            )
            .await?;
        Ok(())
    }
}
