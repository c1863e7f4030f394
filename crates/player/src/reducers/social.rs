//! Friend graph, blocking and presence.

use chrono::{DateTime, Utc};

use rally_domain::{
    Conversation, ConversationId, Friend, FriendRequest, FriendRequestId, Notification,
    NotificationKind, PresenceStatus, UserId, UserSummary,
};

use super::activity::push_notification;
use super::messaging::{self, pin_then_sort};
use crate::state::lookup;
use crate::state::{IdentitySlice, MessagesSlice, SliceStore, SocialSlice};

pub(super) fn request_sent(store: &SliceStore, request: &FriendRequest) {
    let target = request.counterpart();
    store.try_update::<SocialSlice>(|social| {
        if social.is_friend(target) || social.friend_requests.involves(target) {
            tracing::debug!(%target, "Friend request already tracked for user");
            return None;
        }
        let mut next = social.clone();
        next.friend_requests.sent.push(request.clone());
        Some(next)
    });
}

pub(super) fn request_retracted(store: &SliceStore, request_id: FriendRequestId) {
    store.try_update::<SocialSlice>(|social| {
        if !social.friend_requests.sent.iter().any(|r| r.id == request_id) {
            return None;
        }
        let mut next = social.clone();
        next.friend_requests.sent.retain(|r| r.id != request_id);
        Some(next)
    });
}

pub(super) fn request_received(store: &SliceStore, request: &FriendRequest, at: DateTime<Utc>) {
    let sender = request.counterpart();
    let added = store.try_update::<SocialSlice>(|social| {
        if social.is_friend(sender) || social.is_blocked(sender) {
            return None;
        }
        if social
            .friend_requests
            .received
            .iter()
            .any(|r| r.counterpart() == sender)
        {
            return None;
        }
        let mut next = social.clone();
        // A crossed request: the server's view wins and ours becomes incoming.
        next.friend_requests
            .sent
            .retain(|r| r.counterpart() != sender);
        next.friend_requests.received.push(request.clone());
        Some(next)
    });

    if added {
        let message = format!("{} sent you a friend request", request.user.label());
        push_notification(
            store,
            Notification::new(NotificationKind::FriendRequest, message, at)
                .with_actor(request.user.clone()),
        );
    }
}

pub(super) fn request_accepted(store: &SliceStore, friend: &Friend) {
    let user_id = friend.id();
    store.try_update::<SocialSlice>(|social| {
        let requests = &social.friend_requests;
        if social.is_friend(user_id) && !requests.involves(user_id) {
            return None;
        }
        let mut next = social.clone();
        next.friend_requests
            .sent
            .retain(|r| r.counterpart() != user_id);
        next.friend_requests
            .received
            .retain(|r| r.counterpart() != user_id);
        if !next.is_friend(user_id) {
            next.friends.push(friend.clone());
        }
        Some(next)
    });
}

pub(super) fn request_declined(store: &SliceStore, user_id: UserId) {
    store.try_update::<SocialSlice>(|social| {
        if !social.friend_requests.involves(user_id) {
            return None;
        }
        let mut next = social.clone();
        next.friend_requests
            .sent
            .retain(|r| r.counterpart() != user_id);
        next.friend_requests
            .received
            .retain(|r| r.counterpart() != user_id);
        Some(next)
    });
}

pub(super) fn friend_removed(store: &SliceStore, user_id: UserId) {
    store.try_update::<SocialSlice>(|social| {
        if !social.is_friend(user_id) {
            return None;
        }
        let mut next = social.clone();
        next.friends.retain(|f| f.id() != user_id);
        Some(next)
    });

    store.try_update::<MessagesSlice>(|messages| {
        if !messages.conversations.iter().any(|c| c.has_member(user_id)) {
            return None;
        }
        let mut next = messages.clone();
        next.conversations.retain(|c| !c.has_member(user_id));
        if let Some(active) = next.active_chat {
            if next.conversation(active).is_none() {
                next.active_chat = None;
            }
        }
        next.recount();
        Some(next)
    });
}

pub(super) fn friend_restored(
    store: &SliceStore,
    friend: &Friend,
    index: usize,
    conversations: &[Conversation],
    active_chat: Option<ConversationId>,
) {
    store.try_update::<SocialSlice>(|social| {
        if social.is_friend(friend.id()) {
            return None;
        }
        let mut next = social.clone();
        let at = index.min(next.friends.len());
        next.friends.insert(at, friend.clone());
        Some(next)
    });

    store.try_update::<MessagesSlice>(|messages| {
        let mut next = messages.clone();
        let mut restored = Vec::new();
        for conversation in conversations {
            if next.conversation(conversation.id).is_some() {
                continue;
            }
            next.conversations.push(conversation.clone());
            restored.push(conversation.id);
        }
        if let Some(active) = active_chat {
            if next.active_chat.is_none() && restored.contains(&active) {
                next.active_chat = Some(active);
            }
        }
        if restored.is_empty() && next.active_chat == messages.active_chat {
            return None;
        }
        let pinned = messaging::active_counterpart(&next);
        pin_then_sort(&mut next.conversations, pinned);
        next.recount();
        Some(next)
    });
}

pub(super) fn user_blocked(store: &SliceStore, user: &UserSummary) {
    store.try_update::<SocialSlice>(|social| {
        if social.is_blocked(user.id) {
            return None;
        }
        let mut next = social.clone();
        next.blocked.push(user.clone());
        Some(next)
    });
}

pub(super) fn user_unblocked(store: &SliceStore, user_id: UserId) {
    store.try_update::<SocialSlice>(|social| {
        if !social.is_blocked(user_id) {
            return None;
        }
        let mut next = social.clone();
        next.blocked.retain(|u| u.id != user_id);
        Some(next)
    });
}

/// Presence fan-out: friends, incoming requests, conversation members, the
/// local identity and the global online counter.
pub(super) fn status_update(
    store: &SliceStore,
    user_id: UserId,
    status: PresenceStatus,
    at: DateTime<Utc>,
) {
    let is_local = lookup::local_user_id(store) == Some(user_id);
    let previous = if is_local {
        store
            .get::<IdentitySlice>()
            .map(|identity| PresenceStatus::from_online(identity.online))
    } else {
        lookup::known_presence(store, user_id)
    };
    let transition = previous != Some(status);

    store.try_update::<SocialSlice>(|social| {
        let mut next = social.clone();
        let mut changed = false;
        for friend in next.friends.iter_mut().filter(|f| f.id() == user_id) {
            changed |= friend.status != status;
            friend.status = status;
        }
        let requests = &mut next.friend_requests;
        for request in requests
            .received
            .iter_mut()
            .chain(requests.sent.iter_mut())
            .filter(|r| r.counterpart() == user_id)
        {
            changed |= request.status != status;
            request.status = status;
        }
        if transition {
            let count = if status.is_online() {
                next.online_users.saturating_add(1)
            } else {
                next.online_users.saturating_sub(1)
            };
            changed |= count != next.online_users;
            next.online_users = count;
        }
        changed.then_some(next)
    });

    store.try_update::<MessagesSlice>(|messages| {
        let mut next = messages.clone();
        let mut changed = false;
        for member in next
            .conversations
            .iter_mut()
            .flat_map(|c| c.members.iter_mut())
            .filter(|m| m.user.id == user_id)
        {
            changed |= member.status != status;
            member.status = status;
        }
        changed.then_some(next)
    });

    if is_local {
        store.try_update::<IdentitySlice>(|identity| {
            let online = status.is_online();
            if identity.online == online {
                return None;
            }
            Some(IdentitySlice {
                id: identity.id,
                online,
                last_seen: if online { identity.last_seen } else { Some(at) },
            })
        });
    }
}
