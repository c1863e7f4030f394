//! Read-side helpers that resolve wire payloads against current store state.
//!
//! Push frames and some REST responses carry bare user ids. These helpers
//! fill in what the store already knows about a user (friend list, pending
//! requests, conversation members, the local profile).

use rally_domain::{
    Conversation, ConversationMember, PresenceStatus, UserId, UserSummary,
};
use rally_shared::{WireConversation, WireUser};

use super::{IdentitySlice, MessagesSlice, ProfileSlice, SliceStore, SocialSlice};

/// Id of the authenticated user, if a session exists.
pub fn local_user_id(store: &SliceStore) -> Option<UserId> {
    store.get::<IdentitySlice>().map(|identity| identity.id)
}

/// Best known summary for `user_id`. Falls back to an unresolved summary.
pub fn known_user(store: &SliceStore, user_id: UserId) -> UserSummary {
    if let Some(profile) = store.get::<ProfileSlice>() {
        if profile.profile.id == user_id {
            return profile.profile.summary();
        }
    }
    if let Some(social) = store.get::<SocialSlice>() {
        if let Some(friend) = social.friend(user_id) {
            return friend.user.clone();
        }
        let requests = &social.friend_requests;
        if let Some(request) = requests
            .received
            .iter()
            .chain(requests.sent.iter())
            .find(|r| r.counterpart() == user_id)
        {
            return request.user.clone();
        }
        if let Some(user) = social.blocked.iter().find(|u| u.id == user_id) {
            return user.clone();
        }
    }
    if let Some(messages) = store.get::<MessagesSlice>() {
        if let Some(member) = messages
            .conversations
            .iter()
            .flat_map(|c| c.members.iter())
            .find(|m| m.user.id == user_id)
        {
            return member.user.clone();
        }
    }
    UserSummary::unresolved(user_id)
}

/// Summary for a wire user: the payload itself when complete, else the store.
pub fn resolve_user(store: &SliceStore, wire: &WireUser) -> UserSummary {
    if wire.is_complete() {
        wire.to_summary()
    } else {
        known_user(store, wire.id)
    }
}

/// Last known presence of `user_id`, if any slice tracks it.
pub fn known_presence(store: &SliceStore, user_id: UserId) -> Option<PresenceStatus> {
    if let Some(social) = store.get::<SocialSlice>() {
        if let Some(friend) = social.friend(user_id) {
            return Some(friend.status);
        }
        if let Some(request) = social
            .friend_requests
            .received
            .iter()
            .find(|r| r.counterpart() == user_id)
        {
            return Some(request.status);
        }
    }
    store.get::<MessagesSlice>().and_then(|messages| {
        messages
            .conversations
            .iter()
            .flat_map(|c| c.members.iter())
            .find(|m| m.user.id == user_id)
            .map(|m| m.status)
    })
}

/// Domain conversation from a wire payload. The local user is left out of the
/// member list; remaining members are resolved against the store.
pub fn conversation_from_wire(store: &SliceStore, wire: &WireConversation) -> Conversation {
    let me = local_user_id(store);
    let members = wire
        .members
        .iter()
        .filter(|m| Some(m.user_id) != me)
        .map(|m| {
            let status = known_presence(store, m.user_id).unwrap_or_default();
            ConversationMember::new(known_user(store, m.user_id), status)
        })
        .collect();

    let mut conversation = Conversation::new(wire.id, members);
    for message in wire.messages.iter().chain(wire.last_message.iter()) {
        conversation.insert_message(message.clone());
    }
    conversation.unread_count = wire.unread_count;
    conversation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::slices::IdentitySlice;
    use rally_domain::{ConversationId, Friend};
    use rally_shared::WireMember;

    fn store_with_friend(friend: &UserSummary, me: UserId) -> SliceStore {
        let store = SliceStore::new();
        store.set(IdentitySlice {
            id: me,
            online: true,
            last_seen: None,
        });
        store.set(SocialSlice {
            friends: vec![Friend::new(friend.clone(), PresenceStatus::Online)],
            ..Default::default()
        });
        store
    }

    #[test]
    fn id_only_wire_user_is_resolved_from_friends() {
        let friend = UserSummary::new(UserId::new(), "bea");
        let store = store_with_friend(&friend, UserId::new());

        assert_eq!(resolve_user(&store, &WireUser::id_only(friend.id)), friend);

        let stranger = UserId::new();
        assert!(!resolve_user(&store, &WireUser::id_only(stranger)).is_resolved());
    }

    #[test]
    fn wire_conversation_drops_local_member_and_keeps_presence() {
        let me = UserId::new();
        let friend = UserSummary::new(UserId::new(), "bea");
        let store = store_with_friend(&friend, me);
        let wire = WireConversation {
            id: ConversationId::new(),
            members: vec![WireMember { user_id: me }, WireMember { user_id: friend.id }],
            messages: Vec::new(),
            unread_count: 2,
            last_message: None,
        };

        let conversation = conversation_from_wire(&store, &wire);
        assert_eq!(conversation.members.len(), 1);
        assert_eq!(conversation.members[0].user, friend);
        assert_eq!(conversation.members[0].status, PresenceStatus::Online);
        assert_eq!(conversation.unread_count, 2);
    }
}
