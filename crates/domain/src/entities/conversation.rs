//! Direct-message conversations.
//!
//! Messages inside a conversation are kept in ascending `created_at` order and
//! are unique by id, so at-least-once delivery never duplicates a bubble.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConversationId, MessageId, PresenceStatus, UserId, UserSummary};

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// The participant that is not `me`.
    pub fn other_party(&self, me: UserId) -> UserId {
        if self.sender_id == me {
            self.receiver_id
        } else {
            self.sender_id
        }
    }
}

/// A conversation member as rendered in the chat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMember {
    pub user: UserSummary,
    #[serde(default)]
    pub status: PresenceStatus,
}

impl ConversationMember {
    pub fn new(user: UserSummary, status: PresenceStatus) -> Self {
        Self { user, status }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    /// Members other than the local user.
    pub members: Vec<ConversationMember>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub unread_count: u32,
}

impl Conversation {
    pub fn new(id: ConversationId, members: Vec<ConversationMember>) -> Self {
        Self {
            id,
            members,
            messages: Vec::new(),
            unread_count: 0,
        }
    }

    pub fn has_member(&self, user_id: UserId) -> bool {
        self.members.iter().any(|m| m.user.id == user_id)
    }

    /// The first member; direct conversations have exactly one.
    pub fn counterpart(&self) -> Option<UserId> {
        self.members.first().map(|m| m.user.id)
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_message().map(|m| m.created_at)
    }

    pub fn contains_message(&self, id: MessageId) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    /// Insert keeping ascending `created_at` order. Returns false for a duplicate id.
    pub fn insert_message(&mut self, message: ChatMessage) -> bool {
        if self.contains_message(message.id) {
            return false;
        }
        let at = self
            .messages
            .partition_point(|m| m.created_at <= message.created_at);
        self.messages.insert(at, message);
        true
    }

    /// Remove a message by id. Returns false when it was not present.
    pub fn remove_message(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message(conversation_id: ConversationId, secs: i64) -> ChatMessage {
        ChatMessage {
            id: MessageId::new(),
            conversation_id,
            sender_id: UserId::new(),
            receiver_id: UserId::new(),
            content: format!("at {}", secs),
            created_at: Utc.timestamp_opt(secs, 0).single().expect("valid timestamp"),
        }
    }

    #[test]
    fn insert_keeps_creation_order_for_late_arrivals() {
        let id = ConversationId::new();
        let mut conversation = Conversation::new(id, Vec::new());
        let late = message(id, 30);
        let early = message(id, 10);
        let middle = message(id, 20);

        assert!(conversation.insert_message(late.clone()));
        assert!(conversation.insert_message(early.clone()));
        assert!(conversation.insert_message(middle.clone()));

        let order: Vec<_> = conversation.messages.iter().map(|m| m.id).collect();
        assert_eq!(order, vec![early.id, middle.id, late.id]);
        assert_eq!(conversation.last_activity(), Some(late.created_at));
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let id = ConversationId::new();
        let mut conversation = Conversation::new(id, Vec::new());
        let msg = message(id, 10);

        assert!(conversation.insert_message(msg.clone()));
        assert!(!conversation.insert_message(msg));
        assert_eq!(conversation.messages.len(), 1);
    }

    #[test]
    fn other_party_is_relative_to_local_user() {
        let msg = message(ConversationId::new(), 1);
        assert_eq!(msg.other_party(msg.sender_id), msg.receiver_id);
        assert_eq!(msg.other_party(msg.receiver_id), msg.sender_id);
    }
}
