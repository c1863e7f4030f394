//! Conversations, messages and the active chat.

use rally_domain::{
    ChatMessage, Conversation, ConversationId, ConversationMember, MessageId, UserId,
    UserSummary,
};

use crate::state::lookup;
use crate::state::{MessagesSlice, SliceStore};

/// Conversation containing `pinned` first, the rest by most recent message
/// (conversations without messages last), ties broken by id.
pub(crate) fn pin_then_sort(conversations: &mut [Conversation], pinned: Option<UserId>) {
    conversations.sort_by(|a, b| {
        let a_pinned = pinned.is_some_and(|user| a.has_member(user));
        let b_pinned = pinned.is_some_and(|user| b.has_member(user));
        b_pinned
            .cmp(&a_pinned)
            .then_with(|| b.last_activity().cmp(&a.last_activity()))
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub(super) fn message_received(store: &SliceStore, message: &ChatMessage, counterpart: &UserSummary) {
    let me = lookup::local_user_id(store);
    let inbound = me != Some(message.sender_id);
    let other = me.map_or(message.sender_id, |me| message.other_party(me));
    let counterpart_status = lookup::known_presence(store, counterpart.id).unwrap_or_default();

    store.try_update::<MessagesSlice>(|messages| {
        let mut next = messages.clone();
        let index = match next
            .conversations
            .iter()
            .position(|c| c.id == message.conversation_id)
        {
            Some(index) => index,
            None => {
                tracing::debug!(conversation = %message.conversation_id, "Message for unknown conversation; creating it");
                next.conversations.push(Conversation::new(
                    message.conversation_id,
                    vec![ConversationMember::new(counterpart.clone(), counterpart_status)],
                ));
                next.conversations.len() - 1
            }
        };

        let active = next.active_chat;
        let conversation = &mut next.conversations[index];
        if !conversation.insert_message(message.clone()) {
            return None;
        }
        if inbound && active != Some(conversation.id) {
            conversation.unread_count += 1;
        }

        pin_then_sort(&mut next.conversations, Some(other));
        next.recount();
        Some(next)
    });
}

pub(super) fn message_sent(store: &SliceStore, message: &ChatMessage, counterpart: &UserSummary) {
    store.try_update::<MessagesSlice>(|messages| {
        let Some(index) = messages
            .conversations
            .iter()
            .position(|c| c.has_member(counterpart.id))
        else {
            tracing::debug!(counterpart = %counterpart.id, "No conversation for sent message");
            return None;
        };
        let mut next = messages.clone();
        if !next.conversations[index].insert_message(message.clone()) {
            return None;
        }
        pin_then_sort(&mut next.conversations, Some(counterpart.id));
        Some(next)
    });
}

/// Counterpart of the open chat, pinned whenever the list is re-sorted
/// outside a message arrival.
pub(super) fn active_counterpart(messages: &MessagesSlice) -> Option<UserId> {
    messages
        .active_chat
        .and_then(|id| messages.conversation(id))
        .and_then(Conversation::counterpart)
}

pub(super) fn message_retracted(store: &SliceStore, message_id: MessageId) {
    store.try_update::<MessagesSlice>(|messages| {
        let mut next = messages.clone();
        if !next
            .conversations
            .iter_mut()
            .any(|c| c.remove_message(message_id))
        {
            return None;
        }
        pin_then_sort(&mut next.conversations, active_counterpart(messages));
        next.recount();
        Some(next)
    });
}

pub(super) fn conversation_added(store: &SliceStore, conversation: &Conversation) {
    store.try_update::<MessagesSlice>(|messages| {
        if messages.conversation(conversation.id).is_some() {
            return None;
        }
        let mut next = messages.clone();
        next.conversations.push(conversation.clone());
        pin_then_sort(&mut next.conversations, active_counterpart(messages));
        next.recount();
        Some(next)
    });
}

pub(super) fn conversation_opened(store: &SliceStore, conversation_id: Option<ConversationId>) {
    store.try_update::<MessagesSlice>(|messages| {
        let mut next = messages.clone();
        match conversation_id {
            None => {
                messages.active_chat?;
                next.active_chat = None;
            }
            Some(id) => {
                let conversation = next.conversations.iter_mut().find(|c| c.id == id)?;
                if messages.active_chat == Some(id) && conversation.unread_count == 0 {
                    return None;
                }
                conversation.unread_count = 0;
                next.active_chat = Some(id);
                next.recount();
            }
        }
        Some(next)
    });
}
