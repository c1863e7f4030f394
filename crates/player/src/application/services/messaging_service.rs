//! Messaging Service - conversations and direct messages

use std::sync::Arc;

use rally_domain::{ChatMessage, ConversationId, DomainError, MessageId, UserId};
use rally_shared::SendMessageRequest;

use crate::application::optimistic::Optimistic;
use crate::application::ServiceError;
use crate::events::AppEvent;
use crate::ports::outbound::SocialApi;
use crate::state::lookup;
use crate::state::MessagesSlice;

#[derive(Clone)]
pub struct MessagingService {
    api: Arc<dyn SocialApi>,
    optimistic: Optimistic,
}

impl MessagingService {
    pub fn new(api: Arc<dyn SocialApi>, optimistic: Optimistic) -> Self {
        Self { api, optimistic }
    }

    /// Open the direct conversation with `user_id`, creating it on the
    /// server when none is known locally. Returns the conversation id.
    pub async fn open_conversation(&self, user_id: UserId) -> Result<ConversationId, ServiceError> {
        let router = self.optimistic.router();
        let existing = router
            .store()
            .get::<MessagesSlice>()
            .and_then(|m| m.conversation_with(user_id).map(|c| c.id));

        let conversation_id = match existing {
            Some(id) => id,
            None => {
                let wire = self
                    .optimistic
                    .confirm(self.api.open_conversation(user_id))
                    .await?;
                let conversation = lookup::conversation_from_wire(router.store(), &wire);
                let id = conversation.id;
                router.emit(AppEvent::ConversationAdded { conversation });
                id
            }
        };

        router.emit(AppEvent::ConversationOpened {
            conversation_id: Some(conversation_id),
        });
        Ok(conversation_id)
    }

    /// Open a conversation by id, fetching it when it is not loaded yet.
    pub async fn open_conversation_by_id(
        &self,
        conversation_id: ConversationId,
    ) -> Result<(), ServiceError> {
        let router = self.optimistic.router();
        let known = router
            .store()
            .get::<MessagesSlice>()
            .is_some_and(|m| m.conversation(conversation_id).is_some());

        if !known {
            let wire = self
                .optimistic
                .confirm(self.api.fetch_conversation(conversation_id))
                .await?;
            router.emit(AppEvent::ConversationAdded {
                conversation: lookup::conversation_from_wire(router.store(), &wire),
            });
        }

        router.emit(AppEvent::ConversationOpened {
            conversation_id: Some(conversation_id),
        });
        Ok(())
    }

    pub fn close_chat(&self) {
        self.optimistic
            .router()
            .emit(AppEvent::ConversationOpened {
                conversation_id: None,
            });
    }

    /// Send a direct message. It shows up in the conversation immediately
    /// and is withdrawn again if the server rejects it.
    pub async fn send_message(
        &self,
        receiver_id: UserId,
        content: &str,
    ) -> Result<MessageId, ServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::validation("Message cannot be empty").into());
        }

        let router = self.optimistic.router();
        let store = router.store();
        let me = lookup::local_user_id(store).ok_or(ServiceError::NoSession)?;
        let messages = store.get::<MessagesSlice>().unwrap_or_default();
        let conversation_id = messages
            .conversation_with(receiver_id)
            .map(|c| c.id)
            .ok_or_else(|| {
                tracing::warn!(%receiver_id, "No conversation open with receiver");
                DomainError::validation("Open a conversation before sending messages")
            })?;

        let message = ChatMessage {
            id: MessageId::new(),
            conversation_id,
            sender_id: me,
            receiver_id,
            content: content.to_string(),
            created_at: router.now(),
        };
        let message_id = message.id;
        let request = SendMessageRequest {
            receiver_id,
            content: message.content.clone(),
            client_message_id: message_id,
        };

        self.optimistic
            .run(
                AppEvent::MessageSent {
                    message,
                    counterpart: lookup::known_user(store, receiver_id),
                },
                AppEvent::MessageRetracted { message_id },
                self.api.send_message(request),
            )
            .await?;
        Ok(message_id)
    }
}
