//! Simple test fixtures used across unit tests.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use rally_domain::{
    ChatMessage, Conversation, ConversationId, ConversationMember, GameId, GameRecord,
    MessageId, PresenceStatus, UserId, UserSummary,
};

use crate::ports::outbound::{ApiError, ClockPort};
use crate::state::{IdentitySlice, SliceStore};

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn epoch() -> Self {
        Self(at(1_700_000_000))
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

pub fn user(username: &str) -> UserSummary {
    UserSummary::new(UserId::new(), username)
}

/// Seed the identity slice so reducers know who the local user is.
pub fn seed_session(store: &SliceStore, me: UserId) {
    store.set(IdentitySlice {
        id: me,
        online: true,
        last_seen: None,
    });
}

pub fn conversation_with(user: &UserSummary, status: PresenceStatus) -> Conversation {
    Conversation::new(
        ConversationId::new(),
        vec![ConversationMember::new(user.clone(), status)],
    )
}

pub fn message(
    conversation_id: ConversationId,
    sender_id: UserId,
    receiver_id: UserId,
    secs: i64,
) -> ChatMessage {
    ChatMessage {
        id: MessageId::new(),
        conversation_id,
        sender_id,
        receiver_id,
        content: format!("message at {}", secs),
        created_at: at(secs),
    }
}

pub fn game(opponent: &UserSummary, won: bool, secs: i64) -> GameRecord {
    GameRecord {
        id: GameId::new(),
        opponent: opponent.clone(),
        player_score: if won { 11 } else { 7 },
        opponent_score: if won { 7 } else { 11 },
        won,
        finished_at: at(secs),
    }
}

pub fn server_error(message: &str) -> ApiError {
    ApiError::server(409, message)
}

/// Poll `check` until it holds or roughly two seconds have passed.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..400 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}
