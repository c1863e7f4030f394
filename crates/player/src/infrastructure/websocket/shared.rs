//! Shared helpers for push channel sockets.
//!
//! Runtime-agnostic (no tokio): reconnect constants and frame parsing used by
//! the realtime manager and the transports.

use rally_shared::{ChatFrame, NotificationFrame};

// Reconnection defaults (overridable through `ReconnectPolicy`)
pub const INITIAL_RETRY_DELAY_MS: u64 = 1_000;
pub const MAX_RETRY_DELAY_MS: u64 = 30_000;
pub const MAX_RETRY_ATTEMPTS: u32 = 10;
pub const BACKOFF_MULTIPLIER: f64 = 2.0;

/// A parsed frame from either channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFrame {
    Chat(ChatFrame),
    Notification(Box<NotificationFrame>),
}

impl ParsedFrame {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Chat(frame) => frame.type_name(),
            Self::Notification(frame) => frame.type_name(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        match self {
            Self::Chat(frame) => *frame == ChatFrame::Unknown,
            Self::Notification(frame) => **frame == NotificationFrame::Unknown,
        }
    }
}

pub fn parse_chat_frame(text: &str) -> Result<ParsedFrame, serde_json::Error> {
    serde_json::from_str::<ChatFrame>(text).map(ParsedFrame::Chat)
}

pub fn parse_notification_frame(text: &str) -> Result<ParsedFrame, serde_json::Error> {
    serde_json::from_str::<NotificationFrame>(text).map(|f| ParsedFrame::Notification(Box::new(f)))
}
