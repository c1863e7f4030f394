//! WebSocket plumbing for the push channels
//!
//! - `core`: reconnect policy and backoff math
//! - `shared`: defaults and frame parsing
//! - `desktop`: tokio-tungstenite based `ChannelTransport`

mod core;
mod shared;

mod desktop;

pub use core::{BackoffState, ReconnectPolicy};
pub use desktop::TungsteniteTransport;
pub use shared::{
    parse_chat_frame, parse_notification_frame, ParsedFrame, BACKOFF_MULTIPLIER,
    INITIAL_RETRY_DELAY_MS, MAX_RETRY_ATTEMPTS, MAX_RETRY_DELAY_MS,
};
