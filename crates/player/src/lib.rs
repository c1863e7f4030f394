//! Rally Player - client state-synchronization core.
//!
//! A slice-keyed store and a typed event router keep every view consistent
//! with server pushes arriving over the chat and notification channels and
//! with optimistic local mutations.
//!
//! - [`state`]: slice store and slice value types
//! - [`events`]: application events and the router
//! - [`reducers`]: the cross-slice reducer table
//! - [`application`]: services, optimistic helper, session lifecycle
//! - [`infrastructure`]: REST and WebSocket adapters, realtime channels
//! - [`ports`]: traits at the IO boundary

pub mod application;
pub mod client;
pub mod config;
pub mod events;
pub mod infrastructure;
pub mod ports;
pub mod reducers;
pub mod state;

#[cfg(test)]
mod e2e_tests;

pub use client::RallyClient;
pub use config::{ClientConfig, ConfigError};
