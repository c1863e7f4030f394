//! Realtime channel manager.
//!
//! Two push channels (chat, notifications) share one state machine and one
//! ordered dispatcher:
//!
//! ```text
//! Disabled            (no token)
//! Connecting -> Open -> Closed { retry_in_ms, attempt } -> Connecting ...
//!                                                      -> Offline (attempts exhausted)
//! any -> Terminated   (logout)
//! ```
//!
//! Every (re)start of a channel takes a fresh generation. Background work
//! carries the generation it was started with and stops as soon as the
//! realtime-channels slice holds a different one, so a replaced or terminated
//! channel can never write state or emit events.

mod channel;
mod dispatcher;
mod manager;

pub use manager::{ChannelEndpoints, ChannelManager};
