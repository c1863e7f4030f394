//! Rally Shared - wire vocabulary between the Rally server and the client
//!
//! This crate contains the types that cross the network boundary:
//! - Realtime push frames (`ChatFrame`, `NotificationFrame`)
//! - REST request bodies
//! - REST response payloads (bootstrap, presence, errors)
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **Forward compatible** - unknown frame types parse to `Unknown`
//! 3. **camelCase on the wire** - field names follow the server's JSON

pub mod messages;
pub mod requests;
pub mod responses;

pub use messages::{
    ChatFrame, NotificationFrame, WireAchievement, WireConversation, WireGameResult, WireMember,
    WireTournament, WireUser,
};
pub use requests::{
    CreateTournamentRequest, FriendTargetRequest, SendMessageRequest, UserSearchQuery,
};
pub use responses::{
    ApiErrorBody, BootstrapPayload, OnlineCountResponse, OnlineStatusResponse,
    WireFriendRequest, WireFriendRequests,
};
