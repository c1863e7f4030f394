//! Application services
//!
//! The outward-facing user actions. Services depend on the `SocialApi` port
//! and emit events through the shared [`Optimistic`](super::Optimistic)
//! helper; they never write slices directly.

pub mod friend_service;
pub mod messaging_service;
pub mod profile_service;
pub mod tournament_service;

pub use friend_service::FriendService;
pub use messaging_service::MessagingService;
pub use profile_service::ProfileService;
pub use tournament_service::TournamentService;
