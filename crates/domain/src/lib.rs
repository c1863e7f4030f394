//! Rally domain types.
//!
//! Plain data shared by the wire vocabulary (`rally-shared`) and the client core
//! (`rally-player`). Nothing here performs IO.

pub mod entities;
pub mod error;
pub mod ids;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    Achievement, ChatMessage, Conversation, ConversationMember, CurrentGame, Friend,
    FriendRequest, FriendRequests, GameRecord, GameStats, Notification, NotificationKind,
    PresenceStatus, Profile, ProfilePatch, Tournament, TournamentStatus, UserSummary,
    DEFAULT_HISTORY_CAP, DEFAULT_NOTIFICATION_CAP, MAX_BIO_LEN,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{
    AchievementId, ConversationId, FriendRequestId, GameId, MessageId, NotificationId,
    TournamentId, UserId,
};
