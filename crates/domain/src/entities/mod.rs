//! Domain entities - Core client-side objects with identity

mod achievement;
mod conversation;
mod friend;
mod game;
mod notification;
mod profile;
mod tournament;
mod user;

pub use achievement::Achievement;
pub use conversation::{ChatMessage, Conversation, ConversationMember};
pub use friend::{Friend, FriendRequest, FriendRequests};
pub use game::{CurrentGame, GameRecord, GameStats, DEFAULT_HISTORY_CAP};
pub use notification::{Notification, NotificationKind, DEFAULT_NOTIFICATION_CAP};
pub use profile::{Profile, ProfilePatch, MAX_BIO_LEN};
pub use tournament::{Tournament, TournamentStatus};
pub use user::{PresenceStatus, UserSummary};
