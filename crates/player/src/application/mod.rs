pub mod error;
pub mod optimistic;
pub mod search;
pub mod services;
pub mod session;

pub use error::{ServiceError, SessionError};
pub use optimistic::Optimistic;
pub use search::{UserSearch, DEFAULT_SEARCH_DEBOUNCE_MS};
pub use services::{FriendService, MessagingService, ProfileService, TournamentService};
pub use session::{Session, SessionLimits};
