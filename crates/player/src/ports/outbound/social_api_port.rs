//! Social API Port - REST boundary
//!
//! Every call the state core makes against the backend goes through this
//! trait. Failure messages reported by the server are carried verbatim in
//! [`ApiError::Server`] so they can be shown to the user unchanged.

use thiserror::Error;

use rally_domain::{
    Achievement, ConversationId, Profile, ProfilePatch, Tournament, TournamentId, UserId,
    UserSummary,
};
use rally_shared::{BootstrapPayload, SendMessageRequest, WireConversation};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a failure; `message` is user-facing.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Server { status: 401, .. })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SocialApi: Send + Sync {
    // -- bootstrap ----------------------------------------------------------

    async fn fetch_bootstrap(&self) -> Result<BootstrapPayload, ApiError>;

    async fn fetch_online_count(&self) -> Result<u32, ApiError>;

    /// Conversations as the server reports them; members are ids only.
    async fn fetch_conversations(&self) -> Result<Vec<WireConversation>, ApiError>;

    async fn fetch_tournaments(&self) -> Result<Vec<Tournament>, ApiError>;

    async fn fetch_achievement_catalogue(&self) -> Result<Vec<Achievement>, ApiError>;

    /// Presence probe for a single user.
    async fn online_status(&self, user_id: UserId) -> Result<bool, ApiError>;

    // -- friends ------------------------------------------------------------

    async fn send_friend_request(&self, user_id: UserId) -> Result<(), ApiError>;

    async fn accept_friend_request(&self, user_id: UserId) -> Result<(), ApiError>;

    async fn decline_friend_request(&self, user_id: UserId) -> Result<(), ApiError>;

    async fn remove_friend(&self, user_id: UserId) -> Result<(), ApiError>;

    async fn block_user(&self, user_id: UserId) -> Result<(), ApiError>;

    async fn unblock_user(&self, user_id: UserId) -> Result<(), ApiError>;

    async fn search_users(&self, query: String) -> Result<Vec<UserSummary>, ApiError>;

    // -- tournaments --------------------------------------------------------

    async fn create_tournament(&self, name: String) -> Result<Tournament, ApiError>;

    async fn join_tournament(&self, id: TournamentId) -> Result<(), ApiError>;

    async fn leave_tournament(&self, id: TournamentId) -> Result<(), ApiError>;

    async fn start_tournament(&self, id: TournamentId) -> Result<Tournament, ApiError>;

    async fn stop_tournament(&self, id: TournamentId) -> Result<Tournament, ApiError>;

    // -- messaging ----------------------------------------------------------

    /// Open (or create) the direct conversation with `user_id`.
    async fn open_conversation(&self, user_id: UserId) -> Result<WireConversation, ApiError>;

    async fn fetch_conversation(&self, id: ConversationId) -> Result<WireConversation, ApiError>;

    async fn send_message(&self, request: SendMessageRequest) -> Result<(), ApiError>;

    // -- profile ------------------------------------------------------------

    async fn update_profile(&self, patch: ProfilePatch) -> Result<Profile, ApiError>;
}
