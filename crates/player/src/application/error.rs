//! Service layer error types
//!
//! Errors surfaced to callers of the application services and the session.
//! Server failures keep the server's message verbatim.

use thiserror::Error;

use rally_domain::{ConversationId, DomainError, TournamentId, UserId};

use crate::ports::outbound::ApiError;

/// Errors that can occur in service operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The REST call failed; any optimistic change has been rolled back.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Input rejected before anything was sent.
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("Unknown conversation {0}")]
    UnknownConversation(ConversationId),
    #[error("Unknown tournament {0}")]
    UnknownTournament(TournamentId),
    #[error("No active session")]
    NoSession,
}

impl ServiceError {
    /// Check if this is an authorization error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}

/// Errors that abort the bootstrap sequence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Bootstrap failed: {0}")]
    Api(#[from] ApiError),
    #[error("Bootstrap payload belongs to {actual}, expected {expected}")]
    IdentityMismatch { expected: UserId, actual: UserId },
}
