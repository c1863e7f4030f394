//! Application events.
//!
//! Every change to client state flows through an [`AppEvent`]: local user
//! actions (optimistic or confirmed) and translated server pushes alike. The
//! [`EventRouter`] applies each event to the store through the reducer table
//! and then fans it out to listeners registered for its [`EventKind`].

pub mod router;

use chrono::{DateTime, Utc};

use rally_domain::{
    AchievementId, ChatMessage, Conversation, ConversationId, Friend, FriendRequest,
    FriendRequestId, GameId, GameRecord, MessageId, Notification, NotificationId,
    PresenceStatus, Profile, Tournament, TournamentId, UserId, UserSummary,
};

pub use router::{EventRouter, ListenerHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // =========================================================================
    // Friend lifecycle
    // =========================================================================
    /// Local user sent a request; `request.id` is provisional.
    FriendRequestSent { request: FriendRequest },
    /// Undo of `FriendRequestSent`; removes exactly this request id.
    FriendRequestRetracted { request_id: FriendRequestId },
    FriendRequestReceived { request: FriendRequest },
    /// Either side accepted; `friend.status` comes from the presence probe.
    FriendRequestAccepted { friend: Friend },
    FriendRequestDeclined { user_id: UserId },
    FriendRemoved { user_id: UserId },
    /// Undo of a local `FriendRemoved`. `index` is the friend's position
    /// before removal; conversations are re-sorted into the current list.
    FriendRestored {
        friend: Friend,
        index: usize,
        conversations: Vec<Conversation>,
        active_chat: Option<ConversationId>,
    },
    UserBlocked { user: UserSummary },
    UserUnblocked { user_id: UserId },
    StatusUpdate {
        user_id: UserId,
        status: PresenceStatus,
    },

    // =========================================================================
    // Messaging
    // =========================================================================
    /// Pushed message; matched to its conversation by conversation id.
    MessageReceived {
        message: ChatMessage,
        counterpart: UserSummary,
    },
    /// Local send; matched to its conversation by counterpart member id.
    MessageSent {
        message: ChatMessage,
        counterpart: UserSummary,
    },
    /// Undo of `MessageSent`; removes exactly this message id.
    MessageRetracted { message_id: MessageId },
    ConversationAdded { conversation: Conversation },
    /// `None` closes the active chat.
    ConversationOpened {
        conversation_id: Option<ConversationId>,
    },

    // =========================================================================
    // Tournaments
    // =========================================================================
    TournamentCreated { tournament: Tournament },
    /// Full snapshot; inserted when unknown.
    TournamentUpdated { tournament: Tournament },
    TournamentJoined {
        tournament_id: TournamentId,
        players: Vec<UserSummary>,
    },
    TournamentLeft {
        tournament_id: TournamentId,
        players: Vec<UserSummary>,
    },
    /// Local join; adds only this player to the current roster.
    TournamentPlayerAdded {
        tournament_id: TournamentId,
        player: UserSummary,
    },
    /// Local leave, or undo of a local join; removes only this player.
    TournamentPlayerRemoved {
        tournament_id: TournamentId,
        user_id: UserId,
    },
    TournamentCancelled { tournament_id: TournamentId },
    TournamentMatch {
        tournament: Tournament,
        opponent: Option<UserSummary>,
    },

    // =========================================================================
    // Game, profile, alerts
    // =========================================================================
    GameFinished { game: GameRecord },
    GameInvite {
        from: UserSummary,
        game_id: Option<GameId>,
    },
    GameAccepted {
        opponent: UserSummary,
        game_id: Option<GameId>,
    },
    GameRejected { opponent: UserSummary },
    AchievementUnlocked { achievement_id: AchievementId },
    ProfileUpdated { profile: Profile },
    NotificationPushed { notification: Notification },
    NotificationRead { notification_id: NotificationId },
    NotificationsCleared,
}

/// Discriminant of [`AppEvent`], used to register listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FriendRequestSent,
    FriendRequestRetracted,
    FriendRequestReceived,
    FriendRequestAccepted,
    FriendRequestDeclined,
    FriendRemoved,
    FriendRestored,
    UserBlocked,
    UserUnblocked,
    StatusUpdate,
    MessageReceived,
    MessageSent,
    MessageRetracted,
    ConversationAdded,
    ConversationOpened,
    TournamentCreated,
    TournamentUpdated,
    TournamentJoined,
    TournamentLeft,
    TournamentPlayerAdded,
    TournamentPlayerRemoved,
    TournamentCancelled,
    TournamentMatch,
    GameFinished,
    GameInvite,
    GameAccepted,
    GameRejected,
    AchievementUnlocked,
    ProfileUpdated,
    NotificationPushed,
    NotificationRead,
    NotificationsCleared,
}

impl AppEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::FriendRequestSent { .. } => EventKind::FriendRequestSent,
            Self::FriendRequestRetracted { .. } => EventKind::FriendRequestRetracted,
            Self::FriendRequestReceived { .. } => EventKind::FriendRequestReceived,
            Self::FriendRequestAccepted { .. } => EventKind::FriendRequestAccepted,
            Self::FriendRequestDeclined { .. } => EventKind::FriendRequestDeclined,
            Self::FriendRemoved { .. } => EventKind::FriendRemoved,
            Self::FriendRestored { .. } => EventKind::FriendRestored,
            Self::UserBlocked { .. } => EventKind::UserBlocked,
            Self::UserUnblocked { .. } => EventKind::UserUnblocked,
            Self::StatusUpdate { .. } => EventKind::StatusUpdate,
            Self::MessageReceived { .. } => EventKind::MessageReceived,
            Self::MessageSent { .. } => EventKind::MessageSent,
            Self::MessageRetracted { .. } => EventKind::MessageRetracted,
            Self::ConversationAdded { .. } => EventKind::ConversationAdded,
            Self::ConversationOpened { .. } => EventKind::ConversationOpened,
            Self::TournamentCreated { .. } => EventKind::TournamentCreated,
            Self::TournamentUpdated { .. } => EventKind::TournamentUpdated,
            Self::TournamentJoined { .. } => EventKind::TournamentJoined,
            Self::TournamentLeft { .. } => EventKind::TournamentLeft,
            Self::TournamentPlayerAdded { .. } => EventKind::TournamentPlayerAdded,
            Self::TournamentPlayerRemoved { .. } => EventKind::TournamentPlayerRemoved,
            Self::TournamentCancelled { .. } => EventKind::TournamentCancelled,
            Self::TournamentMatch { .. } => EventKind::TournamentMatch,
            Self::GameFinished { .. } => EventKind::GameFinished,
            Self::GameInvite { .. } => EventKind::GameInvite,
            Self::GameAccepted { .. } => EventKind::GameAccepted,
            Self::GameRejected { .. } => EventKind::GameRejected,
            Self::AchievementUnlocked { .. } => EventKind::AchievementUnlocked,
            Self::ProfileUpdated { .. } => EventKind::ProfileUpdated,
            Self::NotificationPushed { .. } => EventKind::NotificationPushed,
            Self::NotificationRead { .. } => EventKind::NotificationRead,
            Self::NotificationsCleared => EventKind::NotificationsCleared,
        }
    }
}

/// What listeners receive: the event plus when the router accepted it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub event: AppEvent,
    pub timestamp: DateTime<Utc>,
}
