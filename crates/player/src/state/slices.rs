//! Slice value types.
//!
//! Each slice is an independent value in the [`SliceStore`](super::SliceStore).
//! Slices never reference each other; reducers keep them consistent.

use std::any::Any;
use std::fmt;

use chrono::{DateTime, Utc};

use rally_domain::{
    Achievement, AchievementId, Conversation, ConversationId, CurrentGame, Friend,
    FriendRequests, GameRecord, GameStats, Notification, Profile, Tournament, TournamentId,
    UserId, UserSummary, DEFAULT_HISTORY_CAP, DEFAULT_NOTIFICATION_CAP,
};

/// Name of a slice in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceKey {
    Identity,
    Profile,
    Game,
    Social,
    Achievements,
    Notifications,
    Messages,
    Tournaments,
    Channels,
    Session,
}

impl fmt::Display for SliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Identity => "identity",
            Self::Profile => "profile",
            Self::Game => "game",
            Self::Social => "social",
            Self::Achievements => "achievements",
            Self::Notifications => "notifications",
            Self::Messages => "messages",
            Self::Tournaments => "tournaments",
            Self::Channels => "realtime-channels",
            Self::Session => "session",
        };
        f.write_str(s)
    }
}

/// A value type that can live in the store under a fixed key.
pub trait Slice: Any + Send + Sync + Clone + fmt::Debug {
    const KEY: SliceKey;
}

macro_rules! impl_slice {
    ($ty:ty => $key:ident) => {
        impl Slice for $ty {
            const KEY: SliceKey = SliceKey::$key;
        }
    };
}

// =============================================================================
// identity / profile / session
// =============================================================================

/// The authenticated user as the rest of the world sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySlice {
    pub id: UserId,
    pub online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSlice {
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Bootstrapping,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSlice {
    pub user_id: UserId,
    pub phase: SessionPhase,
    pub started_at: DateTime<Utc>,
}

impl SessionSlice {
    pub fn is_ready(&self) -> bool {
        self.phase == SessionPhase::Ready
    }
}

// =============================================================================
// game / achievements
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSlice {
    pub stats: GameStats,
    /// Oldest first; never longer than `history_cap`.
    pub history: Vec<GameRecord>,
    pub current_game: Option<CurrentGame>,
    pub history_cap: usize,
}

impl GameSlice {
    pub fn new(stats: GameStats, mut history: Vec<GameRecord>, history_cap: usize) -> Self {
        if history.len() > history_cap {
            history.drain(..history.len() - history_cap);
        }
        Self {
            stats,
            history,
            current_game: None,
            history_cap,
        }
    }
}

impl Default for GameSlice {
    fn default() -> Self {
        Self::new(GameStats::default(), Vec::new(), DEFAULT_HISTORY_CAP)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementsSlice {
    pub all_achievements: Vec<Achievement>,
    pub user_achievement_ids: Vec<AchievementId>,
}

impl AchievementsSlice {
    /// Build the slice, dropping unlocked ids that are not in the catalogue.
    pub fn new(all_achievements: Vec<Achievement>, unlocked: Vec<AchievementId>) -> Self {
        let mut user_achievement_ids = Vec::with_capacity(unlocked.len());
        for id in unlocked {
            if all_achievements.iter().any(|a| a.id == id) && !user_achievement_ids.contains(&id) {
                user_achievement_ids.push(id);
            }
        }
        Self {
            all_achievements,
            user_achievement_ids,
        }
    }

    pub fn catalogue_entry(&self, id: AchievementId) -> Option<&Achievement> {
        self.all_achievements.iter().find(|a| a.id == id)
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.user_achievement_ids.contains(&id)
    }
}

// =============================================================================
// social
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialSlice {
    pub friends: Vec<Friend>,
    pub friend_requests: FriendRequests,
    pub online_users: u32,
    pub blocked: Vec<UserSummary>,
}

impl SocialSlice {
    pub fn friend(&self, user_id: UserId) -> Option<&Friend> {
        self.friends.iter().find(|f| f.id() == user_id)
    }

    pub fn is_friend(&self, user_id: UserId) -> bool {
        self.friend(user_id).is_some()
    }

    pub fn is_blocked(&self, user_id: UserId) -> bool {
        self.blocked.iter().any(|u| u.id == user_id)
    }
}

// =============================================================================
// notifications
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationsSlice {
    /// Newest first.
    pub notifications: Vec<Notification>,
    pub unread_count: u32,
    pub cap: usize,
}

impl NotificationsSlice {
    pub fn new(cap: usize) -> Self {
        Self {
            notifications: Vec::new(),
            unread_count: 0,
            cap,
        }
    }

    pub(crate) fn recount(&mut self) {
        self.unread_count = self.notifications.iter().filter(|n| !n.read).count() as u32;
    }
}

impl Default for NotificationsSlice {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_CAP)
    }
}

// =============================================================================
// messages
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagesSlice {
    pub conversations: Vec<Conversation>,
    /// Sum of every conversation's unread count.
    pub unread_count: u32,
    pub active_chat: Option<ConversationId>,
}

impl MessagesSlice {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        let mut slice = Self {
            conversations,
            unread_count: 0,
            active_chat: None,
        };
        slice.recount();
        slice
    }

    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// The direct conversation with `user_id`, if any.
    pub fn conversation_with(&self, user_id: UserId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.has_member(user_id))
    }

    pub(crate) fn recount(&mut self) {
        self.unread_count = self.conversations.iter().map(|c| c.unread_count).sum();
    }
}

// =============================================================================
// tournaments
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentsSlice {
    pub tournaments: Vec<Tournament>,
}

impl TournamentsSlice {
    pub fn new(tournaments: Vec<Tournament>) -> Self {
        Self {
            tournaments: tournaments.into_iter().map(Tournament::normalized).collect(),
        }
    }

    pub fn tournament(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournaments.iter().find(|t| t.id == id)
    }
}

// =============================================================================
// realtime channels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Chat,
    Notifications,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 2] = [ChannelKind::Chat, ChannelKind::Notifications];
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::Notifications => write!(f, "notifications"),
        }
    }
}

/// Lifecycle of one push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No auth token; the channel is never opened.
    Disabled,
    Connecting,
    Open,
    /// Waiting `retry_in_ms` before reconnect attempt number `attempt`.
    Closed { retry_in_ms: u64, attempt: u32 },
    /// Reconnect attempts exhausted. Only an explicit reconnect leaves this state.
    Offline,
    /// Session ended.
    Terminated,
}

impl ChannelState {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelHandle {
    pub channel: ChannelKind,
    pub generation: u64,
    pub state: ChannelState,
}

impl ChannelHandle {
    pub fn new(channel: ChannelKind, generation: u64, state: ChannelState) -> Self {
        Self {
            channel,
            generation,
            state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelsSlice {
    pub chat: ChannelHandle,
    pub notifications: ChannelHandle,
}

impl ChannelsSlice {
    pub fn new(chat: ChannelHandle, notifications: ChannelHandle) -> Self {
        Self {
            chat,
            notifications,
        }
    }

    pub fn handle(&self, kind: ChannelKind) -> ChannelHandle {
        match kind {
            ChannelKind::Chat => self.chat,
            ChannelKind::Notifications => self.notifications,
        }
    }

    pub fn with_handle(mut self, handle: ChannelHandle) -> Self {
        match handle.channel {
            ChannelKind::Chat => self.chat = handle,
            ChannelKind::Notifications => self.notifications = handle,
        }
        self
    }

    pub fn is_terminated(&self) -> bool {
        self.chat.state == ChannelState::Terminated
            && self.notifications.state == ChannelState::Terminated
    }
}

impl_slice!(IdentitySlice => Identity);
impl_slice!(ProfileSlice => Profile);
impl_slice!(GameSlice => Game);
impl_slice!(SocialSlice => Social);
impl_slice!(AchievementsSlice => Achievements);
impl_slice!(NotificationsSlice => Notifications);
impl_slice!(MessagesSlice => Messages);
impl_slice!(TournamentsSlice => Tournaments);
impl_slice!(ChannelsSlice => Channels);
impl_slice!(SessionSlice => Session);
