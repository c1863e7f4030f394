//! Client-side state: the slice store, its slice types and read helpers.

pub mod lookup;
pub mod slices;
pub mod store;

pub use slices::{
    AchievementsSlice, ChannelHandle, ChannelKind, ChannelState, ChannelsSlice, GameSlice,
    IdentitySlice, MessagesSlice, NotificationsSlice, ProfileSlice, SessionPhase, SessionSlice,
    Slice, SliceKey, SocialSlice, TournamentsSlice,
};
pub use store::{SliceStore, Subscription};
