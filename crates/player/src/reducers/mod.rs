//! Cross-slice reducer table.
//!
//! One routine per event kind. A routine reads whatever slices it needs and
//! writes each affected slice with a single store update. Routines addressing
//! an uninitialized slice do nothing. All routines are idempotent for
//! duplicate deliveries of the same entity id.

mod activity;
mod messaging;
mod social;
mod tournaments;

pub(crate) use messaging::pin_then_sort;

use crate::events::{AppEvent, EventRecord};
use crate::state::SliceStore;

pub fn reduce(store: &SliceStore, record: &EventRecord) {
    let at = record.timestamp;
    match &record.event {
        AppEvent::FriendRequestSent { request } => social::request_sent(store, request),
        AppEvent::FriendRequestRetracted { request_id } => {
            social::request_retracted(store, *request_id)
        }
        AppEvent::FriendRequestReceived { request } => {
            social::request_received(store, request, at)
        }
        AppEvent::FriendRequestAccepted { friend } => social::request_accepted(store, friend),
        AppEvent::FriendRequestDeclined { user_id } => social::request_declined(store, *user_id),
        AppEvent::FriendRemoved { user_id } => social::friend_removed(store, *user_id),
        AppEvent::FriendRestored {
            friend,
            index,
            conversations,
            active_chat,
        } => social::friend_restored(store, friend, *index, conversations, *active_chat),
        AppEvent::UserBlocked { user } => social::user_blocked(store, user),
        AppEvent::UserUnblocked { user_id } => social::user_unblocked(store, *user_id),
        AppEvent::StatusUpdate { user_id, status } => {
            social::status_update(store, *user_id, *status, at)
        }

        AppEvent::MessageReceived {
            message,
            counterpart,
        } => messaging::message_received(store, message, counterpart),
        AppEvent::MessageSent {
            message,
            counterpart,
        } => messaging::message_sent(store, message, counterpart),
        AppEvent::MessageRetracted { message_id } => {
            messaging::message_retracted(store, *message_id)
        }
        AppEvent::ConversationAdded { conversation } => {
            messaging::conversation_added(store, conversation)
        }
        AppEvent::ConversationOpened { conversation_id } => {
            messaging::conversation_opened(store, *conversation_id)
        }

        AppEvent::TournamentCreated { tournament } => tournaments::created(store, tournament),
        AppEvent::TournamentUpdated { tournament } => tournaments::updated(store, tournament),
        AppEvent::TournamentJoined {
            tournament_id,
            players,
        }
        | AppEvent::TournamentLeft {
            tournament_id,
            players,
        } => tournaments::roster_changed(store, *tournament_id, players),
        AppEvent::TournamentPlayerAdded {
            tournament_id,
            player,
        } => tournaments::player_added(store, *tournament_id, player),
        AppEvent::TournamentPlayerRemoved {
            tournament_id,
            user_id,
        } => tournaments::player_removed(store, *tournament_id, *user_id),
        AppEvent::TournamentCancelled { tournament_id } => {
            tournaments::cancelled(store, *tournament_id)
        }
        AppEvent::TournamentMatch {
            tournament,
            opponent,
        } => tournaments::matched(store, tournament, opponent.as_ref(), at),

        AppEvent::GameFinished { game } => activity::game_finished(store, game),
        AppEvent::GameInvite { from, game_id } => activity::game_invite(store, from, *game_id, at),
        AppEvent::GameAccepted { opponent, game_id } => {
            activity::game_accepted(store, opponent, *game_id, at)
        }
        AppEvent::GameRejected { opponent } => activity::game_rejected(store, opponent, at),
        AppEvent::AchievementUnlocked { achievement_id } => {
            activity::achievement_unlocked(store, *achievement_id, at)
        }
        AppEvent::ProfileUpdated { profile } => activity::profile_updated(store, profile),
        AppEvent::NotificationPushed { notification } => {
            activity::push_notification(store, notification.clone())
        }
        AppEvent::NotificationRead { notification_id } => {
            activity::notification_read(store, *notification_id)
        }
        AppEvent::NotificationsCleared => activity::notifications_cleared(store),
    }
}
