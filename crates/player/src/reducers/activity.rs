//! Game results, achievements, profile edits and the notification list.

use chrono::{DateTime, Utc};

use rally_domain::{
    AchievementId, CurrentGame, GameId, GameRecord, Notification, NotificationId,
    NotificationKind, Profile, UserSummary,
};

use crate::state::{AchievementsSlice, GameSlice, NotificationsSlice, ProfileSlice, SliceStore};

pub(super) fn game_finished(store: &SliceStore, game: &GameRecord) {
    store.try_update::<GameSlice>(|slice| {
        if slice.history.iter().any(|g| g.id == game.id) {
            return None;
        }
        let mut next = slice.clone();
        next.stats.record(game.won);
        next.history.push(game.clone());
        if next.history.len() > next.history_cap {
            let excess = next.history.len() - next.history_cap;
            next.history.drain(..excess);
        }
        if next
            .current_game
            .as_ref()
            .is_some_and(|current| current.id == Some(game.id))
        {
            next.current_game = None;
        }
        Some(next)
    });
}

pub(super) fn game_invite(
    store: &SliceStore,
    from: &UserSummary,
    _game_id: Option<GameId>,
    at: DateTime<Utc>,
) {
    let message = format!("{} invited you to a game", from.label());
    push_notification(
        store,
        Notification::new(NotificationKind::GameInvite, message, at).with_actor(from.clone()),
    );
}

pub(super) fn game_accepted(
    store: &SliceStore,
    opponent: &UserSummary,
    game_id: Option<GameId>,
    at: DateTime<Utc>,
) {
    store.update::<GameSlice>(|slice| GameSlice {
        current_game: Some(CurrentGame {
            id: game_id,
            opponent: opponent.clone(),
        }),
        ..slice.clone()
    });

    let message = format!("{} accepted your game invite", opponent.label());
    push_notification(
        store,
        Notification::new(NotificationKind::GameAccepted, message, at)
            .with_actor(opponent.clone()),
    );
}

pub(super) fn game_rejected(store: &SliceStore, opponent: &UserSummary, at: DateTime<Utc>) {
    store.try_update::<GameSlice>(|slice| {
        let pending = slice.current_game.as_ref()?;
        if pending.opponent.id != opponent.id {
            return None;
        }
        Some(GameSlice {
            current_game: None,
            ..slice.clone()
        })
    });

    let message = format!("{} declined your game invite", opponent.label());
    push_notification(
        store,
        Notification::new(NotificationKind::GameRejected, message, at)
            .with_actor(opponent.clone()),
    );
}

pub(super) fn achievement_unlocked(
    store: &SliceStore,
    achievement_id: AchievementId,
    at: DateTime<Utc>,
) {
    let mut unlocked_name = None;
    store.try_update::<AchievementsSlice>(|slice| {
        let Some(entry) = slice.catalogue_entry(achievement_id) else {
            tracing::warn!(%achievement_id, "Unlocked achievement is not in the catalogue");
            return None;
        };
        if slice.is_unlocked(achievement_id) {
            return None;
        }
        unlocked_name = Some(entry.name.clone());
        let mut next = slice.clone();
        next.user_achievement_ids.push(achievement_id);
        Some(next)
    });

    if let Some(name) = unlocked_name {
        push_notification(
            store,
            Notification::new(
                NotificationKind::Achievement,
                format!("Achievement unlocked: {}", name),
                at,
            ),
        );
    }
}

pub(super) fn profile_updated(store: &SliceStore, profile: &Profile) {
    store.try_update::<ProfileSlice>(|slice| {
        (slice.profile != *profile).then(|| ProfileSlice {
            profile: profile.clone(),
        })
    });
}

/// Newest first; the oldest entries beyond the cap are dropped.
pub(super) fn push_notification(store: &SliceStore, notification: Notification) {
    store.try_update::<NotificationsSlice>(|slice| {
        if slice.notifications.iter().any(|n| n.id == notification.id) {
            return None;
        }
        let mut next = slice.clone();
        next.notifications.insert(0, notification);
        next.notifications.truncate(next.cap);
        next.recount();
        Some(next)
    });
}

pub(super) fn notification_read(store: &SliceStore, notification_id: NotificationId) {
    store.try_update::<NotificationsSlice>(|slice| {
        let mut next = slice.clone();
        let notification = next
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && !n.read)?;
        notification.read = true;
        next.recount();
        Some(next)
    });
}

pub(super) fn notifications_cleared(store: &SliceStore) {
    store.try_update::<NotificationsSlice>(|slice| {
        if slice.notifications.is_empty() {
            return None;
        }
        Some(NotificationsSlice::new(slice.cap))
    });
}
