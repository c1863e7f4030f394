//! Tournament lifecycle. Every write keeps `player_count == players.len()`.

use chrono::{DateTime, Utc};

use rally_domain::{
    Notification, NotificationKind, Tournament, TournamentId, TournamentStatus, UserId,
    UserSummary,
};

use super::activity::push_notification;
use crate::state::{SliceStore, TournamentsSlice};

pub(super) fn created(store: &SliceStore, tournament: &Tournament) {
    store.try_update::<TournamentsSlice>(|slice| {
        if slice.tournament(tournament.id).is_some() {
            return None;
        }
        let mut next = slice.clone();
        next.tournaments.push(tournament.clone().normalized());
        Some(next)
    });
}

pub(super) fn updated(store: &SliceStore, tournament: &Tournament) {
    let snapshot = tournament.clone().normalized();
    store.try_update::<TournamentsSlice>(|slice| {
        let mut next = slice.clone();
        match next.tournaments.iter_mut().find(|t| t.id == snapshot.id) {
            Some(existing) if *existing == snapshot => return None,
            Some(existing) => *existing = snapshot,
            None => next.tournaments.push(snapshot),
        }
        Some(next)
    });
}

pub(super) fn roster_changed(store: &SliceStore, tournament_id: TournamentId, players: &[UserSummary]) {
    store.try_update::<TournamentsSlice>(|slice| {
        let mut next = slice.clone();
        let tournament = next.tournaments.iter_mut().find(|t| t.id == tournament_id)?;
        if tournament.players == players && tournament.player_count as usize == players.len() {
            return None;
        }
        tournament.set_players(players.to_vec());
        Some(next)
    });
}

pub(super) fn player_added(store: &SliceStore, tournament_id: TournamentId, player: &UserSummary) {
    store.try_update::<TournamentsSlice>(|slice| {
        let mut next = slice.clone();
        let tournament = next.tournaments.iter_mut().find(|t| t.id == tournament_id)?;
        tournament.add_player(player).then_some(next)
    });
}

pub(super) fn player_removed(store: &SliceStore, tournament_id: TournamentId, user_id: UserId) {
    store.try_update::<TournamentsSlice>(|slice| {
        let mut next = slice.clone();
        let tournament = next.tournaments.iter_mut().find(|t| t.id == tournament_id)?;
        tournament.remove_player(user_id).then_some(next)
    });
}

pub(super) fn cancelled(store: &SliceStore, tournament_id: TournamentId) {
    store.try_update::<TournamentsSlice>(|slice| {
        let mut next = slice.clone();
        let tournament = next.tournaments.iter_mut().find(|t| t.id == tournament_id)?;
        if tournament.status == TournamentStatus::Cancelled {
            return None;
        }
        tournament.status = TournamentStatus::Cancelled;
        Some(next)
    });
}

pub(super) fn matched(
    store: &SliceStore,
    tournament: &Tournament,
    opponent: Option<&UserSummary>,
    at: DateTime<Utc>,
) {
    updated(store, tournament);

    let message = match opponent {
        Some(opponent) => format!(
            "Your match in {} against {} is ready",
            tournament.name,
            opponent.label()
        ),
        None => format!("Your match in {} is ready", tournament.name),
    };
    let mut notification = Notification::new(NotificationKind::TournamentMatch, message, at);
    if let Some(opponent) = opponent {
        notification = notification.with_actor(opponent.clone());
    }
    push_notification(store, notification);
}
