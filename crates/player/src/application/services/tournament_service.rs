//! Tournament Service - lobby membership and lifecycle
//!
//! Joining and leaving are optimistic; a rejection adds or removes only the
//! local user again, leaving roster changes pushed meanwhile in place. Creating, starting and stopping apply the server's
//! snapshot once it arrives.

use std::sync::Arc;

use rally_domain::{DomainError, Tournament, TournamentId, UserSummary};

use crate::application::optimistic::Optimistic;
use crate::application::ServiceError;
use crate::events::AppEvent;
use crate::ports::outbound::SocialApi;
use crate::state::lookup;
use crate::state::TournamentsSlice;

#[derive(Clone)]
pub struct TournamentService {
    api: Arc<dyn SocialApi>,
    optimistic: Optimistic,
}

impl TournamentService {
    pub fn new(api: Arc<dyn SocialApi>, optimistic: Optimistic) -> Self {
        Self { api, optimistic }
    }

    pub async fn create(&self, name: &str) -> Result<Tournament, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Tournament name cannot be empty").into());
        }
        let tournament = self
            .optimistic
            .confirm(self.api.create_tournament(name.to_string()))
            .await?;
        self.optimistic.router().emit(AppEvent::TournamentCreated {
            tournament: tournament.clone(),
        });
        Ok(tournament)
    }

    pub async fn join(&self, tournament_id: TournamentId) -> Result<(), ServiceError> {
        let (tournament, me) = self.snapshot(tournament_id)?;
        if tournament.has_player(me.id) {
            self.optimistic
                .confirm(self.api.join_tournament(tournament_id))
                .await?;
            return Ok(());
        }
        let user_id = me.id;
        self.optimistic
            .run(
                AppEvent::TournamentPlayerAdded {
                    tournament_id,
                    player: me,
                },
                AppEvent::TournamentPlayerRemoved {
                    tournament_id,
                    user_id,
                },
                self.api.join_tournament(tournament_id),
            )
            .await?;
        Ok(())
    }

    pub async fn leave(&self, tournament_id: TournamentId) -> Result<(), ServiceError> {
        let (tournament, me) = self.snapshot(tournament_id)?;
        let Some(player) = tournament.players.iter().find(|p| p.id == me.id).cloned() else {
            self.optimistic
                .confirm(self.api.leave_tournament(tournament_id))
                .await?;
            return Ok(());
        };
        self.optimistic
            .run(
                AppEvent::TournamentPlayerRemoved {
                    tournament_id,
                    user_id: player.id,
                },
                AppEvent::TournamentPlayerAdded {
                    tournament_id,
                    player,
                },
                self.api.leave_tournament(tournament_id),
            )
            .await?;
        Ok(())
    }

    pub async fn start(&self, tournament_id: TournamentId) -> Result<Tournament, ServiceError> {
        let tournament = self
            .optimistic
            .confirm(self.api.start_tournament(tournament_id))
            .await?;
        self.apply(&tournament);
        Ok(tournament)
    }

    pub async fn stop(&self, tournament_id: TournamentId) -> Result<Tournament, ServiceError> {
        let tournament = self
            .optimistic
            .confirm(self.api.stop_tournament(tournament_id))
            .await?;
        self.apply(&tournament);
        Ok(tournament)
    }

    fn apply(&self, tournament: &Tournament) {
        self.optimistic.router().emit(AppEvent::TournamentUpdated {
            tournament: tournament.clone(),
        });
    }

    /// Current snapshot of the tournament and the local user as a player.
    fn snapshot(
        &self,
        tournament_id: TournamentId,
    ) -> Result<(Tournament, UserSummary), ServiceError> {
        let store = self.optimistic.router().store();
        let me = lookup::local_user_id(store).ok_or(ServiceError::NoSession)?;
        let tournament = store
            .get::<TournamentsSlice>()
            .and_then(|t| t.tournament(tournament_id).cloned())
            .ok_or(ServiceError::UnknownTournament(tournament_id))?;
        Ok((tournament, lookup::known_user(store, me)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventRouter;
    use crate::infrastructure::testing::fixtures::{self, FixedClock};
    use crate::ports::outbound::MockSocialApi;
    use crate::state::{NotificationsSlice, SliceStore};
    use rally_domain::{TournamentStatus, UserId};

    fn harness(api: MockSocialApi) -> (TournamentService, SliceStore, UserId) {
        harness_with(|_| api)
    }

    /// Harness whose mock can emit pushes through the service's router.
    fn harness_with(
        build: impl FnOnce(EventRouter) -> MockSocialApi,
    ) -> (TournamentService, SliceStore, UserId) {
        let store = SliceStore::new();
        let me = UserId::new();
        fixtures::seed_session(&store, me);
        store.set(TournamentsSlice::default());
        store.set(NotificationsSlice::default());
        let router = EventRouter::new(store.clone(), Arc::new(FixedClock::epoch()));
        let api = build(router.clone());
        (
            TournamentService::new(Arc::new(api), Optimistic::new(router)),
            store,
            me,
        )
    }

    fn stored(store: &SliceStore, id: TournamentId) -> Tournament {
        store
            .get::<TournamentsSlice>()
            .and_then(|t| t.tournament(id).cloned())
            .expect("tournament")
    }

    #[tokio::test]
    async fn rejected_join_restores_the_previous_roster() {
        let rival = fixtures::user("rival");
        let cup = Tournament::new(TournamentId::new(), "Cup", rival.id)
            .with_players(vec![rival.clone()]);
        let mut api = MockSocialApi::new();
        api.expect_join_tournament()
            .returning(|_| Err(fixtures::server_error("Tournament is full")));
        let (service, store, _) = harness(api);
        store.set(TournamentsSlice::new(vec![cup.clone()]));

        let result = service.join(cup.id).await;

        assert_eq!(
            result.map_err(|e| e.to_string()),
            Err("Tournament is full".to_string())
        );
        assert_eq!(stored(&store, cup.id), cup);
    }

    #[tokio::test]
    async fn rejected_join_keeps_roster_changes_pushed_during_the_call() {
        let rival = fixtures::user("rival");
        let newcomer = fixtures::user("newcomer");
        let cup = Tournament::new(TournamentId::new(), "Cup", rival.id)
            .with_players(vec![rival.clone()]);
        let pushed = vec![rival.clone(), newcomer.clone()];
        let (service, store, me) = harness_with(move |router| {
            let mut api = MockSocialApi::new();
            api.expect_join_tournament().returning(move |id| {
                router.emit(AppEvent::TournamentJoined {
                    tournament_id: id,
                    players: pushed.clone(),
                });
                Err(fixtures::server_error("Tournament is full"))
            });
            api
        });
        store.set(TournamentsSlice::new(vec![cup.clone()]));

        assert!(service.join(cup.id).await.is_err());

        let after = stored(&store, cup.id);
        assert_eq!(after.players, vec![rival, newcomer]);
        assert_eq!(after.player_count, 2);
        assert!(!after.has_player(me));
    }

    #[tokio::test]
    async fn rejected_leave_puts_only_the_local_user_back() {
        let rival = fixtures::user("rival");
        let (service, store, me) = harness_with(move |router| {
            let mut api = MockSocialApi::new();
            api.expect_leave_tournament().returning(move |id| {
                router.emit(AppEvent::TournamentLeft {
                    tournament_id: id,
                    players: Vec::new(),
                });
                Err(fixtures::server_error("Tournament already started"))
            });
            api
        });
        let mine = UserSummary::new(me, "me");
        let cup = Tournament::new(TournamentId::new(), "Cup", me)
            .with_players(vec![mine.clone(), rival]);
        store.set(TournamentsSlice::new(vec![cup.clone()]));

        assert!(service.leave(cup.id).await.is_err());

        let after = stored(&store, cup.id);
        assert_eq!(after.players, vec![mine]);
        assert_eq!(after.player_count, 1);
    }

    #[tokio::test]
    async fn rejected_join_when_already_playing_keeps_the_membership() {
        let mut api = MockSocialApi::new();
        api.expect_join_tournament()
            .times(1)
            .returning(|_| Err(fixtures::server_error("Already joined")));
        let (service, store, me) = harness(api);
        let cup = Tournament::new(TournamentId::new(), "Cup", UserId::new())
            .with_players(vec![UserSummary::new(me, "me")]);
        store.set(TournamentsSlice::new(vec![cup.clone()]));

        assert!(service.join(cup.id).await.is_err());
        assert_eq!(stored(&store, cup.id), cup);
    }

    #[tokio::test]
    async fn join_then_leave_keeps_player_count_in_sync() {
        let mut api = MockSocialApi::new();
        api.expect_join_tournament().returning(|_| Ok(()));
        api.expect_leave_tournament().returning(|_| Ok(()));
        let (service, store, me) = harness(api);
        let cup = Tournament::new(TournamentId::new(), "Cup", UserId::new());
        store.set(TournamentsSlice::new(vec![cup.clone()]));

        service.join(cup.id).await.expect("joined");
        let joined = stored(&store, cup.id);
        assert!(joined.has_player(me));
        assert_eq!(joined.player_count, 1);

        service.leave(cup.id).await.expect("left");
        let left = stored(&store, cup.id);
        assert!(!left.has_player(me));
        assert_eq!(left.player_count, 0);
    }

    #[tokio::test]
    async fn unknown_tournament_is_reported_without_a_request() {
        let mut api = MockSocialApi::new();
        api.expect_join_tournament().never();
        let (service, _, _) = harness(api);
        let id = TournamentId::new();

        assert_eq!(
            service.join(id).await,
            Err(ServiceError::UnknownTournament(id))
        );
    }

    #[tokio::test]
    async fn start_applies_the_server_snapshot() {
        let (mut api, owner) = (MockSocialApi::new(), UserId::new());
        let cup = Tournament::new(TournamentId::new(), "Cup", owner);
        let mut running = cup.clone();
        running.status = TournamentStatus::Ongoing;
        let snapshot = running.clone();
        api.expect_start_tournament()
            .returning(move |_| Ok(snapshot.clone()));
        let (service, store, _) = harness(api);
        store.set(TournamentsSlice::new(vec![cup.clone()]));

        let started = service.start(cup.id).await.expect("started");

        assert_eq!(started, running);
        assert_eq!(stored(&store, cup.id).status, TournamentStatus::Ongoing);
    }

    #[tokio::test]
    async fn create_requires_a_name() {
        let mut api = MockSocialApi::new();
        api.expect_create_tournament().never();
        let (service, _, _) = harness(api);

        assert!(matches!(
            service.create("   ").await,
            Err(ServiceError::Validation(_))
        ));
    }
}
