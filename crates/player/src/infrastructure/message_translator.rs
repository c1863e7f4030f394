//! Translates push frames into application events.
//!
//! Each recognized frame becomes exactly one [`AppEvent`]. Payloads are
//! enriched on the way: bare user ids are resolved against the store, the
//! message counterpart is computed relative to the local user, and an
//! accepted friend's presence is probed before the event is emitted.
//! Malformed frames are logged at warn and dropped; unknown frame types at
//! debug.

use std::sync::Arc;

use rally_domain::{Friend, FriendRequest, PresenceStatus, Tournament, UserSummary};
use rally_shared::{ChatFrame, NotificationFrame, WireTournament, WireUser};

use crate::events::AppEvent;
use crate::infrastructure::websocket::{parse_chat_frame, parse_notification_frame, ParsedFrame};
use crate::ports::outbound::{ClockPort, SocialApi};
use crate::state::lookup;
use crate::state::{ChannelKind, SliceStore};

pub struct MessageTranslator {
    store: SliceStore,
    api: Arc<dyn SocialApi>,
    clock: Arc<dyn ClockPort>,
}

impl MessageTranslator {
    pub fn new(store: SliceStore, api: Arc<dyn SocialApi>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, api, clock }
    }

    /// Parse and translate one raw frame received on `channel`.
    pub async fn translate(&self, channel: ChannelKind, text: &str) -> Option<AppEvent> {
        let parsed = match channel {
            ChannelKind::Chat => parse_chat_frame(text),
            ChannelKind::Notifications => parse_notification_frame(text),
        };
        let frame = match parsed {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(%channel, "Dropping malformed frame: {}", e);
                return None;
            }
        };
        if frame.is_unknown() {
            tracing::debug!(%channel, "Ignoring frame of unknown type");
            return None;
        }
        tracing::debug!(%channel, frame_type = frame.type_name(), "Translating frame");

        match frame {
            ParsedFrame::Chat(frame) => self.translate_chat(frame),
            ParsedFrame::Notification(frame) => self.translate_notification(*frame).await,
        }
    }

    fn translate_chat(&self, frame: ChatFrame) -> Option<AppEvent> {
        match frame {
            ChatFrame::NewMessage(message) => {
                let other = match lookup::local_user_id(&self.store) {
                    Some(me) => message.other_party(me),
                    None => message.sender_id,
                };
                Some(AppEvent::MessageReceived {
                    counterpart: lookup::known_user(&self.store, other),
                    message,
                })
            }
            ChatFrame::ConversationAdded(wire) => Some(AppEvent::ConversationAdded {
                conversation: lookup::conversation_from_wire(&self.store, &wire),
            }),
            ChatFrame::Unknown => None,
        }
    }

    async fn translate_notification(&self, frame: NotificationFrame) -> Option<AppEvent> {
        let event = match frame {
            NotificationFrame::FriendRequestReceived {
                user,
                request_id,
                created_at,
            } => AppEvent::FriendRequestReceived {
                request: FriendRequest::new(
                    request_id.unwrap_or_default(),
                    self.resolve(&user),
                    created_at.unwrap_or_else(|| self.clock.now()),
                ),
            },
            NotificationFrame::FriendRequestAccepted { user } => {
                let status = self.probe_presence(&user).await;
                AppEvent::FriendRequestAccepted {
                    friend: Friend::new(self.resolve(&user), status),
                }
            }
            NotificationFrame::FriendRequestDeclined { user } => {
                AppEvent::FriendRequestDeclined { user_id: user.id }
            }
            NotificationFrame::StatusUpdate { user } => {
                let Some(status) = user.status else {
                    tracing::warn!(user_id = %user.id, "STATUS_UPDATE without a status");
                    return None;
                };
                AppEvent::StatusUpdate {
                    user_id: user.id,
                    status,
                }
            }
            NotificationFrame::FriendRemoved { user } => AppEvent::FriendRemoved { user_id: user.id },
            NotificationFrame::GameInvite { user, game_id } => AppEvent::GameInvite {
                from: self.resolve(&user),
                game_id,
            },
            NotificationFrame::GameAccepted { opponent, game_id } => AppEvent::GameAccepted {
                opponent: self.resolve(&opponent),
                game_id,
            },
            NotificationFrame::GameRejected { opponent } => AppEvent::GameRejected {
                opponent: self.resolve(&opponent),
            },
            NotificationFrame::TournamentMatch {
                tournament_data,
                opponent,
            } => AppEvent::TournamentMatch {
                tournament: self.tournament(&tournament_data),
                opponent: opponent.as_ref().map(|o| self.resolve(o)),
            },
            NotificationFrame::TournamentCreated { tournament_data } => {
                AppEvent::TournamentCreated {
                    tournament: self.tournament(&tournament_data),
                }
            }
            NotificationFrame::TournamentUpdated { tournament_data } => {
                AppEvent::TournamentUpdated {
                    tournament: self.tournament(&tournament_data),
                }
            }
            NotificationFrame::TournamentCancelled { tournament_data } => {
                AppEvent::TournamentCancelled {
                    tournament_id: tournament_data.id,
                }
            }
            NotificationFrame::TournamentJoined { tournament_data } => AppEvent::TournamentJoined {
                tournament_id: tournament_data.id,
                players: self.tournament(&tournament_data).players,
            },
            NotificationFrame::TournamentLeft { tournament_data } => AppEvent::TournamentLeft {
                tournament_id: tournament_data.id,
                players: self.tournament(&tournament_data).players,
            },
            NotificationFrame::AchievementUnlocked { achievement } => {
                AppEvent::AchievementUnlocked {
                    achievement_id: achievement.id,
                }
            }
            NotificationFrame::GameFinished { game } => AppEvent::GameFinished {
                game: game.to_record(self.resolve(&game.opponent)),
            },
            NotificationFrame::Unknown => return None,
        };
        Some(event)
    }

    fn resolve(&self, user: &WireUser) -> UserSummary {
        lookup::resolve_user(&self.store, user)
    }

    fn tournament(&self, wire: &WireTournament) -> Tournament {
        let mut tournament = wire.to_tournament();
        let players = wire.players.iter().map(|p| self.resolve(p)).collect();
        tournament.set_players(players);
        tournament
    }

    /// Presence of a newly accepted friend. Falls back to whatever the frame
    /// carried when the probe fails.
    async fn probe_presence(&self, user: &WireUser) -> PresenceStatus {
        match self.api.online_status(user.id).await {
            Ok(online) => PresenceStatus::from_online(online),
            Err(e) => {
                tracing::warn!(user_id = %user.id, "Presence probe failed: {}", e);
                user.status.unwrap_or_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{self, FixedClock};
    use crate::ports::outbound::{ApiError, MockSocialApi};
    use crate::state::SocialSlice;
    use rally_domain::{ConversationId, MessageId, UserId};
    use serde_json::json;

    fn translator(api: MockSocialApi) -> (MessageTranslator, SliceStore, UserId) {
        let store = SliceStore::new();
        let me = UserId::new();
        fixtures::seed_session(&store, me);
        let translator = MessageTranslator::new(
            store.clone(),
            Arc::new(api),
            Arc::new(FixedClock::epoch()),
        );
        (translator, store, me)
    }

    #[tokio::test]
    async fn malformed_and_unknown_frames_are_dropped() {
        let (translator, _, _) = translator(MockSocialApi::new());

        assert_eq!(translator.translate(ChannelKind::Chat, "{oops").await, None);
        assert_eq!(
            translator
                .translate(ChannelKind::Notifications, r#"{"type":"SEASON_RESET"}"#)
                .await,
            None
        );
        assert_eq!(
            translator
                .translate(ChannelKind::Chat, r#"{"type":"FRIEND_REMOVED","user":{"id":"x"}}"#)
                .await,
            None,
            "notification frames are unknown on the chat channel"
        );
    }

    #[tokio::test]
    async fn new_message_counterpart_is_relative_to_local_user() {
        let (translator, store, me) = translator(MockSocialApi::new());
        let friend = fixtures::user("bea");
        store.set(SocialSlice {
            friends: vec![Friend::new(friend.clone(), PresenceStatus::Online)],
            ..Default::default()
        });
        let frame = json!({
            "type": "new_message",
            "id": MessageId::new(),
            "conversationId": ConversationId::new(),
            "senderId": me,
            "receiverId": friend.id,
            "content": "gg",
            "createdAt": "2024-05-01T10:00:00Z",
        });

        let event = translator
            .translate(ChannelKind::Chat, &frame.to_string())
            .await
            .expect("translated");
        match event {
            AppEvent::MessageReceived { counterpart, .. } => assert_eq!(counterpart, friend),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn accepted_friend_status_comes_from_presence_probe() {
        let friend = fixtures::user("cid");
        let mut api = MockSocialApi::new();
        let probed = friend.id;
        api.expect_online_status()
            .withf(move |id| *id == probed)
            .times(1)
            .returning(|_| Ok(true));
        let (translator, _, _) = translator(api);
        let frame = json!({
            "type": "FRIEND_REQUEST_ACCEPTED",
            "user": {"id": friend.id, "username": "cid", "status": "offline"},
        });

        let event = translator
            .translate(ChannelKind::Notifications, &frame.to_string())
            .await;

        assert_eq!(
            event,
            Some(AppEvent::FriendRequestAccepted {
                friend: Friend::new(friend, PresenceStatus::Online),
            })
        );
    }

    #[tokio::test]
    async fn failed_probe_falls_back_to_frame_status() {
        let mut api = MockSocialApi::new();
        api.expect_online_status()
            .returning(|_| Err(ApiError::Network("timeout".into())));
        let (translator, _, _) = translator(api);
        let user = UserId::new();
        let frame = json!({
            "type": "FRIEND_REQUEST_ACCEPTED",
            "user": {"id": user, "username": "dee", "status": "online"},
        });

        let event = translator
            .translate(ChannelKind::Notifications, &frame.to_string())
            .await;

        let Some(AppEvent::FriendRequestAccepted { friend }) = event else {
            panic!("expected FriendRequestAccepted");
        };
        assert_eq!(friend.status, PresenceStatus::Online);
    }

    #[tokio::test]
    async fn tournament_roster_frames_carry_resolved_players() {
        let (translator, store, _) = translator(MockSocialApi::new());
        let friend = fixtures::user("eve");
        store.set(SocialSlice {
            friends: vec![Friend::new(friend.clone(), PresenceStatus::Online)],
            ..Default::default()
        });
        let tournament_id = rally_domain::TournamentId::new();
        let frame = json!({
            "type": "TOURNAMENT_JOINED",
            "tournamentData": {
                "id": tournament_id,
                "name": "Cup",
                "players": [{"id": friend.id}],
                "playerCount": 0,
                "createdBy": UserId::new(),
            }
        });

        let event = translator
            .translate(ChannelKind::Notifications, &frame.to_string())
            .await;

        assert_eq!(
            event,
            Some(AppEvent::TournamentJoined {
                tournament_id,
                players: vec![friend],
            })
        );
    }
}
