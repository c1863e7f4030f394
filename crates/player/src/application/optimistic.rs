//! Optimistic mutations.
//!
//! A user action is applied locally first by emitting a provisional event.
//! If the server rejects it, the inverse event restores the previous state
//! exactly and the server's failure message is pushed as an error
//! notification. Success needs no follow-up: the server's own push for the
//! same entity is absorbed by reducer idempotence.

use std::future::Future;

use rally_domain::Notification;

use crate::events::{AppEvent, EventRouter};
use crate::ports::outbound::ApiError;

#[derive(Clone)]
pub struct Optimistic {
    router: EventRouter,
}

impl Optimistic {
    pub fn new(router: EventRouter) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// Emit `provisional`, await `call`, and undo with `inverse` on failure.
    ///
    /// `call` is not polled until after the provisional event has been
    /// applied.
    pub async fn run<T, F>(
        &self,
        provisional: AppEvent,
        inverse: AppEvent,
        call: F,
    ) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let kind = provisional.kind();
        self.router.emit(provisional);

        match call.await {
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::warn!(?kind, "Optimistic update rejected, rolling back: {}", error);
                self.router.emit(inverse);
                self.report_failure(&error);
                Err(error)
            }
        }
    }

    /// Await a call that has no local effect to undo, reporting a failure
    /// the same way `run` does.
    pub async fn confirm<T, F>(&self, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        call.await.inspect_err(|error| self.report_failure(error))
    }

    /// Push the server's failure message as an error notification.
    pub fn report_failure(&self, error: &ApiError) {
        self.router.emit(AppEvent::NotificationPushed {
            notification: Notification::error(error.to_string(), self.router.now()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::infrastructure::testing::fixtures::{self, FixedClock};
    use crate::state::{NotificationsSlice, SliceStore, SocialSlice};
    use rally_domain::{FriendRequest, FriendRequestId, NotificationKind};
    use std::sync::{Arc, Mutex};

    fn optimistic() -> Optimistic {
        let store = SliceStore::new();
        store.set(SocialSlice::default());
        store.set(NotificationsSlice::default());
        Optimistic::new(EventRouter::new(store, Arc::new(FixedClock::epoch())))
    }

    fn sent(request: &FriendRequest) -> (AppEvent, AppEvent) {
        (
            AppEvent::FriendRequestSent {
                request: request.clone(),
            },
            AppEvent::FriendRequestRetracted {
                request_id: request.id,
            },
        )
    }

    #[tokio::test]
    async fn provisional_change_is_visible_before_the_call_resolves() {
        let optimistic = optimistic();
        let store = optimistic.router().store().clone();
        let request = FriendRequest::new(
            FriendRequestId::new(),
            fixtures::user("ann"),
            fixtures::at(1),
        );
        let (provisional, inverse) = sent(&request);

        let seen_during_call = optimistic
            .run(provisional, inverse, async {
                let social = store.get::<SocialSlice>().expect("social");
                Ok::<_, ApiError>(social.friend_requests.sent.len())
            })
            .await
            .expect("call succeeds");

        assert_eq!(seen_during_call, 1);
        let social = store.get::<SocialSlice>().expect("social");
        assert_eq!(social.friend_requests.sent, vec![request]);
    }

    #[tokio::test]
    async fn failure_restores_state_and_reports_the_server_message() {
        let optimistic = optimistic();
        let store = optimistic.router().store().clone();
        let before = store.get::<SocialSlice>().expect("social");
        let kinds = Arc::new(Mutex::new(Vec::new()));
        for kind in [
            EventKind::FriendRequestSent,
            EventKind::FriendRequestRetracted,
            EventKind::NotificationPushed,
        ] {
            let kinds = Arc::clone(&kinds);
            optimistic.router().on(kind, move |record| {
                kinds.lock().expect("lock").push(record.kind);
            });
        }
        let request = FriendRequest::new(
            FriendRequestId::new(),
            fixtures::user("bob"),
            fixtures::at(1),
        );
        let (provisional, inverse) = sent(&request);

        let result: Result<(), _> = optimistic
            .run(provisional, inverse, async {
                Err(fixtures::server_error("Request already pending"))
            })
            .await;

        assert_eq!(result, Err(fixtures::server_error("Request already pending")));
        assert_eq!(*store.get::<SocialSlice>().expect("social"), *before);
        assert_eq!(
            *kinds.lock().expect("lock"),
            vec![
                EventKind::FriendRequestSent,
                EventKind::FriendRequestRetracted,
                EventKind::NotificationPushed,
            ]
        );
        let notifications = store.get::<NotificationsSlice>().expect("notifications");
        assert_eq!(notifications.notifications.len(), 1);
        assert_eq!(notifications.notifications[0].kind, NotificationKind::Error);
        assert_eq!(
            notifications.notifications[0].message,
            "Request already pending"
        );
    }

    #[tokio::test]
    async fn confirm_reports_without_emitting_an_inverse() {
        let optimistic = optimistic();
        let result: Result<(), _> = optimistic
            .confirm(async { Err(ApiError::Network("connection reset".into())) })
            .await;

        assert!(result.is_err());
        let notifications = optimistic
            .router()
            .store()
            .get::<NotificationsSlice>()
            .expect("notifications");
        assert_eq!(
            notifications.notifications[0].message,
            "Network error: connection reset"
        );
    }
}
