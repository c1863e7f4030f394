//! Composition root.
//!
//! Wires one store, one router and one channel manager to the services that
//! share them. Views hold a [`RallyClient`] (cheap to clone) and subscribe to
//! slices through [`RallyClient::store`].

use std::sync::Arc;

use crate::application::{
    FriendService, MessagingService, Optimistic, ProfileService, Session, TournamentService,
    UserSearch,
};
use crate::config::ClientConfig;
use crate::events::EventRouter;
use crate::infrastructure::realtime::ChannelManager;
use crate::infrastructure::{HttpSocialApi, SystemClock, TungsteniteTransport};
use crate::ports::outbound::{ChannelTransport, ClockPort, SocialApi};
use crate::state::{ChannelKind, SliceStore};

#[derive(Clone)]
pub struct RallyClient {
    pub router: EventRouter,
    pub channels: ChannelManager,
    pub session: Session,
    pub friends: FriendService,
    pub messaging: MessagingService,
    pub tournaments: TournamentService,
    pub profile: ProfileService,
    pub search: UserSearch,
}

impl RallyClient {
    pub fn new(
        config: &ClientConfig,
        api: Arc<dyn SocialApi>,
        transport: Arc<dyn ChannelTransport>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let store = SliceStore::new();
        let router = EventRouter::new(store.clone(), Arc::clone(&clock));
        let channels = ChannelManager::new(
            router.clone(),
            transport,
            Arc::clone(&api),
            clock,
            config.endpoints.clone(),
            config.reconnect,
        );
        let optimistic = Optimistic::new(router.clone());

        Self {
            session: Session::new(
                router.clone(),
                Arc::clone(&api),
                channels.clone(),
                config.auth_token.clone(),
                config.limits,
            ),
            friends: FriendService::new(Arc::clone(&api), optimistic.clone()),
            messaging: MessagingService::new(Arc::clone(&api), optimistic.clone()),
            tournaments: TournamentService::new(Arc::clone(&api), optimistic.clone()),
            profile: ProfileService::new(Arc::clone(&api), optimistic),
            search: UserSearch::new(api, store, config.search_debounce),
            channels,
            router,
        }
    }

    /// Client backed by the REST API and real WebSockets.
    pub fn from_config(config: &ClientConfig) -> Self {
        let api = HttpSocialApi::new(
            config.api_url.clone(),
            config.auth_token.clone(),
            config.request_timeout_ms,
        );
        Self::new(
            config,
            Arc::new(api),
            Arc::new(TungsteniteTransport::new()),
            Arc::new(SystemClock),
        )
    }

    pub fn store(&self) -> &SliceStore {
        self.router.store()
    }

    /// Retry a channel that gave up. See [`ChannelManager::reconnect`].
    pub fn reconnect(&self, channel: ChannelKind) -> bool {
        self.channels.reconnect(channel)
    }
}
