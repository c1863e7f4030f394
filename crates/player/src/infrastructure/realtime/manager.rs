use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use super::channel::run_channel;
use super::dispatcher::{run_dispatcher, InboundFrame};
use crate::events::EventRouter;
use crate::infrastructure::message_translator::MessageTranslator;
use crate::infrastructure::websocket::ReconnectPolicy;
use crate::ports::outbound::{ChannelTransport, ClockPort, SocialApi};
use crate::state::{ChannelHandle, ChannelKind, ChannelState, ChannelsSlice, SliceStore};

/// Socket URLs of the two channels. The auth token is appended as a
/// `token` query parameter when a channel is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEndpoints {
    pub chat: Url,
    pub notifications: Url,
}

impl ChannelEndpoints {
    pub fn url(&self, channel: ChannelKind) -> &Url {
        match channel {
            ChannelKind::Chat => &self.chat,
            ChannelKind::Notifications => &self.notifications,
        }
    }
}

struct Dispatcher {
    frames: mpsc::UnboundedSender<InboundFrame>,
    task: JoinHandle<()>,
}

pub(super) struct ManagerInner {
    pub(super) store: SliceStore,
    pub(super) router: EventRouter,
    pub(super) transport: Arc<dyn ChannelTransport>,
    pub(super) translator: MessageTranslator,
    pub(super) policy: ReconnectPolicy,
    endpoints: ChannelEndpoints,
    generation: AtomicU64,
    token: Mutex<Option<String>>,
    tasks: Mutex<HashMap<ChannelKind, JoinHandle<()>>>,
    dispatcher: Mutex<Option<Dispatcher>>,
}

impl ManagerInner {
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Install `handle` as the channel's current handle.
    fn replace_handle(&self, handle: ChannelHandle) {
        if !self.store.update::<ChannelsSlice>(|c| c.with_handle(handle)) {
            let disabled = |kind| ChannelHandle::new(kind, 0, ChannelState::Disabled);
            self.store.set(
                ChannelsSlice::new(
                    disabled(ChannelKind::Chat),
                    disabled(ChannelKind::Notifications),
                )
                .with_handle(handle),
            );
        }
    }

    /// Move the channel to `state` if `generation` is still current.
    /// Returns `false` for a stale generation.
    pub(super) fn set_state(&self, channel: ChannelKind, generation: u64, state: ChannelState) -> bool {
        let current = self.store.try_update::<ChannelsSlice>(|c| {
            let handle = c.handle(channel);
            if handle.generation != generation || handle.state == ChannelState::Terminated {
                return None;
            }
            Some(c.with_handle(ChannelHandle::new(channel, generation, state)))
        });
        if !current {
            tracing::debug!(%channel, generation, "Stale channel task stopping");
        }
        current
    }

    pub(super) fn is_current(&self, channel: ChannelKind, generation: u64) -> bool {
        self.store.get::<ChannelsSlice>().is_some_and(|c| {
            let handle = c.handle(channel);
            handle.generation == generation && handle.state != ChannelState::Terminated
        })
    }

    fn abort_task(&self, channel: ChannelKind) {
        let previous = self
            .tasks
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&channel);
        if let Some(task) = previous {
            task.abort();
        }
    }
}

/// Owns both push channels and their dispatcher.
///
/// Cloning is cheap. Dropping the manager does NOT stop the channels; call
/// [`terminate`](Self::terminate).
#[derive(Clone)]
pub struct ChannelManager {
    inner: Arc<ManagerInner>,
}

impl ChannelManager {
    pub fn new(
        router: EventRouter,
        transport: Arc<dyn ChannelTransport>,
        api: Arc<dyn SocialApi>,
        clock: Arc<dyn ClockPort>,
        endpoints: ChannelEndpoints,
        policy: ReconnectPolicy,
    ) -> Self {
        let store = router.store().clone();
        Self {
            inner: Arc::new(ManagerInner {
                translator: MessageTranslator::new(store.clone(), api, clock),
                store,
                router,
                transport,
                policy,
                endpoints,
                generation: AtomicU64::new(0),
                token: Mutex::new(None),
                tasks: Mutex::new(HashMap::new()),
                dispatcher: Mutex::new(None),
            }),
        }
    }

    /// Open both channels. Without a token both are marked `Disabled` and
    /// nothing is connected. Must be called from within a tokio runtime.
    pub fn open(&self, token: Option<String>) {
        *self.inner.token.lock().unwrap_or_else(|p| p.into_inner()) = token.clone();

        if token.is_none() {
            tracing::info!("No auth token; realtime channels disabled");
            for channel in ChannelKind::ALL {
                self.inner.abort_task(channel);
                let generation = self.inner.next_generation();
                self.inner
                    .replace_handle(ChannelHandle::new(channel, generation, ChannelState::Disabled));
            }
            return;
        }

        for channel in ChannelKind::ALL {
            self.start(channel);
        }
    }

    /// Explicit retry of a channel that gave up (`Offline`) or is waiting
    /// to reconnect. Returns `false` when the channel cannot be restarted.
    pub fn reconnect(&self, channel: ChannelKind) -> bool {
        let has_token = self
            .inner
            .token
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .is_some();
        let restartable = self.handle(channel).is_some_and(|h| {
            matches!(h.state, ChannelState::Offline | ChannelState::Closed { .. })
        });
        if !has_token || !restartable {
            return false;
        }
        tracing::info!(%channel, "Manual reconnect requested");
        self.start(channel);
        true
    }

    /// Replace both handles with `Terminated` and stop all background work.
    pub fn terminate(&self) {
        for channel in ChannelKind::ALL {
            let generation = self.inner.next_generation();
            self.inner
                .replace_handle(ChannelHandle::new(channel, generation, ChannelState::Terminated));
            self.inner.abort_task(channel);
        }
        let dispatcher = self
            .inner
            .dispatcher
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        if let Some(dispatcher) = dispatcher {
            dispatcher.task.abort();
        }
        *self.inner.token.lock().unwrap_or_else(|p| p.into_inner()) = None;
        tracing::info!("Realtime channels terminated");
    }

    pub fn handle(&self, channel: ChannelKind) -> Option<ChannelHandle> {
        self.inner
            .store
            .get::<ChannelsSlice>()
            .map(|c| c.handle(channel))
    }

    fn start(&self, channel: ChannelKind) {
        let Some(token) = self
            .inner
            .token
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
        else {
            return;
        };
        let frames = self.dispatcher_sender();

        let generation = self.inner.next_generation();
        self.inner
            .replace_handle(ChannelHandle::new(channel, generation, ChannelState::Connecting));

        let mut url = self.inner.endpoints.url(channel).clone();
        url.query_pairs_mut().append_pair("token", &token);

        let task = tokio::spawn(run_channel(
            Arc::clone(&self.inner),
            channel,
            generation,
            url,
            frames,
        ));
        let previous = self
            .inner
            .tasks
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(channel, task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn dispatcher_sender(&self) -> mpsc::UnboundedSender<InboundFrame> {
        let mut dispatcher = self
            .inner
            .dispatcher
            .lock()
            .unwrap_or_else(|p| p.into_inner());
        if let Some(running) = dispatcher.as_ref() {
            if !running.task.is_finished() {
                return running.frames.clone();
            }
        }
        let (frames, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_dispatcher(Arc::clone(&self.inner), rx));
        *dispatcher = Some(Dispatcher {
            frames: frames.clone(),
            task,
        });
        frames
    }
}
