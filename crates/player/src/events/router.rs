//! Event router.
//!
//! Synchronous, ordered dispatch: `emit` runs the reducer for the event's
//! kind and then every listener registered for that kind, in registration
//! order, before returning. A panicking reducer or listener is logged and
//! does not affect the remaining listeners or later events.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::{AppEvent, EventKind, EventRecord};
use crate::ports::outbound::ClockPort;
use crate::reducers;
use crate::state::SliceStore;

type Listener = Arc<dyn Fn(&EventRecord) + Send + Sync>;

struct RouterInner {
    store: SliceStore,
    clock: Arc<dyn ClockPort>,
    listeners: Mutex<HashMap<EventKind, Vec<(u64, Listener)>>>,
    next_listener: AtomicU64,
}

/// Cloneable handle; every clone routes into the same store and listener set.
#[derive(Clone)]
pub struct EventRouter {
    inner: Arc<RouterInner>,
}

/// Returned by [`EventRouter::on`]; pass to [`EventRouter::off`] to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle {
    kind: EventKind,
    id: u64,
}

impl EventRouter {
    pub fn new(store: SliceStore, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                store,
                clock,
                listeners: Mutex::new(HashMap::new()),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    pub fn store(&self) -> &SliceStore {
        &self.inner.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    /// Apply `event` to the store, then notify listeners of its kind.
    pub fn emit(&self, event: AppEvent) -> EventRecord {
        let record = EventRecord {
            kind: event.kind(),
            event,
            timestamp: self.inner.clock.now(),
        };
        tracing::debug!(kind = ?record.kind, "Dispatching event");

        let store = &self.inner.store;
        if catch_unwind(AssertUnwindSafe(|| reducers::reduce(store, &record))).is_err() {
            tracing::error!(kind = ?record.kind, "Reducer panicked; event skipped");
        }

        let listeners: Vec<Listener> = {
            let listeners = self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            listeners
                .get(&record.kind)
                .map(|l| l.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };
        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(&record))).is_err() {
                tracing::error!(kind = ?record.kind, "Event listener panicked");
            }
        }

        record
    }

    pub fn on(
        &self,
        kind: EventKind,
        callback: impl Fn(&EventRecord) + Send + Sync + 'static,
    ) -> ListenerHandle {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry(kind)
            .or_default()
            .push((id, Arc::new(callback)));
        ListenerHandle { kind, id }
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn off(&self, handle: ListenerHandle) -> bool {
        let mut listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner());
        let Some(registered) = listeners.get_mut(&handle.kind) else {
            return false;
        };
        let before = registered.len();
        registered.retain(|(id, _)| *id != handle.id);
        registered.len() != before
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::FixedClock;
    use crate::state::NotificationsSlice;
    use rally_domain::{Notification, NotificationKind};
    use std::sync::atomic::AtomicU32;

    fn router() -> EventRouter {
        EventRouter::new(SliceStore::new(), Arc::new(FixedClock::epoch()))
    }

    #[test]
    fn emit_stamps_record_with_clock_time() {
        let router = router();
        let record = router.emit(AppEvent::NotificationsCleared);
        assert_eq!(record.kind, EventKind::NotificationsCleared);
        assert_eq!(record.timestamp, FixedClock::epoch().now());
    }

    #[test]
    fn listeners_run_after_reducers_and_only_for_their_kind() {
        let router = router();
        router.store().set(NotificationsSlice::default());

        let observed_unread = Arc::new(AtomicU32::new(u32::MAX));
        let store = router.store().clone();
        let observed = Arc::clone(&observed_unread);
        router.on(EventKind::NotificationPushed, move |_| {
            let unread = store.get::<NotificationsSlice>().map_or(0, |n| n.unread_count);
            observed.store(unread, Ordering::SeqCst);
        });
        let other_calls = Arc::new(AtomicU32::new(0));
        let other = Arc::clone(&other_calls);
        router.on(EventKind::NotificationsCleared, move |_| {
            other.fetch_add(1, Ordering::SeqCst);
        });

        router.emit(AppEvent::NotificationPushed {
            notification: Notification::new(NotificationKind::Info, "hi", router.now()),
        });

        assert_eq!(observed_unread.load(Ordering::SeqCst), 1);
        assert_eq!(other_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panicking_listener_does_not_stop_later_listeners() {
        let router = router();
        let calls = Arc::new(AtomicU32::new(0));

        router.on(EventKind::NotificationsCleared, |_| panic!("listener bug"));
        let counted = Arc::clone(&calls);
        router.on(EventKind::NotificationsCleared, move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        router.emit(AppEvent::NotificationsCleared);
        router.emit(AppEvent::NotificationsCleared);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn off_removes_listener() {
        let router = router();
        let calls = Arc::new(AtomicU32::new(0));
        let counted = Arc::clone(&calls);
        let handle = router.on(EventKind::NotificationsCleared, move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        router.emit(AppEvent::NotificationsCleared);
        assert!(router.off(handle));
        assert!(!router.off(handle));
        router.emit(AppEvent::NotificationsCleared);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(router.listener_count(EventKind::NotificationsCleared), 0);
    }
}
