//! Process-wide slice store.
//!
//! One value per [`SliceKey`]. Values are immutable snapshots behind `Arc`;
//! every write replaces the snapshot and then notifies that slice's
//! subscribers. Notification happens after the internal locks are released,
//! so a callback may read the store or (un)subscribe.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use super::slices::{Slice, SliceKey};

type Erased = Arc<dyn Any + Send + Sync>;
type Callback = Arc<dyn Fn(Erased) + Send + Sync>;

#[derive(Default)]
struct Inner {
    slices: Mutex<HashMap<SliceKey, Erased>>,
    subscribers: Mutex<HashMap<SliceKey, Vec<(u64, Callback)>>>,
    next_subscription: AtomicU64,
}

impl Inner {
    fn notify(&self, key: SliceKey, value: Erased) {
        let callbacks: Vec<Callback> = {
            let subscribers = self
                .subscribers
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            subscribers
                .get(&key)
                .map(|subs| subs.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };
        for callback in callbacks {
            callback(Arc::clone(&value));
        }
    }
}

/// Shared handle to the store. Cloning is cheap; all clones see the same data.
#[derive(Clone, Default)]
pub struct SliceStore {
    inner: Arc<Inner>,
}

impl SliceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, or `None` while the slice is uninitialized.
    pub fn get<S: Slice>(&self) -> Option<Arc<S>> {
        let slices = self.inner.slices.lock().unwrap_or_else(|p| p.into_inner());
        slices
            .get(&S::KEY)
            .cloned()
            .and_then(|value| value.downcast::<S>().ok())
    }

    pub fn is_initialized<S: Slice>(&self) -> bool {
        let slices = self.inner.slices.lock().unwrap_or_else(|p| p.into_inner());
        slices.contains_key(&S::KEY)
    }

    /// Replace the slice and notify its subscribers.
    pub fn set<S: Slice>(&self, value: S) {
        let value: Erased = Arc::new(value);
        {
            let mut slices = self.inner.slices.lock().unwrap_or_else(|p| p.into_inner());
            slices.insert(S::KEY, Arc::clone(&value));
        }
        self.inner.notify(S::KEY, value);
    }

    /// Atomic read-modify-write. Returns `false` (and does nothing) when the
    /// slice is uninitialized.
    pub fn update<S: Slice>(&self, f: impl FnOnce(&S) -> S) -> bool {
        self.try_update::<S>(|current| Some(f(current)))
    }

    /// Like [`update`](Self::update), but `f` may return `None` to leave the
    /// slice untouched; no subscriber is notified in that case.
    pub fn try_update<S: Slice>(&self, f: impl FnOnce(&S) -> Option<S>) -> bool {
        let next: Erased = {
            let mut slices = self.inner.slices.lock().unwrap_or_else(|p| p.into_inner());
            let Some(current) = slices
                .get(&S::KEY)
                .and_then(|value| value.downcast_ref::<S>())
            else {
                return false;
            };
            let Some(next) = f(current) else {
                return false;
            };
            let next: Erased = Arc::new(next);
            slices.insert(S::KEY, Arc::clone(&next));
            next
        };
        self.inner.notify(S::KEY, next);
        true
    }

    /// Register a callback invoked with every new value of `S`.
    pub fn subscribe<S: Slice>(&self, callback: impl Fn(Arc<S>) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_subscription.fetch_add(1, Ordering::Relaxed);
        let erased: Callback = Arc::new(move |value: Erased| {
            if let Ok(value) = value.downcast::<S>() {
                callback(value);
            }
        });
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry(S::KEY)
            .or_default()
            .push((id, erased));
        Subscription {
            store: Arc::downgrade(&self.inner),
            key: S::KEY,
            id,
        }
    }

    pub fn subscriber_count(&self, key: SliceKey) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&key)
            .map_or(0, Vec::len)
    }

    /// Drop every slice except the realtime channels. Subscribers are kept and
    /// not notified.
    pub fn clear(&self) {
        let mut slices = self.inner.slices.lock().unwrap_or_else(|p| p.into_inner());
        slices.retain(|key, _| *key == SliceKey::Channels);
    }
}

/// Registration returned by [`SliceStore::subscribe`]. Dropping it does not
/// unsubscribe.
#[derive(Debug)]
pub struct Subscription {
    store: Weak<Inner>,
    key: SliceKey,
    id: u64,
}

impl Subscription {
    pub fn key(&self) -> SliceKey {
        self.key
    }

    /// Remove the callback. Returns `false` if it was already gone.
    pub fn unsubscribe(self) -> bool {
        let Some(inner) = self.store.upgrade() else {
            return false;
        };
        let mut subscribers = inner.subscribers.lock().unwrap_or_else(|p| p.into_inner());
        let Some(subs) = subscribers.get_mut(&self.key) else {
            return false;
        };
        let before = subs.len();
        subs.retain(|(id, _)| *id != self.id);
        subs.len() != before
    }
}
