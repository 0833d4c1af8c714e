//! Observable, persisted value container
//!
//! `PersistedStore<T>` owns an in-memory value mirrored to one key of a
//! [`StorageBackend`]. Every mutation stores the new value, persists it
//! best-effort, then notifies subscribers in registration order.
//!
//! Single-threaded by design: shared ownership is `Rc<RefCell<..>>` and
//! callbacks run synchronously on the caller's stack, so subscribers observe
//! values in the exact sequence mutations were applied.

use crate::data::storage::StorageBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{info, warn};

/// Outcome of decoding a persisted envelope
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Envelope<T> {
    /// Current schema decoded cleanly
    Current(T),
    /// A known obsolete schema; the entry must be discarded, not interpreted
    Legacy,
    /// Neither current nor any known legacy schema (including malformed JSON)
    Corrupt,
}

/// Strict decode for stores with a single, stable schema
pub(crate) fn decode_current<T: DeserializeOwned>(raw: &str) -> Envelope<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Envelope::Current(value),
        Err(_) => Envelope::Corrupt,
    }
}

/// Resolve a store's initial value from whatever is persisted under `key`.
///
/// Legacy and corrupt envelopes are deleted and replaced by the default;
/// backend read failures count as absent. Nothing here is an error to the
/// caller, only a diagnostic event.
pub(crate) fn load_initial<T>(
    backend: &dyn StorageBackend,
    key: &'static str,
    decode: impl Fn(&str) -> Envelope<T>,
    default: impl FnOnce() -> T,
) -> T {
    let raw = match backend.read(key) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "failed to read persisted entry; starting from defaults");
            None
        }
    };
    let Some(raw) = raw else {
        return default();
    };

    match decode(&raw) {
        Envelope::Current(value) => value,
        Envelope::Legacy => {
            info!(key, "obsolete persisted format detected; clearing stored entry");
            discard(backend, key);
            default()
        }
        Envelope::Corrupt => {
            warn!(key, "unreadable persisted entry; clearing stored entry");
            discard(backend, key);
            default()
        }
    }
}

fn discard(backend: &dyn StorageBackend, key: &str) {
    if let Err(e) = backend.remove(key) {
        warn!(key, error = %e, "failed to delete persisted entry");
    }
}

struct SubscriberEntry<T: 'static> {
    id: u64,
    callback: Rc<dyn Fn(&T)>,
}

struct Inner<T: 'static> {
    value: T,
    subscribers: Vec<SubscriberEntry<T>>,
    next_subscriber_id: u64,
}

/// An observable value synchronized with one storage key
pub struct PersistedStore<T: 'static> {
    key: &'static str,
    backend: Rc<dyn StorageBackend>,
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T: Clone + Serialize + 'static> PersistedStore<T> {
    /// Create a store over `key` with an already-resolved initial value.
    ///
    /// Loading and format migration happen before construction; see the
    /// concrete stores in `favorites`, `history`, and `theme`. The initial
    /// value is not written back.
    pub fn new(backend: Rc<dyn StorageBackend>, key: &'static str, value: T) -> Self {
        Self {
            key,
            backend,
            inner: Rc::new(RefCell::new(Inner {
                value,
                subscribers: Vec::new(),
                next_subscriber_id: 0,
            })),
        }
    }

    /// Clone of the current value
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Register `callback` for change notifications.
    ///
    /// The callback fires once immediately (synchronously) with the current
    /// value and afterwards on every change, in registration order relative
    /// to other subscribers. The returned handle stops delivery when
    /// [`Subscription::unsubscribe`] is called; merely dropping it keeps the
    /// subscription alive.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription<T> {
        let callback: Rc<dyn Fn(&T)> = Rc::new(callback);
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_subscriber_id;
            inner.next_subscriber_id += 1;
            inner.subscribers.push(SubscriberEntry {
                id,
                callback: Rc::clone(&callback),
            });
            id
        };

        let value = self.get();
        callback(&value);

        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Replace the value: store, persist best-effort, publish
    pub fn set(&self, value: T) {
        self.inner.borrow_mut().value = value;
        self.persist();
        self.notify();
    }

    /// Replace the value with one computed from the current value
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.inner.borrow().value);
        self.set(next);
    }

    /// Delete the persisted entry and replace the in-memory value.
    ///
    /// Unlike [`set`](Self::set) nothing is written back; used for explicit
    /// clears. Subscribers are notified as usual.
    pub fn reset(&self, value: T) {
        discard(self.backend.as_ref(), self.key);
        self.inner.borrow_mut().value = value;
        self.notify();
    }

    /// Serialize the current value under the store's key.
    ///
    /// A failed write is reported and otherwise ignored: the in-memory value
    /// and the pending notifications stand even when durability is lost.
    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!(key = self.key, error = %e, "failed to persist value; keeping in-memory state");
        }
    }

    fn try_persist(&self) -> crate::error::Result<()> {
        let json = serde_json::to_string(&self.inner.borrow().value)?;
        self.backend.write(self.key, &json)
    }

    /// Publish the current value to every active subscriber.
    ///
    /// The value and the subscriber list are snapshotted up front so a
    /// callback can re-enter the store (get, subscribe, unsubscribe) without
    /// a `RefCell` conflict. An entry unsubscribed mid-notification is
    /// skipped; everyone else still gets the value.
    fn notify(&self) {
        let (value, entries) = {
            let inner = self.inner.borrow();
            let entries: Vec<(u64, Rc<dyn Fn(&T)>)> = inner
                .subscribers
                .iter()
                .map(|s| (s.id, Rc::clone(&s.callback)))
                .collect();
            (inner.value.clone(), entries)
        };

        for (id, callback) in entries {
            let live = self
                .inner
                .borrow()
                .subscribers
                .iter()
                .any(|s| s.id == id);
            if live {
                callback(&value);
            }
        }
    }
}

/// Handle returned by [`PersistedStore::subscribe`]
pub struct Subscription<T: 'static> {
    inner: Weak<RefCell<Inner<T>>>,
    id: u64,
}

impl<T: 'static> Subscription<T> {
    /// Stop delivery to this subscriber.
    ///
    /// Safe to call at any time, including from inside a notification
    /// callback; other subscribers are unaffected.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().subscribers.retain(|s| s.id != self.id);
        }
    }
}
