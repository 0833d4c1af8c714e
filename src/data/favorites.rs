//! Favorites management
//!
//! Observable list of favorited recipes, persisted under a fixed key.
//! Loading recognizes one obsolete envelope (a bare array of meal ids) and
//! discards it instead of interpreting it.

use crate::data::storage::StorageBackend;
use crate::data::store::{load_initial, Envelope, PersistedStore, Subscription};
use crate::data::types::FavoriteItem;
use std::rc::Rc;

/// Storage key for the favorites envelope
const FAVORITES_KEY: &str = "recipe-flow-favorites";

/// Decode the favorites envelope.
///
/// Current schema: array of `{mealId, addedAt}` objects. The one known
/// legacy schema is a bare array of meal-id strings. The legacy list is
/// closed; anything that matches neither is corrupt.
fn decode_envelope(raw: &str) -> Envelope<Vec<FavoriteItem>> {
    if let Ok(items) = serde_json::from_str::<Vec<FavoriteItem>>(raw) {
        return Envelope::Current(items);
    }
    if serde_json::from_str::<Vec<String>>(raw).is_ok() {
        return Envelope::Legacy;
    }
    Envelope::Corrupt
}

/// Observable favorites list
///
/// At most one entry per meal id, in insertion order. Mutations never fail
/// from the caller's point of view; persistence problems are diagnostic
/// events only.
pub struct FavoritesStore {
    store: PersistedStore<Vec<FavoriteItem>>,
}

impl FavoritesStore {
    /// Load favorites from `backend`, discarding obsolete or unreadable data
    pub fn load(backend: Rc<dyn StorageBackend>) -> Self {
        let initial = load_initial(backend.as_ref(), FAVORITES_KEY, decode_envelope, Vec::new);
        Self {
            store: PersistedStore::new(backend, FAVORITES_KEY, initial),
        }
    }

    /// Current favorites, insertion-ordered
    pub fn get(&self) -> Vec<FavoriteItem> {
        self.store.get()
    }

    /// Register `callback`; it fires immediately with the current list and
    /// then on every change
    pub fn subscribe(
        &self,
        callback: impl Fn(&[FavoriteItem]) + 'static,
    ) -> Subscription<Vec<FavoriteItem>> {
        self.store.subscribe(move |items| callback(items))
    }

    /// Add a favorite stamped with the current time.
    ///
    /// Idempotent: if the id is already present nothing changes and nobody
    /// is notified; the first timestamp wins.
    pub fn add(&self, meal_id: &str) {
        if self.is_favorite(meal_id) {
            return;
        }
        self.store.update(|items| {
            let mut next = items.clone();
            next.push(FavoriteItem::new(meal_id));
            next
        });
    }

    /// Remove a favorite; an absent id is a no-op
    pub fn remove(&self, meal_id: &str) {
        if !self.is_favorite(meal_id) {
            return;
        }
        self.store.update(|items| {
            items
                .iter()
                .filter(|item| item.meal_id != meal_id)
                .cloned()
                .collect()
        });
    }

    /// Remove the id if present, add it otherwise
    pub fn toggle(&self, meal_id: &str) {
        if self.is_favorite(meal_id) {
            self.remove(meal_id);
        } else {
            self.add(meal_id);
        }
    }

    /// Check whether `meal_id` is currently favorited.
    ///
    /// A plain synchronous read; nothing stays subscribed afterwards.
    pub fn is_favorite(&self, meal_id: &str) -> bool {
        self.store
            .read(|items| items.iter().any(|item| item.meal_id == meal_id))
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.store.read(|items| items.len())
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.store.read(|items| items.is_empty())
    }
}
