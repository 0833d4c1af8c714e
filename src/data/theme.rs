//! Theme preference management
//!
//! Light/dark preference with an injected presentation side-effect.
//! The store persists the choice and replays it to subscribers; actually
//! restyling the page is the frontend's job, reached through the callback
//! handed to [`ThemeStore::load`].

use crate::data::storage::StorageBackend;
use crate::data::store::{decode_current, load_initial, PersistedStore, Subscription};
use crate::data::types::ThemePreference;
use std::rc::Rc;

/// Storage key for the theme envelope
const THEME_KEY: &str = "recipe-flow-theme";

/// Observable theme preference
pub struct ThemeStore {
    store: PersistedStore<ThemePreference>,
    apply: Box<dyn Fn(ThemePreference)>,
}

impl ThemeStore {
    /// Load the theme preference.
    ///
    /// Resolution order: a valid persisted value, else the host's reported
    /// color-scheme preference, else light. An unreadable persisted value
    /// is deleted, not adopted.
    ///
    /// `apply` is the presentation side-effect (e.g. toggling a dark-mode
    /// marker on the document root). It runs on every change with the new
    /// preference, never at construction.
    pub fn load(
        backend: Rc<dyn StorageBackend>,
        system_prefers_dark: bool,
        apply: impl Fn(ThemePreference) + 'static,
    ) -> Self {
        let fallback = if system_prefers_dark {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        };
        let initial = load_initial(backend.as_ref(), THEME_KEY, decode_current, || fallback);
        Self {
            store: PersistedStore::new(backend, THEME_KEY, initial),
            apply: Box::new(apply),
        }
    }

    /// Current preference
    pub fn get(&self) -> ThemePreference {
        self.store.get()
    }

    /// Register `callback`; it fires immediately with the current preference
    /// and then on every change
    pub fn subscribe(
        &self,
        callback: impl Fn(ThemePreference) + 'static,
    ) -> Subscription<ThemePreference> {
        self.store.subscribe(move |theme| callback(*theme))
    }

    /// Set the preference: side-effect, persist, publish
    pub fn set(&self, theme: ThemePreference) {
        (self.apply)(theme);
        self.store.set(theme);
    }

    /// Flip light <-> dark
    pub fn toggle(&self) {
        self.set(self.get().flipped());
    }
}
