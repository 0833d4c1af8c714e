//! Data persistence
//!
//! Observable, persisted stores for favorites, search history, and the
//! theme preference, plus the storage backends behind them.

pub mod favorites;
pub mod history;
pub mod storage;
pub mod store;
pub mod theme;
pub mod types;

// Re-export common types
pub use favorites::FavoritesStore;
pub use history::SearchHistoryStore;
pub use storage::{default_dir, FileBackend, MemoryBackend, StorageBackend};
pub use store::{PersistedStore, Subscription};
pub use theme::ThemeStore;
pub use types::{
    now_millis, FavoriteItem, SearchHistoryItem, SearchKind, ThemePreference,
};
