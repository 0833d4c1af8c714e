//! Search-history management
//!
//! The most recent searches, newest first, de-duplicated by (query, kind)
//! and capped at [`MAX_ENTRIES`](crate::config::history::MAX_ENTRIES).

use crate::config::history::MAX_ENTRIES;
use crate::data::storage::StorageBackend;
use crate::data::store::{decode_current, load_initial, PersistedStore, Subscription};
use crate::data::types::{SearchHistoryItem, SearchKind};
use std::rc::Rc;

/// Storage key for the search-history envelope
const HISTORY_KEY: &str = "recipe-flow-history";

/// Observable search history
pub struct SearchHistoryStore {
    store: PersistedStore<Vec<SearchHistoryItem>>,
}

impl SearchHistoryStore {
    /// Load the history from `backend`, discarding unreadable data
    pub fn load(backend: Rc<dyn StorageBackend>) -> Self {
        let initial = load_initial(backend.as_ref(), HISTORY_KEY, decode_current, Vec::new);
        Self {
            store: PersistedStore::new(backend, HISTORY_KEY, initial),
        }
    }

    /// Current history, most recent first
    pub fn get(&self) -> Vec<SearchHistoryItem> {
        self.store.get()
    }

    /// Register `callback`; it fires immediately with the current history
    /// and then on every change
    pub fn subscribe(
        &self,
        callback: impl Fn(&[SearchHistoryItem]) + 'static,
    ) -> Subscription<Vec<SearchHistoryItem>> {
        self.store.subscribe(move |items| callback(items))
    }

    /// Record a search.
    ///
    /// Any previous `(query, kind)` entry moves to the front with a fresh
    /// timestamp; the list is capped at `MAX_ENTRIES`, dropping the oldest.
    pub fn add_search(&self, query: &str, kind: SearchKind) {
        self.store.update(|items| {
            let mut next: Vec<SearchHistoryItem> = items
                .iter()
                .filter(|item| !(item.query == query && item.kind == kind))
                .cloned()
                .collect();
            next.insert(0, SearchHistoryItem::new(query, kind));
            next.truncate(MAX_ENTRIES);
            next
        });
    }

    /// Forget everything.
    ///
    /// The persisted entry is deleted, not rewritten as an empty list.
    pub fn clear_history(&self) {
        self.store.reset(Vec::new());
    }

    /// Remove the entry at `index` in the current ordering.
    ///
    /// An out-of-range index is a silent no-op.
    pub fn remove_search(&self, index: usize) {
        if self.store.read(|items| index >= items.len()) {
            return;
        }
        self.store.update(|items| {
            let mut next = items.clone();
            next.remove(index);
            next
        });
    }

    /// Number of remembered searches
    pub fn len(&self) -> usize {
        self.store.read(|items| items.len())
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.store.read(|items| items.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::storage::MemoryBackend;
    use std::cell::RefCell;

    fn empty_store() -> SearchHistoryStore {
        SearchHistoryStore::load(Rc::new(MemoryBackend::new()))
    }

    fn store_over(backend: &Rc<MemoryBackend>) -> SearchHistoryStore {
        let backend: Rc<dyn StorageBackend> = backend.clone();
        SearchHistoryStore::load(backend)
    }

    fn queries(store: &SearchHistoryStore) -> Vec<String> {
        store.get().into_iter().map(|item| item.query).collect()
    }

    #[test]
    fn test_add_search_prepends() {
        let store = empty_store();

        store.add_search("chicken", SearchKind::Ingredient);
        store.add_search("dessert", SearchKind::Category);

        assert_eq!(queries(&store), vec!["dessert", "chicken"]);
    }

    #[test]
    fn test_capped_at_ten_most_recent() {
        let store = empty_store();

        for i in 0..11 {
            store.add_search(&format!("q{}", i), SearchKind::Ingredient);
        }

        assert_eq!(store.len(), MAX_ENTRIES);
        // Most recent first, the very first search is gone
        assert_eq!(
            queries(&store),
            (1..11).rev().map(|i| format!("q{}", i)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_duplicate_moves_to_front() {
        let store = empty_store();

        store.add_search("chicken", SearchKind::Ingredient);
        store.add_search("dessert", SearchKind::Category);

        let old_ts = store.get()[1].timestamp;
        store.add_search("chicken", SearchKind::Ingredient);

        assert_eq!(store.len(), 2);
        assert_eq!(queries(&store), vec!["chicken", "dessert"]);
        assert!(store.get()[0].timestamp >= old_ts);
    }

    #[test]
    fn test_same_query_different_kind_is_distinct() {
        let store = empty_store();

        store.add_search("pasta", SearchKind::Ingredient);
        store.add_search("pasta", SearchKind::Category);

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_search_shifts_later_entries() {
        let store = empty_store();

        store.add_search("a", SearchKind::Ingredient);
        store.add_search("b", SearchKind::Ingredient);
        store.add_search("c", SearchKind::Ingredient);
        // Current order: c, b, a

        store.remove_search(1);
        assert_eq!(queries(&store), vec!["c", "a"]);
    }

    #[test]
    fn test_remove_search_out_of_range_is_noop() {
        let store = empty_store();
        store.add_search("a", SearchKind::Ingredient);

        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        store.subscribe(move |_| *sink.borrow_mut() += 1);

        store.remove_search(5);
        assert_eq!(store.len(), 1);
        assert_eq!(*count.borrow(), 1); // only the immediate call
    }

    #[test]
    fn test_clear_history_deletes_entry() {
        let backend = Rc::new(MemoryBackend::new());
        let store = store_over(&backend);

        store.add_search("a", SearchKind::Ingredient);
        assert!(backend.stored(HISTORY_KEY).is_some());

        store.clear_history();
        assert!(store.is_empty());
        assert_eq!(backend.stored(HISTORY_KEY), None);
    }

    #[test]
    fn test_reload_round_trips() {
        let backend = Rc::new(MemoryBackend::new());

        {
            let store = store_over(&backend);
            store.add_search("chicken", SearchKind::Ingredient);
            store.add_search("dessert", SearchKind::Category);
        }

        let store = store_over(&backend);
        assert_eq!(queries(&store), vec!["dessert", "chicken"]);
        assert_eq!(store.get()[0].kind, SearchKind::Category);
    }

    #[test]
    fn test_corrupt_entry_is_cleared_on_load() {
        let backend = Rc::new(MemoryBackend::new());
        backend.seed(HISTORY_KEY, r#"[{"query":"a","type":"telepathy"}]"#);

        let store = store_over(&backend);
        assert!(store.is_empty());
        assert_eq!(backend.stored(HISTORY_KEY), None);
    }

    #[test]
    fn test_envelope_uses_type_field() {
        let backend = Rc::new(MemoryBackend::new());
        let store = store_over(&backend);

        store.add_search("chicken", SearchKind::Ingredient);
        let stored = backend.stored(HISTORY_KEY).unwrap();
        assert!(stored.contains(r#""type":"ingredient""#));
    }

    #[test]
    fn test_subscribers_hear_changes() {
        let store = empty_store();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |items| sink.borrow_mut().push(items.len()));

        store.add_search("a", SearchKind::Ingredient);
        store.add_search("b", SearchKind::Random);
        store.clear_history();
        assert_eq!(*seen.borrow(), vec![0, 1, 2, 0]);
    }
}
