//! Persistent list
//!
//! Keeps an ordered `Vec<T>` in memory and mirrors it into one slot of a
//! [`KeyValueStore`]:
//!
//! ```text
//! open:   slot → parse → normalize → items        (default on absent/corrupt)
//! mutate: items changed → serialize → slot        (best effort)
//! ```
//!
//! Storage failures never propagate. They are logged and handed back as
//! [`Outcome`] / [`LoadOutcome`] values the caller may inspect or ignore.

use crate::storage::backend::KeyValueStore;
use crate::storage::error::StoreError;
use crate::storage::record::Record;
use chrono::{DateTime, Local};

/// Format of the human-readable update marker
pub const UPDATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prompt passed to the confirmation callback of [`PersistentList::clear`]
pub const CLEAR_PROMPT: &str = "Remove all entries?";

/// Result of a mutation or an explicit save
#[derive(Debug)]
pub enum Outcome {
    /// Nothing changed, no write was attempted
    Unchanged,
    /// The slot now holds the current sequence
    Saved,
    /// The write failed; memory is ahead of the slot until the next save
    Unsaved(StoreError),
}

impl Outcome {
    /// Whether the in-memory sequence was modified
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::Unchanged)
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Outcome::Saved)
    }

    /// The write error, if persisting failed
    pub fn error(&self) -> Option<&StoreError> {
        match self {
            Outcome::Unsaved(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of [`PersistentList::load`]
#[derive(Debug)]
pub enum LoadOutcome {
    /// Slot empty; the sequence was reset to the default
    Missing,
    /// Slot parsed successfully
    Loaded { count: usize },
    /// Slot unreadable or corrupt; the sequence was reset to the default
    Discarded(StoreError),
}

/// A single application-level change, for callers that route user actions
/// through one entry point.
pub enum Mutation<'a, T> {
    /// Append a record
    Append(T),
    /// Remove every record the predicate matches
    RemoveWhere(Box<dyn FnMut(&T) -> bool + 'a>),
    /// Remove everything, if the callback confirms
    Clear(Box<dyn FnOnce(&str) -> bool + 'a>),
}

/// An in-memory list mirrored to one store slot
#[derive(Debug)]
pub struct PersistentList<T, S> {
    store: S,
    key: String,
    default: Vec<T>,
    items: Vec<T>,
    updated_at: Option<String>,
}

impl<T, S> PersistentList<T, S>
where
    T: Record + Clone,
    S: KeyValueStore,
{
    /// Create a list with an empty default. Nothing is read until [`load`](Self::load).
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self::with_default(store, key, Vec::new())
    }

    /// Create a list whose absent/corrupt fallback is `default`
    pub fn with_default(store: S, key: impl Into<String>, default: Vec<T>) -> Self {
        Self {
            store,
            key: key.into(),
            items: default.clone(),
            default,
            updated_at: None,
        }
    }

    /// Create a list and load it from the store
    pub fn open(store: S, key: impl Into<String>) -> Self {
        let mut list = Self::new(store, key);
        list.load();
        list
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn default_items(&self) -> &[T] {
        &self.default
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the in-memory sequence with the slot's contents
    pub fn load(&mut self) -> LoadOutcome {
        let raw = match self.store.get_item(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read list, using default");
                self.reset();
                return LoadOutcome::Discarded(e);
            }
        };

        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                tracing::debug!(key = %self.key, "No stored list, using default");
                self.reset();
                return LoadOutcome::Missing;
            }
        };

        match serde_json::from_str::<Option<Vec<T>>>(&raw) {
            Ok(Some(mut items)) => {
                items.iter_mut().for_each(T::normalize);
                let count = items.len();
                self.items = items;
                tracing::debug!(key = %self.key, count, "Loaded list");
                LoadOutcome::Loaded { count }
            }
            Ok(None) => {
                tracing::debug!(key = %self.key, "Stored list is null, using default");
                self.reset();
                LoadOutcome::Missing
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Discarding corrupt list");
                self.reset();
                LoadOutcome::Discarded(e.into())
            }
        }
    }

    /// Write the whole sequence to the slot
    pub fn save(&self) -> Outcome {
        let result = serde_json::to_string(&self.items)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set_item(&self.key, &json));

        match result {
            Ok(()) => {
                tracing::debug!(key = %self.key, count = self.items.len(), "Saved list");
                Outcome::Saved
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to save list");
                Outcome::Unsaved(e)
            }
        }
    }

    /// Apply a [`Mutation`]
    pub fn mutate(&mut self, mutation: Mutation<'_, T>) -> Outcome {
        match mutation {
            Mutation::Append(item) => self.push(item),
            Mutation::RemoveWhere(predicate) => self.remove_where(predicate),
            Mutation::Clear(confirm) => self.clear(confirm),
        }
    }

    /// Append a record and save
    pub fn push(&mut self, item: T) -> Outcome {
        self.items.push(item);
        self.save()
    }

    /// Remove every record matching `predicate`; saves only if something was removed
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Outcome
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        if self.items.len() == before {
            return Outcome::Unchanged;
        }
        self.save()
    }

    /// Remove everything after `confirm` agrees.
    ///
    /// An empty list returns immediately without asking.
    pub fn clear<F>(&mut self, confirm: F) -> Outcome
    where
        F: FnOnce(&str) -> bool,
    {
        if self.items.is_empty() {
            return Outcome::Unchanged;
        }
        if !confirm(CLEAR_PROMPT) {
            tracing::debug!(key = %self.key, "Clear declined");
            return Outcome::Unchanged;
        }
        self.items.clear();
        self.save()
    }

    /// Edit the sequence in place. `f` returns whether it changed anything;
    /// only then is the list saved.
    pub fn update<F>(&mut self, f: F) -> Outcome
    where
        F: FnOnce(&mut Vec<T>) -> bool,
    {
        if !f(&mut self.items) {
            return Outcome::Unchanged;
        }
        self.save()
    }

    /// Stamp the current local time as the last update
    pub fn touch_update_time(&mut self) -> &str {
        self.touch_update_time_at(Local::now())
    }

    pub fn touch_update_time_at(&mut self, at: DateTime<Local>) -> &str {
        self.updated_at
            .insert(at.format(UPDATED_AT_FORMAT).to_string())
            .as_str()
    }

    /// Last value stamped by [`touch_update_time`](Self::touch_update_time)
    pub fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn reset(&mut self) {
        self.items = self.default.clone();
    }
}

impl<'a, T, S> IntoIterator for &'a PersistentList<T, S> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::error::StoreResult;
    use crate::storage::memory::MemoryStore;
    use crate::storage::record::{next_id, GridEntry, GRID_ENTRIES_KEY};
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use std::cell::Cell;

    /// Store whose reads succeed and whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("read-only".into()))
        }

        fn remove_item(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("read-only".into()))
        }
    }

    /// Store that counts writes
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: Cell<usize>,
    }

    impl KeyValueStore for CountingStore {
        fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
            self.writes.set(self.writes.get() + 1);
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> StoreResult<()> {
            self.inner.remove_item(key)
        }
    }

    fn sample_entries() -> Vec<GridEntry> {
        vec![
            GridEntry::new(1, "chair").attribute("red").attribute(4),
            GridEntry::new(2, "table"),
            GridEntry::new(3, "lamp").attribute(json!({"watts": 40})),
        ]
    }

    fn grid_list(store: &MemoryStore) -> PersistentList<GridEntry, MemoryStore> {
        PersistentList::open(store.clone(), GRID_ENTRIES_KEY)
    }

    #[test]
    fn test_save_then_fresh_load_round_trips() {
        let store = MemoryStore::new();
        let mut list = grid_list(&store);
        for entry in sample_entries() {
            assert!(list.push(entry).is_saved());
        }

        let reloaded = grid_list(&store);
        assert_eq!(reloaded.items(), sample_entries().as_slice());
    }

    #[test]
    fn test_example_scenario() {
        let store = MemoryStore::new();
        store
            .set_item(GRID_ENTRIES_KEY, r#"[{"id":1,"attributes":["x"]}, {"id":2}]"#)
            .unwrap();

        let mut list = grid_list(&store);
        assert_eq!(
            list.items(),
            &[GridEntry::new(1, "").attribute("x"), GridEntry::new(2, "")]
        );

        let outcome = list.mutate(Mutation::RemoveWhere(Box::new(|e: &GridEntry| e.id == 1)));
        assert!(outcome.is_saved());
        assert_eq!(list.items(), &[GridEntry::new(2, "")]);
        assert_eq!(
            store.get_item(GRID_ENTRIES_KEY).unwrap().as_deref(),
            Some(r#"[{"id":2,"attributes":[]}]"#)
        );
    }

    #[test]
    fn test_missing_attributes_normalized_on_load() {
        let store = MemoryStore::new();
        store
            .set_item("things", r#"[{"id":7,"label":"x"},{"id":8,"attributes":null}]"#)
            .unwrap();

        let list: PersistentList<Value, _> = PersistentList::open(store.clone(), "things");
        assert_eq!(
            list.items(),
            &[
                json!({"id": 7, "label": "x", "attributes": []}),
                json!({"id": 8, "attributes": []}),
            ]
        );
    }

    #[test]
    fn test_null_name_keeps_neighbouring_entries() {
        let store = MemoryStore::new();
        store
            .set_item(GRID_ENTRIES_KEY, r#"[{"id":1,"attributes":["x"]},{"id":2,"name":null}]"#)
            .unwrap();

        let mut list = grid_list(&store);
        assert_eq!(
            list.items(),
            &[GridEntry::new(1, "").attribute("x"), GridEntry::new(2, "")]
        );

        assert!(list.push(GridEntry::new(3, "new")).is_saved());
        assert_eq!(grid_list(&store).len(), 3);
    }

    #[test]
    fn test_append_after_max_id_does_not_overflow() {
        let store = MemoryStore::new();
        store.set_item(GRID_ENTRIES_KEY, r#"[{"id":18446744073709551615}]"#).unwrap();

        let mut list = grid_list(&store);
        let id = next_id(list.items());
        assert_eq!(id, 1);
        assert!(list.push(GridEntry::new(id, "after")).is_saved());
        assert_eq!(grid_list(&store).items()[1].id, 1);
    }

    #[test]
    fn test_corrupt_slot_falls_back_to_default() {
        let store = MemoryStore::new();
        store.set_item("things", "{not json").unwrap();

        let default = vec![GridEntry::new(99, "placeholder")];
        let mut list = PersistentList::with_default(store.clone(), "things", default.clone());
        list.items.push(GridEntry::new(1, "local"));

        let outcome = list.load();
        assert!(matches!(outcome, LoadOutcome::Discarded(StoreError::Serialization(_))));
        assert_eq!(list.items(), default.as_slice());
        // Corrupt data stays in place until the next mutation overwrites it
        assert_eq!(store.get_item("things").unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_wrong_shape_is_treated_as_corrupt() {
        let store = MemoryStore::new();
        store.set_item(GRID_ENTRIES_KEY, r#"{"id":1}"#).unwrap();
        let mut list: PersistentList<GridEntry, _> = PersistentList::new(store, GRID_ENTRIES_KEY);
        assert!(matches!(list.load(), LoadOutcome::Discarded(_)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_absent_empty_and_null_slots_use_default() {
        let store = MemoryStore::new();
        let default = vec![GridEntry::new(1, "seed")];
        let mut list =
            PersistentList::with_default(store.clone(), GRID_ENTRIES_KEY, default.clone());

        assert!(matches!(list.load(), LoadOutcome::Missing));
        assert_eq!(list.items(), default.as_slice());

        for raw in ["", "  ", "null"] {
            store.set_item(GRID_ENTRIES_KEY, raw).unwrap();
            assert!(matches!(list.load(), LoadOutcome::Missing), "raw {:?}", raw);
            assert_eq!(list.items(), default.as_slice());
        }
    }

    #[test]
    fn test_read_failure_falls_back_to_default() {
        let store = MemoryStore::new();
        store.set_item(GRID_ENTRIES_KEY, r#"[{"id":1}]"#).unwrap();
        store.disable();

        let mut list: PersistentList<GridEntry, _> = PersistentList::new(store, GRID_ENTRIES_KEY);
        assert!(matches!(list.load(), LoadOutcome::Discarded(StoreError::Unavailable(_))));
        assert!(list.is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_intact() {
        let backing = MemoryStore::new();
        backing
            .set_item(GRID_ENTRIES_KEY, r#"[{"id":1,"attributes":[]}]"#)
            .unwrap();
        let mut list: PersistentList<GridEntry, _> =
            PersistentList::open(ReadOnlyStore(backing.clone()), GRID_ENTRIES_KEY);

        let before = list.items().to_vec();
        let outcome = list.save();
        assert!(matches!(outcome, Outcome::Unsaved(StoreError::Unavailable(_))));
        assert_eq!(list.items(), before.as_slice());

        // Mutations still apply in memory
        let outcome = list.push(GridEntry::new(2, "unsaved"));
        assert!(outcome.changed());
        assert!(outcome.error().is_some());
        assert_eq!(list.len(), 2);
        assert_eq!(
            backing.get_item(GRID_ENTRIES_KEY).unwrap().as_deref(),
            Some(r#"[{"id":1,"attributes":[]}]"#)
        );
    }

    #[test]
    fn test_quota_failure_is_not_propagated() {
        let store = MemoryStore::with_quota(GRID_ENTRIES_KEY.len() + 40);
        let mut list: PersistentList<GridEntry, _> = grid_list(&store);

        assert!(list.push(GridEntry::new(1, "a")).is_saved());
        let outcome = list.push(GridEntry::new(2, "a much longer name that overflows"));
        assert!(matches!(outcome, Outcome::Unsaved(StoreError::QuotaExceeded { .. })));
        assert_eq!(list.len(), 2);
        assert_eq!(grid_list(&store).len(), 1);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let store = MemoryStore::new();
        let mut list = grid_list(&store);
        for entry in sample_entries() {
            list.push(entry);
        }

        let outcome = list.clear(|_| false);
        assert!(!outcome.changed());
        assert_eq!(list.len(), 3);
        assert_eq!(grid_list(&store).len(), 3);

        let mut asked = None;
        let outcome = list.clear(|prompt| {
            asked = Some(prompt.to_string());
            true
        });
        assert!(outcome.is_saved());
        assert_eq!(asked.as_deref(), Some(CLEAR_PROMPT));
        assert!(list.is_empty());
        assert_eq!(store.get_item(GRID_ENTRIES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_clear_on_empty_neither_prompts_nor_saves() {
        let store = CountingStore::default();
        let mut list: PersistentList<GridEntry, _> = PersistentList::open(&store, GRID_ENTRIES_KEY);

        let outcome = list.mutate(Mutation::Clear(Box::new(|_: &str| -> bool {
            panic!("must not prompt")
        })));
        assert!(matches!(outcome, Outcome::Unchanged));
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn test_remove_without_match_does_not_save() {
        let store = CountingStore::default();
        let mut list: PersistentList<GridEntry, _> = PersistentList::open(&store, GRID_ENTRIES_KEY);
        list.mutate(Mutation::Append(GridEntry::new(1, "a")));
        assert_eq!(store.writes.get(), 1);

        let outcome = list.remove_where(|e| e.id == 42);
        assert!(matches!(outcome, Outcome::Unchanged));
        assert_eq!(store.writes.get(), 1);
    }

    #[test]
    fn test_update_saves_only_when_changed() {
        let store = CountingStore::default();
        let mut list: PersistentList<GridEntry, _> = PersistentList::open(&store, GRID_ENTRIES_KEY);
        list.push(GridEntry::new(1, "a"));

        assert!(!list.update(|_| false).changed());
        assert_eq!(store.writes.get(), 1);

        let outcome = list.update(|items| {
            items[0].attributes.push(json!("tagged"));
            true
        });
        assert!(outcome.is_saved());
        assert_eq!(store.writes.get(), 2);
        assert_eq!(list.items()[0].attribute_labels(), vec!["tagged".to_string()]);
    }

    #[test]
    fn test_load_is_idempotent() {
        let store = MemoryStore::new();
        let raw = r#"[{"id":1,"name":" a "},{"id":2,"attributes":[null,"b"]}]"#;
        store.set_item(GRID_ENTRIES_KEY, raw).unwrap();

        let mut list: PersistentList<GridEntry, _> = PersistentList::new(store, GRID_ENTRIES_KEY);
        assert!(matches!(list.load(), LoadOutcome::Loaded { count: 2 }));
        let first = list.items().to_vec();
        list.load();
        assert_eq!(list.items(), first.as_slice());
        assert_eq!(first[0].name, "a");
        assert_eq!(first[1].attributes, vec![json!("b")]);
    }

    #[test]
    fn test_load_never_writes() {
        let store = CountingStore::default();
        store.inner.set_item(GRID_ENTRIES_KEY, r#"[{"id":1}]"#).unwrap();
        let mut list: PersistentList<GridEntry, _> = PersistentList::open(&store, GRID_ENTRIES_KEY);
        list.load();
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn test_touch_update_time_is_independent_of_mutations() {
        let store = MemoryStore::new();
        let mut list = grid_list(&store);
        assert_eq!(list.updated_at(), None);

        list.push(GridEntry::new(1, "a"));
        assert_eq!(list.updated_at(), None);

        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(list.touch_update_time_at(at), "2024-03-09 14:05:00");
        assert_eq!(list.updated_at(), Some("2024-03-09 14:05:00"));

        list.remove_where(|_| true);
        assert_eq!(list.updated_at(), Some("2024-03-09 14:05:00"));
        assert!(!list.touch_update_time().is_empty());
    }

    #[test]
    fn test_lists_on_different_keys_are_independent() {
        let store = MemoryStore::new();
        let mut grid = grid_list(&store);
        let mut other: PersistentList<Value, _> = PersistentList::open(store.clone(), "notes");

        grid.push(GridEntry::new(1, "a"));
        other.push(json!({"text": "hello", "attributes": []}));

        assert_eq!(grid_list(&store).len(), 1);
        let notes: PersistentList<Value, _> = PersistentList::open(store.clone(), "notes");
        assert_eq!(notes.items(), &[json!({"text": "hello", "attributes": []})]);
        assert_eq!(store.len(), 2);
    }
}
