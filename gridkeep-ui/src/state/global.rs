//! Global Application State
//!
//! The entry list lives in a `StoredValue`; signals mirror what the view
//! needs and are refreshed after every mutation that changed something.

use gridkeep::storage::{next_id, GridEntry, Outcome, PersistentList, GRID_ENTRIES_KEY};
use leptos::*;

use crate::storage::LocalStorage;

type EntryList = PersistentList<GridEntry, LocalStorage>;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Owner of the persisted list
    list: StoredValue<EntryList>,
    /// Entries as last read from the list
    pub entries: RwSignal<Vec<GridEntry>>,
    /// Human-readable time of the last user change
    pub updated_at: RwSignal<Option<String>>,
}

/// Load the entries once and provide the state to the component tree
pub fn provide_global_state() {
    let list: EntryList = PersistentList::open(LocalStorage::new(), GRID_ENTRIES_KEY);

    let state = GlobalState {
        entries: create_rw_signal(list.items().to_vec()),
        updated_at: create_rw_signal(None),
        list: store_value(list),
    };

    provide_context(state);
}

impl GlobalState {
    /// Add an entry with the next free id. Blank names are ignored.
    pub fn add_entry(&self, name: &str, attributes: Vec<String>) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let name = name.to_string();
        self.apply(move |list| {
            let mut entry = GridEntry::new(next_id(list.items()), name);
            entry.attributes.extend(attributes.into_iter().map(Into::into));
            list.push(entry)
        });
    }

    /// Remove the entry with `id`
    pub fn remove_entry(&self, id: u64) {
        self.apply(move |list| list.remove_where(|e| e.id == id));
    }

    /// Remove every entry after the user confirms in a browser dialog
    pub fn clear_entries(&self) {
        self.apply(|list| list.clear(confirm));
    }

    /// Run a mutation, then refresh the signals if it changed the list
    fn apply(&self, f: impl FnOnce(&mut EntryList) -> Outcome) {
        let refreshed = self.list.try_update_value(|list| {
            let outcome = f(list);
            if let Some(e) = outcome.error() {
                web_sys::console::error_1(
                    &format!("Failed to save {}: {}", list.key(), e).into(),
                );
            }
            outcome
                .changed()
                .then(|| (list.items().to_vec(), list.touch_update_time().to_string()))
        });

        if let Some(Some((entries, updated_at))) = refreshed {
            self.entries.set(entries);
            self.updated_at.set(Some(updated_at));
        }
    }
}

fn confirm(prompt: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(prompt).ok())
        .unwrap_or(false)
}
