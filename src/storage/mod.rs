//! Gridkeep Storage
//!
//! This module provides the persistent list and the stores behind it:
//!
//! - **backend**: The `KeyValueStore` trait every store implements
//! - **memory**: Shared in-process store with an optional quota
//! - **file**: One JSON file per key under a data directory
//! - **record**: The `Record` trait and the `GridEntry` record
//! - **list**: `PersistentList`, the load/save/mutate cycle
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Load:   KeyValueStore::get_item → JSON → Record::normalize → Vec<T>
//! Mutate: Vec<T> changed → JSON → KeyValueStore::set_item (failures logged)
//! ```
//!
//! # Example
//!
//! ```rust
//! use gridkeep::storage::{GridEntry, MemoryStore, PersistentList, GRID_ENTRIES_KEY};
//!
//! let store = MemoryStore::new();
//! let mut entries: PersistentList<GridEntry, _> =
//!     PersistentList::open(store.clone(), GRID_ENTRIES_KEY);
//!
//! entries.push(GridEntry::new(1, "chair").attribute("red"));
//! entries.remove_where(|e| e.id == 1);
//! entries.clear(|_prompt| true);
//!
//! let reopened: PersistentList<GridEntry, _> = PersistentList::open(store, GRID_ENTRIES_KEY);
//! assert!(reopened.is_empty());
//! ```

pub mod backend;
pub mod error;
pub mod file;
pub mod list;
pub mod memory;
pub mod record;

// Re-export commonly used types
pub use backend::KeyValueStore;
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use list::{LoadOutcome, Mutation, Outcome, PersistentList, CLEAR_PROMPT, UPDATED_AT_FORMAT};
pub use memory::MemoryStore;
pub use record::{next_id, GridEntry, Record, ATTRIBUTES_FIELD, GRID_ENTRIES_KEY};
