//! # Gridkeep
//!
//! A small list of user-entered records kept in memory and mirrored into a
//! key/value store, the way a browser app keeps state in `localStorage`.
//!
//! ## Features
//!
//! - **Best-effort persistence**: every mutation rewrites the slot; storage
//!   failures are logged and returned as values, never raised
//! - **Forward-compatible records**: missing fields are filled in on load
//! - **Pluggable stores**: in-memory, file-backed, or browser storage
//!
//! ## Modules
//!
//! - [`storage`]: Persistent list, records and key/value stores
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridkeep::storage::*;
//!
//! let store = FileStore::new("./gridkeep_data");
//! let mut entries: PersistentList<GridEntry, _> = PersistentList::open(store, GRID_ENTRIES_KEY);
//!
//! let id = next_id(entries.items());
//! if let Outcome::Unsaved(e) = entries.push(GridEntry::new(id, "desk lamp")) {
//!     eprintln!("entry kept in memory only: {}", e);
//! }
//! entries.touch_update_time();
//! ```

pub mod config;
pub mod storage;
#[cfg(feature = "cli")]
pub mod telemetry;

// Re-export top-level types for convenience
pub use storage::{
    FileStore, GridEntry, KeyValueStore, LoadOutcome, MemoryStore, Mutation, Outcome,
    PersistentList, Record, StoreError, StoreResult, GRID_ENTRIES_KEY,
};

pub use config::{Config, ConfigError, LoadReport, LoggingConfig, StorageConfig};
