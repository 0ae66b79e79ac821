//! UI Components
//!
//! Leptos components for the entry grid.

pub mod entry_form;
pub mod entry_table;

pub use entry_form::EntryForm;
pub use entry_table::EntryTable;
