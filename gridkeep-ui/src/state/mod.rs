//! State Management
//!
//! Global application state backed by the persisted entry list.

pub mod global;

pub use global::{provide_global_state, GlobalState};
