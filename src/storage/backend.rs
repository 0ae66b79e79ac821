//! Key/value backend abstraction
//!
//! A backend maps string keys to string values, mirroring the shape of the
//! browser's `localStorage`. All calls are synchronous and fallible.

use crate::storage::error::StoreResult;

/// Host-provided key/value persistence.
///
/// Every slot holds one whole value; `set_item` replaces it entirely.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` when the slot is empty
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite the slot under `key`
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete the slot under `key`; deleting a missing slot is not an error
    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }
}
