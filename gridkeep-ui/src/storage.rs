//! Browser Storage
//!
//! `KeyValueStore` over `window.localStorage`.

use gridkeep::storage::{KeyValueStore, StoreError, StoreResult};
use wasm_bindgen::{JsCast, JsValue};

/// The page's `localStorage`, if the browser exposes one
#[derive(Clone, Debug)]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    /// Look up `localStorage`. Private browsing or disabled storage leaves it
    /// absent; every call then fails with `Unavailable`.
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            web_sys::console::warn_1(
                &"localStorage is not available, entries will not persist".into(),
            );
        }
        Self { storage }
    }

    fn storage(&self) -> StoreResult<&web_sys::Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage is not available".into()))
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a thrown JS value into a store error, keeping the DOMException text
fn js_error(err: JsValue) -> StoreError {
    let message = match err.dyn_ref::<web_sys::DomException>() {
        Some(exception) => format!("{}: {}", exception.name(), exception.message()),
        None => err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    };
    StoreError::Unavailable(message)
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}
