//! In-process key/value store
//!
//! Behaves like browser storage: a flat map of strings with an optional
//! total-size quota. Clones share the same map, so two lists opened on the
//! same `MemoryStore` see each other's writes.

use crate::storage::backend::KeyValueStore;
use crate::storage::error::{StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Shared {
    slots: Mutex<HashMap<String, String>>,
    disabled: AtomicBool,
}

/// Shared in-memory key/value map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    /// Maximum total of key + value bytes across all slots
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the combined size of all keys and values
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`]
    pub fn disable(&self) {
        self.shared.disabled.store(true, Ordering::SeqCst);
    }

    /// Undo [`disable`](Self::disable)
    pub fn enable(&self) {
        self.shared.disabled.store(false, Ordering::SeqCst);
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently used, counted the way the quota counts them
    pub fn used_bytes(&self) -> usize {
        self.slots()
            .map(|slots| slots.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }

    fn check_enabled(&self) -> StoreResult<()> {
        if self.shared.disabled.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is disabled".into()));
        }
        Ok(())
    }

    fn slots(&self) -> StoreResult<MutexGuard<'_, HashMap<String, String>>> {
        self.shared
            .slots
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_enabled()?;
        Ok(self.slots()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_enabled()?;
        let mut slots = self.slots()?;

        if let Some(limit) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.check_enabled()?;
        self.slots()?.remove(key);
        Ok(())
    }
}
