//! File-backed key/value store
//!
//! Each key is one JSON file under the data directory:
//!
//! ```text
//! <data_dir>/
//!   gridEntries.json
//!   notes.json
//! ```
//!
//! Writes go to a sibling temp file which is then renamed over the slot, so a
//! reader never observes a half-written value.

use crate::storage::backend::KeyValueStore;
use crate::storage::error::{StoreError, StoreResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SLOT_EXTENSION: &str = "json";

/// Directory of slot files.
///
/// Keys become file names, so they are limited to ASCII letters, digits,
/// `-`, `_` and `.` (not leading). Browser storage takes any string as a key;
/// here anything else fails with [`StoreError::InvalidKey`].
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
    /// Maximum size of a single value in bytes
    quota: Option<usize>,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            quota: None,
        }
    }

    /// Reject values larger than `quota` bytes
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`
    pub fn slot_path(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{}.{}", key, SLOT_EXTENSION)))
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.slot_path(key)?;

        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    limit,
                });
            }
        }

        std::fs::create_dir_all(&self.data_dir)?;

        let tmp = path.with_extension(format!("{}.tmp", SLOT_EXTENSION));
        std::fs::write(&tmp, value)?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(StoreError::Io(e));
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        let path = self.slot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
