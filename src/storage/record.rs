//! Record types stored in a list slot
//!
//! - `Record`: what a type needs to live in a [`PersistentList`](super::PersistentList)
//! - `GridEntry`: the entries shown in the grid, stored under [`GRID_ENTRIES_KEY`]

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Slot holding the grid's entries
pub const GRID_ENTRIES_KEY: &str = "gridEntries";

/// Name of the free-form field every record carries
pub const ATTRIBUTES_FIELD: &str = "attributes";

/// A value that can be stored in a list slot.
///
/// `normalize` runs on every record right after a successful load, so
/// records written by older versions come back with all fields defined.
pub trait Record: Serialize + DeserializeOwned {
    fn normalize(&mut self) {}
}

/// Untyped records: any JSON value, with `attributes` filled in on objects.
impl Record for Value {
    fn normalize(&mut self) {
        if let Value::Object(map) = self {
            let attributes = map
                .entry(ATTRIBUTES_FIELD)
                .or_insert_with(|| Value::Array(Vec::new()));
            if attributes.is_null() {
                *attributes = Value::Array(Vec::new());
            }
        }
    }
}

/// One row of the grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridEntry {
    pub id: u64,
    /// Display name; omitted from storage when empty
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    /// Free-form values attached by the user
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<Value>,
}

impl GridEntry {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder method: append an attribute
    pub fn attribute(mut self, value: impl Into<Value>) -> Self {
        self.attributes.push(value.into());
        self
    }

    /// Attributes rendered as plain text, strings without quotes
    pub fn attribute_labels(&self) -> Vec<String> {
        self.attributes
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

impl Record for GridEntry {
    fn normalize(&mut self) {
        let trimmed = self.name.trim();
        if trimmed.len() != self.name.len() {
            self.name = trimmed.to_string();
        }
        self.attributes.retain(|v| !v.is_null());
    }
}

/// Next unused id: one past the largest id present.
///
/// When the largest id is `u64::MAX` the smallest free id is used instead.
pub fn next_id(entries: &[GridEntry]) -> u64 {
    match entries.iter().map(|e| e.id).max() {
        None => 1,
        Some(max) => max.checked_add(1).unwrap_or_else(|| smallest_free_id(entries)),
    }
}

/// Smallest id >= 1 not taken by any entry
fn smallest_free_id(entries: &[GridEntry]) -> u64 {
    let mut ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut candidate = 1;
    for id in ids {
        if id > candidate {
            break;
        }
        if id == candidate {
            candidate += 1;
        }
    }
    candidate
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
