//! DashMap Key-Value Store
//!
//! Implements KeyValueStore in memory for the lifetime of the process.

use crate::domain::ports::{KeyValueStore, StoreError};
use dashmap::DashMap;

/// In-memory key-value store.
///
/// Used when no cache file is configured. Never fails.
pub struct DashMapKeyValueStore {
    values: DashMap<String, String>,
}

impl DashMapKeyValueStore {
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for DashMapKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for DashMapKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).map(|e| e.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
