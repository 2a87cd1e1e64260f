//! Key-Value Store Port
//!
//! Defines the persistence contract used by the resolution cache.

/// Errors raised by key-value store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable string key to string value store.
///
/// Writes to the same key are last-write-wins. There is no expiry; callers
/// decide whether a stored value is still fresh.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
