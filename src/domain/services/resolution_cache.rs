//! Resolution Cache
//!
//! Host to GeoRecord cache on top of a KeyValueStore.
//! Validity is decided at read time; stale entries stay in the store
//! until a newer lookup overwrites them.

use crate::domain::entities::{CacheEntry, GeoRecord};
use crate::domain::ports::KeyValueStore;
use crate::domain::value_objects::Host;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const KEY_PREFIX: &str = "cache_host_";

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// TTL-gated cache of edge host locations.
///
/// Store failures never escape: a failed read is a miss and a failed
/// write is dropped, both logged at warn.
#[derive(Clone)]
pub struct ResolutionCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl ResolutionCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Storage key for a host.
    pub fn key_for(host: &Host) -> String {
        format!("{}{}", KEY_PREFIX, host.as_str())
    }

    /// Read the entry for a host regardless of its age.
    pub fn get(&self, host: &Host) -> Option<CacheEntry> {
        let key = Self::key_for(host);
        let raw = match self.store.get(&key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("ignoring undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Read the entry for a host only if it is younger than the TTL.
    pub fn get_valid(&self, host: &Host, now_ms: u64) -> Option<CacheEntry> {
        self.get(host).filter(|e| e.is_valid(now_ms, self.ttl))
    }

    /// Write (or overwrite) the entry for a host.
    pub fn put(&self, host: &Host, geo: GeoRecord, written_at_ms: u64) {
        let key = Self::key_for(host);
        let entry = CacheEntry::new(geo, written_at_ms);

        let value = match serde_json::to_string(&entry) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("cache encode failed for {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.set(&key, &value) {
            tracing::warn!("cache write failed for {}: {}", key, e);
        }
    }
}
