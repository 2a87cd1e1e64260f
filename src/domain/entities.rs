//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the CDN locator domain.
//! They have no external dependencies beyond serde and contain only business logic.

use crate::domain::value_objects::{Host, SpeedReading};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Location of an edge host as reported by the GeoIP service.
///
/// The serialized field names (`code`, `name`) are part of the persisted
/// cache format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// Country code (ISO 3166-1 alpha-2), empty if the service omitted it
    #[serde(rename = "code", default)]
    pub country_code: String,
    /// Country name in English, empty if the service omitted it
    #[serde(rename = "name", default)]
    pub country_name: String,
}

impl GeoRecord {
    pub fn new(country_code: impl Into<String>, country_name: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            country_name: country_name.into(),
        }
    }
}

/// A cached lookup result for one host.
///
/// Persisted as `{ "ts": <epoch millis>, "geo": { "code", "name" } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the entry was written (milliseconds since the Unix epoch)
    #[serde(rename = "ts")]
    pub written_at_ms: u64,
    pub geo: GeoRecord,
}

impl CacheEntry {
    pub fn new(geo: GeoRecord, written_at_ms: u64) -> Self {
        Self { written_at_ms, geo }
    }

    /// An entry is valid while `now - written_at < ttl`.
    ///
    /// Entries stamped in the future (clock skew) count as age zero.
    pub fn is_valid(&self, now_ms: u64, ttl: Duration) -> bool {
        let age = now_ms.saturating_sub(self.written_at_ms);
        u128::from(age) < ttl.as_millis()
    }
}

/// Published, read-only view of the resolution state.
///
/// The presentation layer polls or subscribes to this; only the
/// resolution pipeline produces new snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSnapshot {
    /// Most recently requested edge host
    pub last_host: Option<Host>,
    /// Label for the most recently applied location, empty if none yet
    pub display_text: String,
    /// Country code behind `display_text`
    pub country_code: Option<String>,
    /// Whether the most recently requested lookup is still in flight
    pub is_resolving: bool,
}

impl ResolutionSnapshot {
    /// Bracketed location badge shown next to the speed reading.
    ///
    /// `None` when there is nothing to show yet.
    pub fn location_badge(&self) -> Option<String> {
        if !self.display_text.is_empty() {
            Some(format!("[{}]", self.display_text))
        } else if self.is_resolving {
            Some("[定位中...]".to_string())
        } else {
            None
        }
    }
}

/// Render the one-line status shown to the user, e.g. `(1.00 MB/s) [新加坡]`.
pub fn render_status_line(speed: &SpeedReading, snapshot: &ResolutionSnapshot) -> String {
    let mut line = format!("({} MB/s)", speed.mbytes_per_sec());
    if let Some(badge) = snapshot.location_badge() {
        line.push(' ');
        line.push_str(&badge);
    }
    line
}

/// Terminal state reached by one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Host is not part of the edge network; nothing happened
    Ignored,
    /// Same host as last time and a label is already shown
    Skipped,
    /// A valid cache entry was applied without network calls
    CacheHit(GeoRecord),
    /// DNS lookup produced no address
    DnsFailed,
    /// GeoIP lookup produced no location
    GeoFailed,
    /// Fresh lookup succeeded and was written to the cache
    Resolved(GeoRecord),
}
