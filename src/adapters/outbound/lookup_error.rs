//! Lookup Errors
//!
//! Typed failures of the HTTP lookup adapters. These never leave the
//! adapter: the port contract turns every error into `None`.

/// Failure of a DoH or GeoIP lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no A record in answer")]
    NoAnswer,
    #[error("lookup rejected: {0}")]
    Rejected(String),
}
