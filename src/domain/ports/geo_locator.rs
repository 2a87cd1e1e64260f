//! GeoIP Locator Port
//!
//! Defines the interface for locating an IP address.

use crate::domain::entities::GeoRecord;
use async_trait::async_trait;
use std::net::IpAddr;

/// Locator for IP address to country.
///
/// This is an outbound port that abstracts the GeoIP service.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Look up the country of an IP address.
    ///
    /// Returns None if the service reports failure or cannot be reached.
    async fn locate(&self, ip: IpAddr) -> Option<GeoRecord>;
}
