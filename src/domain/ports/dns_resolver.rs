//! DNS Resolver Port
//!
//! Defines the interface for resolving an edge hostname to an IPv4 address.

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Resolver for hostname to IPv4 address.
///
/// This is an outbound port that abstracts the DNS transport.
/// The production adapter queries a DNS-over-HTTPS JSON endpoint.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolve a hostname to the first A record.
    ///
    /// Returns None on any failure (transport, status, malformed body,
    /// no A record). Implementations never panic and never surface errors.
    async fn resolve_ipv4(&self, host: &str) -> Option<Ipv4Addr>;
}
