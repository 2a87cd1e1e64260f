//! Adapters Layer
//!
//! Inbound adapters observe the client's traffic; outbound adapters
//! implement the domain ports over HTTP and local storage.

pub mod inbound;
pub mod outbound;
