//! cdn-locator Library
//!
//! Finds out where the CDN edge host serving a media stream is located.
//! Outbound segment requests are observed, their edge hostname resolved
//! over DNS-over-HTTPS and the address located through a GeoIP service.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use application::{PipelineConfig, RequestInterceptor, ResolutionPipeline};
pub use config::load_config;
pub use domain::entities::{
    render_status_line, CacheEntry, GeoRecord, ResolutionSnapshot, Transition,
};
pub use domain::ports::{DnsResolver, GeoLocator, KeyValueStore, StoreError};
pub use domain::services::ResolutionCache;
pub use domain::value_objects::{Host, SpeedReading, TargetPattern};
