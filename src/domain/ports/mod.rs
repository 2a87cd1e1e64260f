mod dns_resolver;
mod geo_locator;
mod key_value_store;

pub use dns_resolver::DnsResolver;
pub use geo_locator::GeoLocator;
pub use key_value_store::{KeyValueStore, StoreError};
