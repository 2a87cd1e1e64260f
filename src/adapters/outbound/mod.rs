mod dashmap_kv_store;
mod ipwhois_geo_locator;
mod json_doh_resolver;
mod lookup_error;
mod sqlite_kv_store;

pub use dashmap_kv_store::DashMapKeyValueStore;
pub use ipwhois_geo_locator::IpWhoisGeoLocator;
pub use json_doh_resolver::JsonDohResolver;
pub use lookup_error::LookupError;
pub use sqlite_kv_store::SqliteKeyValueStore;
