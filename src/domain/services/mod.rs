//! Domain Services
//!
//! Pure domain logic shared by the application layer.

pub mod country_labels;
mod resolution_cache;

pub use resolution_cache::{now_millis, ResolutionCache};
