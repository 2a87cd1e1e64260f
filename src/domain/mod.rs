//! Domain Layer
//!
//! Entities, value objects, ports and pure services. Nothing in here
//! performs I/O directly.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
