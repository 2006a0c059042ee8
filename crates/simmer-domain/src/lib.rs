//! Domain layer for the Simmer cache coordination layer
//!
//! Core types and business rules with no infrastructure dependencies:
//! cache key construction, invalidation rules, and the ports that
//! backend providers implement.

pub mod constants;
pub mod error;
pub mod invalidation;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
