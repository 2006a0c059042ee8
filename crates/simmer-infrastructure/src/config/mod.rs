//! Configuration loading and types

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, CacheBackendKind, CacheConfig, LoggingConfig, SyncConfig};
