//! Ports implemented by backend providers
//!
//! The domain defines the contracts; `simmer-providers` supplies the
//! Redis, Moka, and Null implementations.

pub mod cache;
pub mod sync;

pub use cache::CacheBackend;
pub use sync::{SyncMessageStream, SyncTransport};
