//! Domain value objects
//!
//! Immutable values shared across the cache layer: key construction,
//! invalidation descriptors, and TTL categories.

pub mod descriptor;
pub mod key;
pub mod ttl;

pub use descriptor::InvalidationDescriptor;
pub use key::{key_matches_pattern, normalize_segment, CacheKeyBuilder};
pub use ttl::{TtlCategory, TtlConfig};
