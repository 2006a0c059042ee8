//! Failure-isolated cache access, invalidation, and read-through caching

pub mod invalidator;
pub mod read_through;
pub mod safe;

pub use invalidator::CacheInvalidator;
pub use read_through::{PolicyTable, ReadThrough, RequestContext, RoutePolicy};
pub use safe::{SafeCache, SafeCacheOptions};
