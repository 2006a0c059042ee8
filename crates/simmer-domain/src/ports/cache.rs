//! Cache Backend Port
//!
//! Port for cache backend providers. Supports a distributed backend
//! (Redis), an in-process fallback (Moka), and a null backend for
//! testing and cache-disabled mode.
//!
//! Values are opaque JSON strings; TTL is owned and enforced by the
//! backend, never by callers.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Default page size for cursor-based pattern scans
pub const DEFAULT_SCAN_PAGE_SIZE: usize = 100;

/// Cache Backend Port
///
/// Defines the contract for cache backends. Implementations must provide
/// JSON string storage with per-entry TTL and a paginated key scan.
///
/// # Implementations
///
/// - **Redis**: distributed cache for multi-instance deployments
/// - **Memory**: Moka-based in-process fallback
/// - **Null**: no-op backend for testing
///
/// # Example
///
/// ```ignore
/// let ttl = Duration::from_secs(300);
/// backend.set("recipes:detail:r1:public:v1", &json, ttl).await?;
///
/// if let Some(json) = backend.get("recipes:detail:r1:public:v1").await? {
///     let recipe: Recipe = serde_json::from_str(&json)?;
/// }
/// ```
#[async_trait]
pub trait CacheBackend: Send + Sync + std::fmt::Debug {
    /// Get a value from the cache
    ///
    /// Returns the cached JSON string if present, `None` if absent or
    /// expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value in the cache with a TTL
    ///
    /// Expiry of the entry is owned by the backend.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Delete a value from the cache
    ///
    /// Returns true if the key existed. Deleting an absent key is not an
    /// error.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Scan one page of keys matching a glob pattern
    ///
    /// Cursor-based: pass cursor `0` to start; the returned cursor is `0`
    /// when the scan is complete, otherwise feed it back to get the next
    /// page. Implementations must never perform a blocking full-keyspace
    /// enumeration.
    async fn scan(&self, pattern: &str, cursor: u64, page_size: usize)
        -> Result<(u64, Vec<String>)>;

    /// Clear all values from the cache
    ///
    /// Emergency/development use only.
    async fn clear(&self) -> Result<()>;

    /// Name of this backend implementation (e.g. "redis", "memory")
    fn backend_name(&self) -> &str;
}
