//! Domain layer constants
//!
//! Constants that are part of the caching domain and shared across
//! layers. Infrastructure-specific constants live in
//! `simmer-infrastructure/src/constants.rs`.

// ============================================================================
// CACHE KEY CONSTANTS
// ============================================================================

/// Current cache key format version segment
///
/// Bumping this literal forces a global cache-format change without
/// per-key invalidation: every key built after the bump misses.
pub const CACHE_KEY_VERSION: &str = "v1";

// ============================================================================
// TTL DEFAULTS (seconds, per resource category)
// ============================================================================

/// Default TTL for detail views (single recipe/post/profile)
pub const TTL_DETAIL_SECS: u64 = 30 * 60;

/// Default TTL for aggregate listings
pub const TTL_LIST_SECS: u64 = 5 * 60;

/// Default TTL for search result caches
pub const TTL_SEARCH_SECS: u64 = 60 * 60;

/// Default TTL for trending feeds
pub const TTL_TRENDING_SECS: u64 = 10 * 60;

/// Default TTL for per-user stats (follower counts etc.)
pub const TTL_STATS_SECS: u64 = 5 * 60;

/// Default TTL for session entries
pub const TTL_SESSION_SECS: u64 = 7 * 24 * 60 * 60;

/// Default TTL for rate-limit counters
pub const TTL_RATE_LIMIT_SECS: u64 = 60;

// ============================================================================
// SYNC CHANNEL CONSTANTS
// ============================================================================

/// Default pub/sub channel for invalidation broadcasts
pub const SYNC_CHANNEL_NAME: &str = "cache:invalidation";
