//! TTL categories and per-category defaults
//!
//! Every cacheable resource belongs to a named TTL category; the
//! category, not the call site, decides how long entries live. Defaults
//! mirror production values and are overridable through configuration.

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Named resource categories with independent TTL defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtlCategory {
    /// Single-entity detail views
    Detail,
    /// Aggregate listings
    List,
    /// Search result caches
    Search,
    /// Trending feeds
    Trending,
    /// Per-user stats (follower counts etc.)
    Stats,
    /// Session entries
    Session,
    /// Rate-limit counters
    RateLimit,
}

/// Per-category TTLs in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtlConfig {
    /// TTL for detail views
    pub detail_secs: u64,
    /// TTL for aggregate listings
    pub list_secs: u64,
    /// TTL for search result caches
    pub search_secs: u64,
    /// TTL for trending feeds
    pub trending_secs: u64,
    /// TTL for per-user stats
    pub stats_secs: u64,
    /// TTL for session entries
    pub session_secs: u64,
    /// TTL for rate-limit counters
    pub rate_limit_secs: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            detail_secs: TTL_DETAIL_SECS,
            list_secs: TTL_LIST_SECS,
            search_secs: TTL_SEARCH_SECS,
            trending_secs: TTL_TRENDING_SECS,
            stats_secs: TTL_STATS_SECS,
            session_secs: TTL_SESSION_SECS,
            rate_limit_secs: TTL_RATE_LIMIT_SECS,
        }
    }
}

impl TtlConfig {
    /// Resolve the TTL for a category
    pub fn resolve(&self, category: TtlCategory) -> Duration {
        let secs = match category {
            TtlCategory::Detail => self.detail_secs,
            TtlCategory::List => self.list_secs,
            TtlCategory::Search => self.search_secs,
            TtlCategory::Trending => self.trending_secs,
            TtlCategory::Stats => self.stats_secs,
            TtlCategory::Session => self.session_secs,
            TtlCategory::RateLimit => self.rate_limit_secs,
        };
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_per_category() {
        let config = TtlConfig::default();
        assert_eq!(config.resolve(TtlCategory::Detail), Duration::from_secs(1800));
        assert_eq!(config.resolve(TtlCategory::RateLimit), Duration::from_secs(60));
        assert_eq!(
            config.resolve(TtlCategory::Session),
            Duration::from_secs(7 * 24 * 60 * 60)
        );
    }
}
