//! Moka in-memory cache backend
//!
//! In-process fallback used when no Redis endpoint is configured. Keeps a
//! single instance fast at the cost of cross-instance coherence, which is
//! then bounded only by TTL.
//!
//! ## Features
//!
//! - High-performance concurrent cache (Moka)
//! - Capacity-bounded (default 100 entries)
//! - Per-entry TTL via Moka's `Expiry` policy
//! - Simulated cursor scan over a sorted key snapshot

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use simmer_domain::error::Result;
use simmer_domain::ports::CacheBackend;
use simmer_domain::value_objects::key_matches_pattern;
use std::time::{Duration, Instant};

/// Default capacity of the in-memory fallback
pub const DEFAULT_MAX_ITEMS: usize = 100;

#[derive(Clone)]
struct CachedEntry {
    value: String,
    ttl: Duration,
}

struct PerEntryExpiry;

impl Expiry<String, CachedEntry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Moka-based in-memory cache backend
#[derive(Clone)]
pub struct MemoryCacheBackend {
    cache: Cache<String, CachedEntry>,
    max_items: usize,
}

impl MemoryCacheBackend {
    /// Create with the default fallback capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ITEMS)
    }

    /// Create with a specific maximum number of entries
    pub fn with_capacity(max_items: usize) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_items as u64)
            .expire_after(PerEntryExpiry)
            .build();

        Self { cache, max_items }
    }

    /// Maximum number of entries held
    pub fn max_items(&self) -> usize {
        self.max_items
    }
}

impl Default for MemoryCacheBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let entry = CachedEntry {
            value: value.to_string(),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let existed = self.cache.contains_key(key);
        self.cache.invalidate(key).await;
        Ok(existed)
    }

    async fn scan(
        &self,
        pattern: &str,
        cursor: u64,
        page_size: usize,
    ) -> Result<(u64, Vec<String>)> {
        // Evict expired entries so the snapshot is accurate.
        self.cache.run_pending_tasks().await;

        // The fallback keyspace is bounded by max_items, so a sorted
        // snapshot keeps the cursor stable across pages.
        let mut matched: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key_matches_pattern(pattern, key))
            .map(|(key, _)| key.as_ref().clone())
            .collect();
        matched.sort();

        let start = cursor as usize;
        if start >= matched.len() {
            return Ok((0, Vec::new()));
        }

        let end = (start + page_size.max(1)).min(matched.len());
        let page = matched[start..end].to_vec();
        let next_cursor = if end >= matched.len() { 0 } else { end as u64 };

        Ok((next_cursor, page))
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryCacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheBackend")
            .field("max_items", &self.max_items)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let backend = MemoryCacheBackend::new();
        backend
            .set("recipes:detail:r1:public:v1", r#"{"id":"r1"}"#, Duration::from_secs(60))
            .await
            .unwrap();

        let value = backend.get("recipes:detail:r1:public:v1").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"id":"r1"}"#));
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let backend = MemoryCacheBackend::new();
        backend
            .set("k", "v", Duration::from_millis(20))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(backend.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let backend = MemoryCacheBackend::new();
        backend.set("k", "v", Duration::from_secs(60)).await.unwrap();

        assert!(backend.delete("k").await.unwrap());
        assert!(!backend.delete("k").await.unwrap());
        assert!(!backend.delete("never-existed").await.unwrap());
    }

    #[tokio::test]
    async fn scan_pages_through_matches() {
        let backend = MemoryCacheBackend::new();
        for i in 0..5 {
            backend
                .set(&format!("recipes:list:page:{i}:v1"), "[]", Duration::from_secs(60))
                .await
                .unwrap();
        }
        backend
            .set("posts:detail:p1:public:v1", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        let mut cursor = 0;
        let mut keys = Vec::new();
        loop {
            let (next, page) = backend.scan("recipes:list:*", cursor, 2).await.unwrap();
            keys.extend(page);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        assert_eq!(keys.len(), 5);
        assert!(keys.iter().all(|k| k.starts_with("recipes:list:")));
    }
}
