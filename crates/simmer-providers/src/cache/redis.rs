//! Redis distributed cache backend
//!
//! Distributed cache implementation using Redis as the backend.
//! Suitable for multi-instance deployments.
//!
//! ## Features
//!
//! - Distributed caching shared by all instances
//! - TTL enforced server-side via `SET EX`
//! - Cursor-based `SCAN MATCH` for pattern resolution
//! - Connection reuse via multiplexed connection
//!
//! ## Example
//!
//! ```ignore
//! use simmer_providers::cache::RedisCacheBackend;
//!
//! let backend = RedisCacheBackend::new("redis://localhost:6379")?;
//! ```

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use simmer_domain::error::{Error, Result};
use simmer_domain::ports::CacheBackend;
use std::time::Duration;

/// Redis cache backend
///
/// Uses multiplexed connections for efficient connection reuse.
#[derive(Clone)]
pub struct RedisCacheBackend {
    client: Client,
}

impl RedisCacheBackend {
    /// Create a new Redis cache backend from a connection URL
    ///
    /// # Arguments
    ///
    /// * `connection_string` - Redis URL (e.g. "redis://localhost:6379")
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string)
            .map_err(|e| Error::cache_with_source("Failed to create Redis client", e))?;

        Ok(Self { client })
    }

    /// Create from host and port
    pub fn with_host_port(host: &str, port: u16) -> Result<Self> {
        Self::new(&format!("redis://{host}:{port}"))
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::cache_with_source("Failed to get Redis connection", e))
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;

        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| Error::cache_with_source(format!("Redis GET failed for {key}"), e))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;

        let ttl_secs = ttl.as_secs();
        let result: redis::RedisResult<()> = if ttl_secs > 0 {
            conn.set_ex(key, value, ttl_secs).await
        } else {
            conn.set(key, value).await
        };

        result.map_err(|e| Error::cache_with_source(format!("Redis SET failed for {key}"), e))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;

        let deleted: i32 = conn
            .del(key)
            .await
            .map_err(|e| Error::cache_with_source(format!("Redis DEL failed for {key}"), e))?;
        Ok(deleted > 0)
    }

    async fn scan(
        &self,
        pattern: &str,
        cursor: u64,
        page_size: usize,
    ) -> Result<(u64, Vec<String>)> {
        let mut conn = self.connection().await?;

        // SCAN is O(page) per call; never KEYS, which blocks the server.
        redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(page_size)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::cache_with_source(format!("Redis SCAN failed for {pattern}"), e))
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::cache_with_source("Redis FLUSHDB failed", e))
    }

    fn backend_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheBackend").finish()
    }
}
