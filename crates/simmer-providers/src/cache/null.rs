//! Null cache backend for testing
//!
//! A backend that stores nothing. Useful for tests and for running with
//! caching disabled.

use async_trait::async_trait;
use simmer_domain::error::Result;
use simmer_domain::ports::CacheBackend;
use std::time::Duration;

/// Null cache backend that doesn't store anything
///
/// All operations succeed; gets always miss, deletes always report the
/// key as absent.
#[derive(Debug, Clone, Default)]
pub struct NullCacheBackend;

impl NullCacheBackend {
    /// Create a new null cache backend
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheBackend for NullCacheBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn scan(
        &self,
        _pattern: &str,
        _cursor: u64,
        _page_size: usize,
    ) -> Result<(u64, Vec<String>)> {
        Ok((0, Vec::new()))
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "null"
    }
}
