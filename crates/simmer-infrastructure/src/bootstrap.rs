//! Cache layer assembly
//!
//! Builds the whole coordination layer from an [`AppConfig`]: backend
//! selection (Redis, or the in-memory fallback when Redis is absent or
//! unreachable), the [`SafeCache`] wrapper, the sync channel, and the
//! collaborator-facing facades. The resulting [`CacheLayer`] is the one
//! owned resource handed to every consumer, with an explicit shutdown
//! path - there is no module-level singleton.

use crate::cache::read_through::default_policies;
use crate::cache::{CacheInvalidator, ReadThrough, SafeCache, SafeCacheOptions};
use crate::config::{AppConfig, CacheBackendKind};
use crate::sync::{SyncChannel, SyncOptions};
use simmer_domain::error::Result;
use simmer_domain::ports::{CacheBackend, SyncTransport};
use simmer_providers::cache::{MemoryCacheBackend, NullCacheBackend, RedisCacheBackend};
use simmer_providers::sync::RedisSyncTransport;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// The assembled cache coordination layer
///
/// Constructed once at startup and injected into entity services and
/// request dispatch. All handles are cheap clones over shared inner
/// state.
#[derive(Clone, Debug)]
pub struct CacheLayer {
    cache: SafeCache,
    sync: SyncChannel,
    invalidator: CacheInvalidator,
    read_through: ReadThrough,
}

impl CacheLayer {
    /// Assemble the layer from configuration
    ///
    /// Never fails because of an unreachable backend: a missing or bad
    /// Redis endpoint falls back to the in-memory cache, and an
    /// unreachable pub/sub endpoint leaves sync disabled. Both keep the
    /// application correct, with staleness bounded by TTL.
    pub fn start(config: &AppConfig) -> Result<Self> {
        let backend = Self::select_backend(config);
        info!(backend = backend.backend_name(), "cache backend selected");

        let cache = SafeCache::with_options(
            backend,
            SafeCacheOptions {
                cooldown: Duration::from_secs(config.cache.cooldown_secs),
                scan_page_size: config.cache.scan_page_size,
                namespace: config.cache.namespace.clone(),
            },
        );

        let sync = Self::start_sync(config, cache.clone());

        let invalidator = CacheInvalidator::new(cache.clone(), sync.clone());
        let read_through = ReadThrough::new(
            cache.clone(),
            default_policies(),
            config.cache.ttl.clone(),
        );

        Ok(Self {
            cache,
            sync,
            invalidator,
            read_through,
        })
    }

    /// The failure-isolated cache handle
    pub fn cache(&self) -> &SafeCache {
        &self.cache
    }

    /// The sync channel handle
    pub fn sync(&self) -> &SyncChannel {
        &self.sync
    }

    /// The invalidation facade for entity services
    pub fn invalidator(&self) -> &CacheInvalidator {
        &self.invalidator
    }

    /// The read-through wrapper for request dispatch
    pub fn read_through(&self) -> &ReadThrough {
        &self.read_through
    }

    /// Stop background tasks (probe loop and sync subscriber)
    pub async fn shutdown(&self) {
        self.sync.shutdown().await;
        self.cache.shutdown().await;
    }

    fn select_backend(config: &AppConfig) -> Arc<dyn CacheBackend> {
        if !config.cache.enabled {
            warn!("caching disabled by configuration");
            return Arc::new(NullCacheBackend::new());
        }

        if config.cache.backend == CacheBackendKind::Redis {
            if let Some(url) = &config.cache.redis_url {
                match RedisCacheBackend::new(url) {
                    Ok(backend) => return Arc::new(backend),
                    Err(e) => {
                        warn!(error = %e, "Redis unavailable, falling back to in-memory cache");
                    }
                }
            } else {
                warn!("Redis backend selected but no redis_url configured, using in-memory cache");
            }
        }

        Arc::new(MemoryCacheBackend::with_capacity(config.cache.max_items))
    }

    fn start_sync(config: &AppConfig, cache: SafeCache) -> SyncChannel {
        if !config.sync.enabled {
            return SyncChannel::disabled();
        }

        // Sync only makes sense with a shared backend; a lone in-memory
        // instance has nobody to talk to.
        let Some(url) = &config.cache.redis_url else {
            return SyncChannel::disabled();
        };

        let transport: Arc<dyn SyncTransport> = match RedisSyncTransport::new(url) {
            Ok(transport) => Arc::new(transport),
            Err(e) => {
                warn!(error = %e, "failed to create sync transport, sync disabled");
                return SyncChannel::disabled();
            }
        };

        SyncChannel::start(
            transport,
            cache,
            SyncOptions {
                channel: config.sync.channel.clone(),
                retry_cap: config.sync.retry_cap,
                backoff_base: Duration::from_millis(config.sync.backoff_base_ms),
                backoff_cap: Duration::from_millis(config.sync.backoff_cap_ms),
            },
        )
    }
}
