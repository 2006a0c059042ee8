//! Configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};
use simmer_domain::constants::SYNC_CHANNEL_NAME;
use simmer_domain::ports::cache::DEFAULT_SCAN_PAGE_SIZE;
use simmer_domain::value_objects::TtlConfig;

/// Cache backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// In-process fallback (Moka)
    Memory,
    /// Distributed cache (Redis)
    Redis,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache enabled; disabled means every operation no-ops
    pub enabled: bool,

    /// Backend to use
    pub backend: CacheBackendKind,

    /// Redis URL; absent falls back to the in-memory backend
    pub redis_url: Option<String>,

    /// Optional key prefix isolating this deployment's keyspace on a
    /// shared backend
    pub namespace: Option<String>,

    /// Capacity of the in-memory fallback (entries)
    pub max_items: usize,

    /// Page size for cursor-based pattern scans
    pub scan_page_size: usize,

    /// Cooldown in seconds after a backend failure before re-probing
    pub cooldown_secs: u64,

    /// Per-category TTLs
    pub ttl: TtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackendKind::Memory,
            redis_url: None,
            namespace: None,
            max_items: FALLBACK_MAX_ITEMS,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
            cooldown_secs: HEALTH_COOLDOWN_SECS,
            ttl: TtlConfig::default(),
        }
    }
}

/// Sync channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Sync enabled; disabled means single-instance behavior
    pub enabled: bool,

    /// Pub/sub channel name shared by all instances
    pub channel: String,

    /// Failed connection attempts tolerated before disabling sync
    pub retry_cap: u32,

    /// Base reconnect backoff in milliseconds
    pub backoff_base_ms: u64,

    /// Reconnect backoff ceiling in milliseconds
    pub backoff_cap_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel: SYNC_CHANNEL_NAME.to_string(),
            retry_cap: SYNC_RETRY_CAP,
            backoff_base_ms: SYNC_BACKOFF_BASE_MS,
            backoff_cap_ms: SYNC_BACKOFF_CAP_MS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace/debug/info/warn/error)
    pub level: String,

    /// Emit JSON-formatted logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Cache layer configuration
    pub cache: CacheConfig,

    /// Sync channel configuration
    pub sync: SyncConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}
