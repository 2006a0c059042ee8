//! Infrastructure layer constants

// ============================================================================
// HEALTH PROBE CONSTANTS
// ============================================================================

/// Canary key written by the health probe; never holds real data
pub const HEALTH_CANARY_KEY: &str = "health:check";

/// TTL of the canary entry in seconds
pub const HEALTH_CANARY_TTL_SECS: u64 = 10;

/// Cooldown after a backend failure before the next probe, in seconds
pub const HEALTH_COOLDOWN_SECS: u64 = 30;

// ============================================================================
// SYNC CHANNEL CONSTANTS
// ============================================================================

/// Maximum failed connection attempts before sync is disabled for the
/// process lifetime
pub const SYNC_RETRY_CAP: u32 = 3;

/// Base reconnect backoff in milliseconds (multiplied by attempt count)
pub const SYNC_BACKOFF_BASE_MS: u64 = 50;

/// Reconnect backoff ceiling in milliseconds
pub const SYNC_BACKOFF_CAP_MS: u64 = 2000;

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "SIMMER";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "simmer.toml";

/// Environment variable consulted for the log filter
pub const LOG_ENV_VAR: &str = "SIMMER_LOG";

/// Capacity of the in-memory fallback cache when no Redis is configured
pub const FALLBACK_MAX_ITEMS: usize = 100;
