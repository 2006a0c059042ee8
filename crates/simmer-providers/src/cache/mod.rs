//! Cache backend implementations

#[cfg(feature = "cache-moka")]
mod memory;
mod null;
#[cfg(feature = "cache-redis")]
mod redis;

#[cfg(feature = "cache-moka")]
pub use memory::MemoryCacheBackend;
pub use null::NullCacheBackend;
#[cfg(feature = "cache-redis")]
pub use redis::RedisCacheBackend;
