//! Sync transport implementations

mod broadcast;
mod null;
#[cfg(feature = "sync-redis")]
mod redis;

pub use broadcast::BroadcastSyncTransport;
pub use null::NullSyncTransport;
#[cfg(feature = "sync-redis")]
pub use redis::RedisSyncTransport;
