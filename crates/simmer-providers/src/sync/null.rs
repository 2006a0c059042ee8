//! Null sync transport
//!
//! Publishes into the void and never delivers anything. Used when sync
//! is disabled: the service stays correct for a single instance, with
//! cross-instance staleness bounded by TTL alone.

use async_trait::async_trait;
use futures::stream;
use simmer_domain::error::Result;
use simmer_domain::ports::{SyncMessageStream, SyncTransport};

/// Sync transport that drops everything
#[derive(Debug, Clone, Default)]
pub struct NullSyncTransport;

impl NullSyncTransport {
    /// Create a new null sync transport
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SyncTransport for NullSyncTransport {
    async fn publish(&self, _channel: &str, _payload: &str) -> Result<()> {
        Ok(())
    }

    async fn subscribe(&self, _channel: &str) -> Result<SyncMessageStream> {
        // Never yields; the subscriber task just parks on it.
        Ok(Box::pin(stream::pending()))
    }

    fn transport_name(&self) -> &str {
        "null"
    }
}
