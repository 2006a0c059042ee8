//! Redis pub/sub sync transport
//!
//! Broadcasts invalidation messages across instances over a Redis
//! channel. Publisher and subscriber use separate connections, as Redis
//! requires: a connection in subscribe mode cannot issue other commands.

use async_trait::async_trait;
use futures::StreamExt;
use redis::{AsyncCommands, Client};
use simmer_domain::error::{Error, Result};
use simmer_domain::ports::{SyncMessageStream, SyncTransport};
use tracing::debug;

/// Sync transport using Redis pub/sub
#[derive(Clone)]
pub struct RedisSyncTransport {
    client: Client,
}

impl RedisSyncTransport {
    /// Create a new Redis sync transport from a connection URL
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string)
            .map_err(|e| Error::sync_with_source("Failed to create Redis client", e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SyncTransport for RedisSyncTransport {
    async fn publish(&self, channel: &str, payload: &str) -> Result<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::sync_with_source("Failed to get Redis publisher connection", e))?;

        conn.publish::<_, _, ()>(channel, payload)
            .await
            .map_err(|e| {
                Error::sync_with_source(format!("Redis PUBLISH failed on {channel}"), e)
            })?;

        debug!(channel, "published invalidation message");
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<SyncMessageStream> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| Error::sync_with_source("Failed to get Redis subscriber connection", e))?;

        pubsub.subscribe(channel).await.map_err(|e| {
            Error::sync_with_source(format!("Redis SUBSCRIBE failed on {channel}"), e)
        })?;

        debug!(channel, "subscribed to invalidation channel");

        let stream = pubsub
            .into_on_message()
            .filter_map(|msg| async move { msg.get_payload::<String>().ok() });

        Ok(Box::pin(stream))
    }

    fn transport_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisSyncTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSyncTransport").finish()
    }
}
