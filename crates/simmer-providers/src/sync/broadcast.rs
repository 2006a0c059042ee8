//! In-process broadcast sync transport
//!
//! Distributes invalidation messages over a tokio broadcast channel.
//! Used in tests and wherever several cache handles inside one process
//! need to behave like independent instances. Messages are ephemeral;
//! slow subscribers drop the oldest messages, which is acceptable for a
//! best-effort invalidation channel bounded by TTL.

use async_trait::async_trait;
use futures::stream;
use simmer_domain::error::Result;
use simmer_domain::ports::{SyncMessageStream, SyncTransport};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Default channel capacity
const DEFAULT_CAPACITY: usize = 1024;

/// Sync transport using a tokio broadcast channel
#[derive(Clone)]
pub struct BroadcastSyncTransport {
    sender: Arc<broadcast::Sender<String>>,
    capacity: usize,
}

impl BroadcastSyncTransport {
    /// Create with default capacity (1024)
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create with a custom buffer capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
            capacity,
        }
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastSyncTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncTransport for BroadcastSyncTransport {
    async fn publish(&self, channel: &str, payload: &str) -> Result<()> {
        // A send error only means no subscribers are listening.
        match self.sender.send(payload.to_string()) {
            Ok(count) => debug!(channel, subscribers = count, "broadcast invalidation message"),
            Err(_) => debug!(channel, "broadcast message with no subscribers"),
        }
        Ok(())
    }

    async fn subscribe(&self, _channel: &str) -> Result<SyncMessageStream> {
        let receiver = self.sender.subscribe();

        let stream = stream::unfold(receiver, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(payload) => return Some((payload, rx)),
                    // Lagged: skip dropped messages and keep reading.
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });

        Ok(Box::pin(stream))
    }

    fn transport_name(&self) -> &str {
        "broadcast"
    }
}

impl std::fmt::Debug for BroadcastSyncTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastSyncTransport")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}
