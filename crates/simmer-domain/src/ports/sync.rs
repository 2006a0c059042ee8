//! Sync Transport Port
//!
//! Port for the publish/subscribe transport that broadcasts invalidation
//! messages to every running instance. Delivery is at-least-once and
//! unordered; consumers must tolerate duplicates, which holds because
//! cache deletion is idempotent.

use crate::error::Result;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Boxed async stream of raw message payloads from a subscription
///
/// Payloads are the JSON wire form of
/// [`InvalidationDescriptor`](crate::value_objects::InvalidationDescriptor).
/// The stream ending signals a lost connection.
pub type SyncMessageStream = Pin<Box<dyn Stream<Item = String> + Send + 'static>>;

/// Sync transport interface for raw channel pub/sub
///
/// Implementations: Redis pub/sub (multi-instance), an in-process
/// broadcast transport (tests, single instance), and a null transport
/// (sync disabled).
#[async_trait]
pub trait SyncTransport: Send + Sync + std::fmt::Debug {
    /// Publish a payload on a named channel
    ///
    /// Fire-and-forget from the caller's point of view; an error here is
    /// logged by the caller, never escalated.
    async fn publish(&self, channel: &str, payload: &str) -> Result<()>;

    /// Subscribe to a named channel
    ///
    /// Returns a stream of message payloads. Each call establishes an
    /// independent subscription.
    async fn subscribe(&self, channel: &str) -> Result<SyncMessageStream>;

    /// Name of this transport implementation (e.g. "redis", "broadcast")
    fn transport_name(&self) -> &str;
}
