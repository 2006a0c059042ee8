//! Cross-instance invalidation broadcast
//!
//! A single named pub/sub channel shared by every running instance. A
//! write on one instance publishes the invalidation descriptors it
//! already applied locally; every instance's subscriber (including the
//! originator) performs the same local deletions. Delivery is
//! at-least-once and unordered; duplicates are harmless because deletes
//! are idempotent.
//!
//! If the transport is unreachable the service stays correct for a
//! single instance, with cross-instance staleness bounded by TTL instead
//! of by this channel.

use crate::cache::SafeCache;
use crate::constants::{SYNC_BACKOFF_BASE_MS, SYNC_BACKOFF_CAP_MS, SYNC_RETRY_CAP};
use futures::StreamExt;
use simmer_domain::constants::SYNC_CHANNEL_NAME;
use simmer_domain::ports::SyncTransport;
use simmer_domain::value_objects::InvalidationDescriptor;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Connection lifecycle of the sync channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Not yet started
    Disconnected,
    /// Establishing (or re-establishing) the subscription
    Connecting,
    /// Subscribed and consuming messages
    Connected,
    /// Gave up after the retry cap; single-instance behavior for the
    /// rest of the process lifetime
    Disabled,
}

/// Tuning knobs for [`SyncChannel`]
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Channel name shared by all instances
    pub channel: String,
    /// Failed connection attempts tolerated before giving up
    pub retry_cap: u32,
    /// Base backoff, multiplied by the attempt count
    pub backoff_base: Duration,
    /// Backoff ceiling
    pub backoff_cap: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            channel: SYNC_CHANNEL_NAME.to_string(),
            retry_cap: SYNC_RETRY_CAP,
            backoff_base: Duration::from_millis(SYNC_BACKOFF_BASE_MS),
            backoff_cap: Duration::from_millis(SYNC_BACKOFF_CAP_MS),
        }
    }
}

struct SyncChannelInner {
    transport: Option<Arc<dyn SyncTransport>>,
    options: SyncOptions,
    state: Mutex<SyncState>,
    cancel: CancellationToken,
    subscriber_task: Mutex<Option<JoinHandle<()>>>,
}

impl SyncChannelInner {
    fn set_state(&self, state: SyncState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

/// Handle to the invalidation broadcast channel
///
/// Cheap to clone; publishing is fire-and-forget. Owns a background
/// subscriber task that applies remote invalidations to the local
/// [`SafeCache`].
#[derive(Clone)]
pub struct SyncChannel {
    inner: Arc<SyncChannelInner>,
}

impl SyncChannel {
    /// Start the sync channel over a transport
    ///
    /// Spawns the subscriber task immediately. Connection failures are
    /// retried with capped backoff; after `retry_cap` consecutive failed
    /// attempts the channel settles in [`SyncState::Disabled`].
    pub fn start(
        transport: Arc<dyn SyncTransport>,
        cache: SafeCache,
        options: SyncOptions,
    ) -> Self {
        let inner = Arc::new(SyncChannelInner {
            transport: Some(transport),
            options,
            state: Mutex::new(SyncState::Disconnected),
            cancel: CancellationToken::new(),
            subscriber_task: Mutex::new(None),
        });

        let handle = tokio::spawn(Self::run_subscriber(Arc::clone(&inner), cache));
        *inner
            .subscriber_task
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(handle);

        Self { inner }
    }

    /// A permanently disabled channel (no transport configured)
    ///
    /// Publishes no-op; the local instance still deletes its own keys on
    /// invalidation, and instances converge as TTLs expire.
    pub fn disabled() -> Self {
        info!("cache sync disabled - running single-instance");
        Self {
            inner: Arc::new(SyncChannelInner {
                transport: None,
                options: SyncOptions::default(),
                state: Mutex::new(SyncState::Disabled),
                cancel: CancellationToken::new(),
                subscriber_task: Mutex::new(None),
            }),
        }
    }

    /// Current connection state
    pub fn state(&self) -> SyncState {
        *self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Broadcast an invalidation descriptor to all instances
    ///
    /// Fire-and-forget: a publish failure is logged and never undoes the
    /// local deletion the publisher already performed.
    pub async fn publish(&self, descriptor: &InvalidationDescriptor) {
        let Some(transport) = &self.inner.transport else {
            return;
        };
        if self.state() == SyncState::Disabled {
            return;
        }

        let payload = match serde_json::to_string(descriptor) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to serialize invalidation descriptor");
                return;
            }
        };

        if let Err(e) = transport
            .publish(&self.inner.options.channel, &payload)
            .await
        {
            error!(
                channel = %self.inner.options.channel,
                error = %e,
                "failed to publish invalidation"
            );
        }
    }

    /// Stop the subscriber task
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handle = self
            .inner
            .subscriber_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Subscriber loop: `Disconnected → Connecting → Connected`, back to
    /// `Connecting` on a lost connection, `Disabled` once the retry cap
    /// is exhausted.
    async fn run_subscriber(inner: Arc<SyncChannelInner>, cache: SafeCache) {
        let Some(transport) = inner.transport.clone() else {
            return;
        };
        let channel = inner.options.channel.clone();
        let mut failed_attempts = 0u32;

        loop {
            if inner.cancel.is_cancelled() {
                return;
            }

            inner.set_state(SyncState::Connecting);

            match transport.subscribe(&channel).await {
                Ok(mut stream) => {
                    inner.set_state(SyncState::Connected);
                    failed_attempts = 0;
                    info!(channel = %channel, transport = transport.transport_name(),
                        "cache sync connected");

                    loop {
                        tokio::select! {
                            () = inner.cancel.cancelled() => return,
                            message = stream.next() => match message {
                                Some(payload) => {
                                    Self::handle_message(&cache, &payload).await;
                                }
                                None => {
                                    warn!(channel = %channel, "cache sync connection lost");
                                    break;
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(channel = %channel, error = %e, "cache sync subscribe failed");
                }
            }

            failed_attempts += 1;
            if failed_attempts > inner.options.retry_cap {
                inner.set_state(SyncState::Disabled);
                warn!(
                    attempts = failed_attempts,
                    "cache sync disabled after repeated failures - continuing single-instance"
                );
                return;
            }

            let backoff = inner
                .options
                .backoff_base
                .saturating_mul(failed_attempts)
                .min(inner.options.backoff_cap);

            tokio::select! {
                () = inner.cancel.cancelled() => return,
                () = tokio::time::sleep(backoff) => {}
            }
        }
    }

    /// Apply one wire message to the local cache
    ///
    /// Literal keys delete directly; patterns go through the same
    /// cursor-based scan-and-delete as local invalidation. Malformed
    /// messages are dropped with a logged error. Duplicate delivery is
    /// safe: deletion is idempotent.
    async fn handle_message(cache: &SafeCache, payload: &str) {
        match serde_json::from_str::<InvalidationDescriptor>(payload) {
            Ok(InvalidationDescriptor::Key(key)) => {
                cache.delete(&key).await;
                debug!(key, "invalidated cache key from sync message");
            }
            Ok(InvalidationDescriptor::Pattern(pattern)) => {
                cache.delete_pattern(&pattern).await;
            }
            Err(e) => {
                error!(error = %e, payload, "dropping malformed invalidation message");
            }
        }
    }
}

impl std::fmt::Debug for SyncChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncChannel")
            .field("channel", &self.inner.options.channel)
            .field("state", &self.state())
            .finish()
    }
}
