//! Failure-isolated cache wrapper
//!
//! Wraps a [`CacheBackend`] so that **no caller ever needs failure
//! handling for cache problems**. If the backend is down, reads miss,
//! writes and deletes no-op, and the application falls through to the
//! primary store. A background probe task re-checks backend health after
//! a cooldown and restores normal operation once the backend answers
//! again.
//!
//! Sustained unavailability is a performance regression (more store
//! load), never a correctness one, so it surfaces through logs only.

use crate::constants::{HEALTH_CANARY_KEY, HEALTH_CANARY_TTL_SECS, HEALTH_COOLDOWN_SECS};
use serde::de::DeserializeOwned;
use serde::Serialize;
use simmer_domain::ports::cache::DEFAULT_SCAN_PAGE_SIZE;
use simmer_domain::ports::CacheBackend;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Backend health, owned and mutated only by [`SafeCache`]
///
/// Lives for the process lifetime; created optimistically available and
/// confirmed by the initial probe.
#[derive(Debug)]
pub struct HealthState {
    available: AtomicBool,
    cooldown_until: Mutex<Option<Instant>>,
}

impl HealthState {
    fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            cooldown_until: Mutex::new(None),
        }
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    fn degrade(&self, cooldown: Duration) {
        self.available.store(false, Ordering::Relaxed);
        let mut until = self.cooldown_until.lock().unwrap_or_else(|e| e.into_inner());
        *until = Some(Instant::now() + cooldown);
    }

    fn restore(&self) {
        self.available.store(true, Ordering::Relaxed);
        let mut until = self.cooldown_until.lock().unwrap_or_else(|e| e.into_inner());
        *until = None;
    }

    fn cooldown_remaining(&self) -> Option<Duration> {
        let until = self.cooldown_until.lock().unwrap_or_else(|e| e.into_inner());
        until.map(|t| t.saturating_duration_since(Instant::now()))
    }
}

/// Tuning knobs for [`SafeCache`]
#[derive(Debug, Clone)]
pub struct SafeCacheOptions {
    /// Cooldown after a backend failure before re-probing
    pub cooldown: Duration,
    /// Page size for cursor-based pattern scans
    pub scan_page_size: usize,
    /// Optional key prefix isolating this deployment's keyspace
    pub namespace: Option<String>,
}

impl Default for SafeCacheOptions {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(HEALTH_COOLDOWN_SECS),
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
            namespace: None,
        }
    }
}

struct SafeCacheInner {
    backend: Arc<dyn CacheBackend>,
    health: HealthState,
    degraded: Notify,
    options: SafeCacheOptions,
    cancel: CancellationToken,
    probe_task: Mutex<Option<JoinHandle<()>>>,
}

impl SafeCacheInner {
    /// Physical key as stored in the backend
    fn full_key(&self, key: &str) -> String {
        match &self.options.namespace {
            Some(ns) => format!("{ns}:{key}"),
            None => key.to_string(),
        }
    }
}

/// Failure-isolated cache handle
///
/// Cheap to clone; all clones share one backend, one [`HealthState`],
/// and one probe task. Construct once at startup, inject everywhere,
/// call [`SafeCache::shutdown`] on the way out.
#[derive(Clone)]
pub struct SafeCache {
    inner: Arc<SafeCacheInner>,
}

impl SafeCache {
    /// Wrap a backend with default options
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self::with_options(backend, SafeCacheOptions::default())
    }

    /// Wrap a backend with explicit options
    ///
    /// Spawns the health probe task; the initial probe runs immediately.
    pub fn with_options(backend: Arc<dyn CacheBackend>, options: SafeCacheOptions) -> Self {
        let inner = Arc::new(SafeCacheInner {
            backend,
            health: HealthState::new(),
            degraded: Notify::new(),
            options,
            cancel: CancellationToken::new(),
            probe_task: Mutex::new(None),
        });

        let handle = tokio::spawn(Self::run_probe_loop(Arc::clone(&inner)));
        *inner.probe_task.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);

        Self { inner }
    }

    /// Whether the backend is currently considered healthy
    pub fn is_available(&self) -> bool {
        self.inner.health.is_available()
    }

    /// Get a raw JSON value; absent on miss or any backend problem
    pub async fn get_raw(&self, key: &str) -> Option<String> {
        if !self.is_available() {
            return None;
        }

        let key = &self.inner.full_key(key);
        match self.inner.backend.get(key).await {
            Ok(value) => value,
            Err(e) => {
                error!(key, error = %e, "cache GET failed");
                self.mark_failure();
                None
            }
        }
    }

    /// Get a typed value; deserialization problems count as a miss
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.get_raw(key).await?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding undeserializable cached value");
                None
            }
        }
    }

    /// Set a raw JSON value; errors are swallowed, never propagated
    pub async fn set_raw(&self, key: &str, value: &str, ttl: Duration) {
        if !self.is_available() {
            return;
        }

        let key = &self.inner.full_key(key);
        if let Err(e) = self.inner.backend.set(key, value, ttl).await {
            error!(key, error = %e, "cache SET failed");
            self.mark_failure();
        }
    }

    /// Serialize and set a typed value
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_string(value) {
            Ok(json) => self.set_raw(key, &json, ttl).await,
            Err(e) => warn!(key, error = %e, "failed to serialize value for cache"),
        }
    }

    /// Delete a key; deleting an absent key is not an error
    pub async fn delete(&self, key: &str) {
        let key = self.inner.full_key(key);
        self.delete_physical(&key).await;
    }

    /// Delete by the backend's own key, bypassing the namespace prefix
    async fn delete_physical(&self, key: &str) {
        if !self.is_available() {
            return;
        }

        if let Err(e) = self.inner.backend.delete(key).await {
            error!(key, error = %e, "cache DEL failed");
            self.mark_failure();
        }
    }

    /// Delete every key matching a glob pattern
    ///
    /// Resolved with a cursor-based scan so one invalidation cannot
    /// stall other cache traffic. A mid-scan error is treated as "no
    /// further keys found".
    pub async fn delete_pattern(&self, pattern: &str) {
        if !self.is_available() {
            return;
        }

        // Accumulate the full match set before deleting so in-flight
        // deletions cannot shift the cursor under the scan.
        let pattern = &self.inner.full_key(pattern);
        let page_size = self.inner.options.scan_page_size;
        let mut matched = Vec::new();
        let mut cursor = 0u64;

        loop {
            match self.inner.backend.scan(pattern, cursor, page_size).await {
                Ok((next_cursor, keys)) => {
                    matched.extend(keys);
                    if next_cursor == 0 {
                        break;
                    }
                    cursor = next_cursor;
                }
                Err(e) => {
                    warn!(pattern, error = %e, "pattern scan aborted");
                    self.mark_failure();
                    break;
                }
            }
        }

        // Scanned keys are already physical keys.
        let deleted = matched.len();
        for key in &matched {
            self.delete_physical(key).await;
        }

        debug!(pattern, deleted, "pattern invalidation finished");
    }

    /// Clear the whole cache
    ///
    /// Emergency/development use only; failures are swallowed like any
    /// other cache error.
    pub async fn clear_all(&self) {
        if !self.is_available() {
            return;
        }

        match self.inner.backend.clear().await {
            Ok(()) => warn!("all caches cleared"),
            Err(e) => {
                error!(error = %e, "cache clear failed");
                self.mark_failure();
            }
        }
    }

    /// Stop the probe task
    ///
    /// Idempotent; cache operations after shutdown still work, but the
    /// backend is no longer re-probed after a failure.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handle = self
            .inner
            .probe_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn mark_failure(&self) {
        if self.inner.health.is_available() {
            warn!(
                cooldown_secs = self.inner.options.cooldown.as_secs(),
                "cache backend degraded, serving without cache"
            );
        }
        self.inner.health.degrade(self.inner.options.cooldown);
        self.inner.degraded.notify_one();
    }

    /// Probe loop: initial probe at construction, then one probe per
    /// cooldown expiry while degraded. Probes never run more often than
    /// the cooldown and are never triggered synchronously by requests.
    async fn run_probe_loop(inner: Arc<SafeCacheInner>) {
        Self::probe(&inner).await;

        loop {
            // Wait for a degradation signal only while healthy; a failed
            // probe (including the initial one) re-arms the cooldown
            // without any request traffic to signal it.
            if inner.health.is_available() {
                tokio::select! {
                    () = inner.cancel.cancelled() => return,
                    () = inner.degraded.notified() => {}
                }
            }

            while !inner.health.is_available() {
                let wait = inner
                    .health
                    .cooldown_remaining()
                    .unwrap_or(inner.options.cooldown);

                tokio::select! {
                    () = inner.cancel.cancelled() => return,
                    () = tokio::time::sleep(wait) => {}
                }

                Self::probe(&inner).await;
            }
        }
    }

    /// Canary probe: write a throwaway key with a short TTL and read it
    /// back. Success restores availability; failure re-arms the
    /// cooldown.
    async fn probe(inner: &SafeCacheInner) {
        let canary_key = inner.full_key(HEALTH_CANARY_KEY);
        let canary_ttl = Duration::from_secs(HEALTH_CANARY_TTL_SECS);

        let healthy = match inner.backend.set(&canary_key, "ok", canary_ttl).await {
            Ok(()) => matches!(inner.backend.get(&canary_key).await, Ok(Some(_))),
            Err(_) => false,
        };

        if healthy {
            let was_degraded = !inner.health.is_available();
            inner.health.restore();
            if was_degraded {
                info!("cache backend recovered");
            } else {
                debug!("cache backend healthy");
            }
        } else {
            inner.health.degrade(inner.options.cooldown);
            warn!(
                backend = inner.backend.backend_name(),
                cooldown_secs = inner.options.cooldown.as_secs(),
                "cache health probe failed"
            );
        }
    }
}

impl std::fmt::Debug for SafeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeCache")
            .field("backend", &self.inner.backend.backend_name())
            .field("available", &self.is_available())
            .finish()
    }
}
