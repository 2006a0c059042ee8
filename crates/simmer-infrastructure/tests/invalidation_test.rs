//! End-to-end invalidation flow against the in-memory backend
//!
//! Seeds the cache the way read paths would, mutates an entity, and
//! checks that every stale literal key and pattern-matched entry is
//! gone.

use simmer_infrastructure::cache::{CacheInvalidator, SafeCache};
use simmer_infrastructure::sync::SyncChannel;
use simmer_providers::cache::MemoryCacheBackend;
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(300);

async fn seeded_cache() -> (SafeCache, Arc<MemoryCacheBackend>) {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = SafeCache::new(backend.clone());

    for key in [
        "recipes:detail:R1:public:v1",
        "users:recipes:U1:list:v1",
        "recipes:list:page:1:v1",
        "recipes:list:page:2:v1",
        "recipes:trending:weekly:v1",
        "search:recipes:query:beef:v1",
        "posts:detail:P1:public:v1",
    ] {
        cache.set_raw(key, "{}", TTL).await;
    }

    (cache, backend)
}

#[tokio::test]
async fn recipe_invalidation_clears_literals_and_patterns() {
    let (cache, _backend) = seeded_cache().await;
    let invalidator = CacheInvalidator::new(cache.clone(), SyncChannel::disabled());

    invalidator.invalidate_recipe("R1", "U1").await;

    assert_eq!(cache.get_raw("recipes:detail:R1:public:v1").await, None);
    assert_eq!(cache.get_raw("users:recipes:U1:list:v1").await, None);

    // Every previously-cached entry under the aggregate patterns is
    // unreachable.
    for key in [
        "recipes:list:page:1:v1",
        "recipes:list:page:2:v1",
        "recipes:trending:weekly:v1",
        "search:recipes:query:beef:v1",
    ] {
        assert_eq!(cache.get_raw(key).await, None, "stale key survived: {key}");
    }

    // Unrelated entries are untouched.
    assert_eq!(
        cache.get_raw("posts:detail:P1:public:v1").await.as_deref(),
        Some("{}")
    );

    cache.shutdown().await;
}

#[tokio::test]
async fn invalidation_is_idempotent() {
    let (cache, _backend) = seeded_cache().await;
    let invalidator = CacheInvalidator::new(cache.clone(), SyncChannel::disabled());

    invalidator.invalidate_recipe("R1", "U1").await;
    // Second run deletes nothing and must not error or disturb other
    // entries.
    invalidator.invalidate_recipe("R1", "U1").await;

    assert_eq!(cache.get_raw("recipes:detail:R1:public:v1").await, None);
    assert!(cache.is_available());

    cache.shutdown().await;
}

#[tokio::test]
async fn follow_invalidation_touches_both_parties() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let cache = SafeCache::new(backend);
    for key in [
        "users:profile:u1:stats:v1",
        "users:profile:u2:stats:v1",
        "users:profile:u1:following:v1",
        "users:profile:u2:followers:v1",
        "posts:feed:u1:page:1:v1",
        "posts:feed:u2:page:1:v1",
    ] {
        cache.set_raw(key, "{}", TTL).await;
    }
    let invalidator = CacheInvalidator::new(cache.clone(), SyncChannel::disabled());

    invalidator.invalidate_follow("u1", "u2").await;

    assert_eq!(cache.get_raw("users:profile:u1:stats:v1").await, None);
    assert_eq!(cache.get_raw("users:profile:u2:stats:v1").await, None);
    assert_eq!(cache.get_raw("users:profile:u1:following:v1").await, None);
    assert_eq!(cache.get_raw("users:profile:u2:followers:v1").await, None);
    // The acting user's feed pages are stale; the target's are not.
    assert_eq!(cache.get_raw("posts:feed:u1:page:1:v1").await, None);
    assert!(cache.get_raw("posts:feed:u2:page:1:v1").await.is_some());

    cache.shutdown().await;
}

#[tokio::test]
async fn sync_disabled_still_invalidates_locally() {
    let (cache, _backend) = seeded_cache().await;
    // Simulated unreachable pub/sub: the channel is permanently
    // disabled, publishes are dropped.
    let invalidator = CacheInvalidator::new(cache.clone(), SyncChannel::disabled());

    invalidator.invalidate_recipe("R1", "U1").await;

    assert_eq!(cache.get_raw("recipes:detail:R1:public:v1").await, None);

    cache.shutdown().await;
}
