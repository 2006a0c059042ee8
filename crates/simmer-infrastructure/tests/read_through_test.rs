//! Read-through dispatch tests
//!
//! Exercises the policy table end to end: hits bypass the handler,
//! misses populate the cache, and undeclared routes are never cached.

use serde_json::{json, Value};
use simmer_domain::error::{Error, Result};
use simmer_infrastructure::cache::read_through::{default_policies, ReadThrough, RequestContext};
use simmer_infrastructure::cache::SafeCache;
use simmer_providers::cache::MemoryCacheBackend;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn layer() -> (SafeCache, ReadThrough) {
    let cache = SafeCache::new(Arc::new(MemoryCacheBackend::new()));
    let read_through = ReadThrough::new(cache.clone(), default_policies(), Default::default());
    (cache, read_through)
}

async fn dispatch(
    read_through: &ReadThrough,
    route: &str,
    ctx: &RequestContext,
    calls: &AtomicUsize,
    response: Value,
) -> Result<Value> {
    read_through
        .execute(route, ctx, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(response)
        })
        .await
}

#[tokio::test]
async fn miss_populates_and_hit_bypasses_handler() {
    let (cache, read_through) = layer();
    let ctx = RequestContext::new().with_param("id", "r1");
    let calls = AtomicUsize::new(0);
    let recipe = json!({"id": "r1", "title": "Beef Wellington"});

    let first = dispatch(&read_through, "recipes.detail", &ctx, &calls, recipe.clone())
        .await
        .unwrap();
    assert_eq!(first, recipe);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Stored under the derived key.
    assert!(cache.get_raw("recipes:detail:r1:public:v1").await.is_some());

    // Second request is served from cache; the handler never runs.
    let second = dispatch(&read_through, "recipes.detail", &ctx, &calls, json!(null))
        .await
        .unwrap();
    assert_eq!(second, recipe);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    cache.shutdown().await;
}

#[tokio::test]
async fn undeclared_route_is_never_cached() {
    let (cache, read_through) = layer();
    let ctx = RequestContext::new().with_param("id", "r1");
    let calls = AtomicUsize::new(0);

    for _ in 0..2 {
        dispatch(&read_through, "recipes.create", &ctx, &calls, json!({"id": "r1"}))
            .await
            .unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    cache.shutdown().await;
}

#[tokio::test]
async fn missing_parameter_bypasses_cache() {
    let (cache, read_through) = layer();
    let calls = AtomicUsize::new(0);

    // recipes.detail needs an `id`; without one the handler runs every
    // time and nothing is stored.
    for _ in 0..2 {
        dispatch(
            &read_through,
            "recipes.detail",
            &RequestContext::new(),
            &calls,
            json!({"id": "r1"}),
        )
        .await
        .unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    cache.shutdown().await;
}

#[tokio::test]
async fn empty_response_is_not_cached() {
    let (cache, read_through) = layer();
    let ctx = RequestContext::new().with_param("page", "1");
    let calls = AtomicUsize::new(0);

    let first = dispatch(&read_through, "recipes.list", &ctx, &calls, json!([]))
        .await
        .unwrap();
    assert_eq!(first, json!([]));
    assert!(cache.get_raw("recipes:list:page:1:v1").await.is_none());

    // Once data exists it is cached normally.
    let listing = json!([{"id": "r1"}]);
    dispatch(&read_through, "recipes.list", &ctx, &calls, listing.clone())
        .await
        .unwrap();
    let third = dispatch(&read_through, "recipes.list", &ctx, &calls, json!([]))
        .await
        .unwrap();
    assert_eq!(third, listing);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    cache.shutdown().await;
}

#[tokio::test]
async fn handler_errors_propagate_and_cache_nothing() {
    let (cache, read_through) = layer();
    let ctx = RequestContext::new().with_param("id", "r1");

    let result = read_through
        .execute("recipes.detail", &ctx, || async {
            Err(Error::invalid_argument("recipe not found"))
        })
        .await;
    assert!(result.is_err());
    assert!(cache.get_raw("recipes:detail:r1:public:v1").await.is_none());

    cache.shutdown().await;
}
