//! Opt-in read-through response caching
//!
//! Routes declare caching through a statically-defined policy table: a
//! map from route name to a key-derivation function and TTL category,
//! resolved at dispatch time. A route with no policy is never cached,
//! so mutating or variable-output endpoints cannot be cached by
//! accident.

use crate::cache::SafeCache;
use serde_json::Value;
use simmer_domain::error::Result;
use simmer_domain::value_objects::{CacheKeyBuilder, TtlCategory, TtlConfig};
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

/// Request data available to key-derivation functions
///
/// Framework-agnostic: whatever HTTP layer sits above this copies the
/// relevant path/query parameters in before dispatch.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    params: HashMap<String, String>,
}

impl RequestContext {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named parameter
    pub fn with_param<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Look up a named parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Key derivation from a request context
///
/// Returning `None` skips caching for that request (e.g. a required
/// parameter is missing).
pub type KeyFn = fn(&RequestContext) -> Option<String>;

/// Caching declaration for one route
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    /// Derives the cache key from the request
    pub key_fn: KeyFn,
    /// TTL category for stored responses
    pub category: TtlCategory,
}

/// Static map from route name to caching policy
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    routes: HashMap<&'static str, RoutePolicy>,
}

impl PolicyTable {
    /// Empty table: nothing is cached
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a policy for a route
    pub fn route(mut self, name: &'static str, key_fn: KeyFn, category: TtlCategory) -> Self {
        self.routes.insert(name, RoutePolicy { key_fn, category });
        self
    }

    /// Look up the policy for a route
    pub fn get(&self, name: &str) -> Option<&RoutePolicy> {
        self.routes.get(name)
    }
}

/// Policies for the read endpoints shipped with the recipe backend
pub fn default_policies() -> PolicyTable {
    PolicyTable::new()
        .route(
            "recipes.detail",
            |ctx| {
                Some(
                    CacheKeyBuilder::create()
                        .service("recipes")
                        .resource("detail")
                        .id(ctx.param("id")?)
                        .scope("public")
                        .version()
                        .build(),
                )
            },
            TtlCategory::Detail,
        )
        .route(
            "recipes.list",
            |ctx| {
                Some(
                    CacheKeyBuilder::create()
                        .service("recipes")
                        .resource("list")
                        .page(ctx.param("page")?.parse().ok()?)
                        .version()
                        .build(),
                )
            },
            TtlCategory::List,
        )
        .route(
            "recipes.trending",
            |_ctx| {
                Some(
                    CacheKeyBuilder::create()
                        .service("recipes")
                        .resource("trending")
                        .scope("public")
                        .version()
                        .build(),
                )
            },
            TtlCategory::Trending,
        )
        .route(
            "recipes.search",
            |ctx| {
                Some(
                    CacheKeyBuilder::create()
                        .service("search")
                        .resource("recipes")
                        .query(ctx.param("q")?)
                        .version()
                        .build(),
                )
            },
            TtlCategory::Search,
        )
        .route(
            "users.profile",
            |ctx| {
                Some(
                    CacheKeyBuilder::create()
                        .service("users")
                        .resource("profile")
                        .id(ctx.param("id")?)
                        .scope("stats")
                        .version()
                        .build(),
                )
            },
            TtlCategory::Stats,
        )
        .route(
            "posts.feed",
            |ctx| {
                Some(
                    CacheKeyBuilder::create()
                        .service("posts")
                        .resource("feed")
                        .id(ctx.param("user_id")?)
                        .page(ctx.param("page")?.parse().ok()?)
                        .version()
                        .build(),
                )
            },
            TtlCategory::List,
        )
}

/// Read-through wrapper around request handlers
#[derive(Debug, Clone)]
pub struct ReadThrough {
    cache: SafeCache,
    policies: PolicyTable,
    ttl: TtlConfig,
}

impl ReadThrough {
    /// Create over a cache handle, policy table, and TTL configuration
    pub fn new(cache: SafeCache, policies: PolicyTable, ttl: TtlConfig) -> Self {
        Self {
            cache,
            policies,
            ttl,
        }
    }

    /// Serve a request through the cache
    ///
    /// Cache hit returns the stored response without invoking the
    /// handler. On a miss the handler runs; a non-empty response is
    /// stored with the route's TTL before being returned. Cache
    /// problems never affect the response: a failed set still returns
    /// the handler's result, and handler errors propagate untouched.
    pub async fn execute<F, Fut>(
        &self,
        route: &str,
        ctx: &RequestContext,
        handler: F,
    ) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let Some(policy) = self.policies.get(route) else {
            return handler().await;
        };
        let Some(key) = (policy.key_fn)(ctx) else {
            return handler().await;
        };

        if let Some(cached) = self.cache.get::<Value>(&key).await {
            debug!(route, key, "cache hit");
            return Ok(cached);
        }

        let response = handler().await?;

        if is_cacheable(&response) {
            let ttl = self.ttl.resolve(policy.category);
            self.cache.set(&key, &response, ttl).await;
        }

        Ok(response)
    }
}

/// Empty responses are not worth caching and would shadow later data
fn is_cacheable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_responses_are_not_cacheable() {
        assert!(!is_cacheable(&Value::Null));
        assert!(!is_cacheable(&serde_json::json!([])));
        assert!(!is_cacheable(&serde_json::json!({})));
        assert!(is_cacheable(&serde_json::json!({"id": "r1"})));
        assert!(is_cacheable(&serde_json::json!(0)));
    }

    #[test]
    fn default_policies_derive_expected_keys() {
        let policies = default_policies();

        let ctx = RequestContext::new().with_param("id", "abc123");
        let policy = policies.get("recipes.detail").unwrap();
        assert_eq!(
            (policy.key_fn)(&ctx).as_deref(),
            Some("recipes:detail:abc123:public:v1")
        );

        let ctx = RequestContext::new().with_param("q", "Beef & Wellington!");
        let policy = policies.get("recipes.search").unwrap();
        assert_eq!(
            (policy.key_fn)(&ctx).as_deref(),
            Some("search:recipes:query:beef___wellington_:v1")
        );
    }

    #[test]
    fn missing_parameter_skips_key_derivation() {
        let policies = default_policies();
        let policy = policies.get("recipes.detail").unwrap();
        assert_eq!((policy.key_fn)(&RequestContext::new()), None);
    }
}
