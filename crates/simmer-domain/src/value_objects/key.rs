//! Cache key construction
//!
//! Cache keys are ordered, colon-separated segments:
//! `service:resource:id:scope:version`, e.g. `recipes:detail:abc123:public:v1`.
//!
//! The builder is the single place keys are assembled so that identical
//! logical lookups always produce the identical key string. Free-text
//! segments (search queries) are normalized before appending so that keys
//! stay bounded and safe for any backend key syntax.

use crate::constants::CACHE_KEY_VERSION;

/// Fluent builder for namespaced cache keys
///
/// Each segment method is ordering-significant: the same sequence of
/// calls always yields the same key.
///
/// # Example
///
/// ```
/// use simmer_domain::value_objects::CacheKeyBuilder;
///
/// let key = CacheKeyBuilder::create()
///     .service("recipes")
///     .resource("detail")
///     .id("abc123")
///     .scope("public")
///     .version()
///     .build();
/// assert_eq!(key, "recipes:detail:abc123:public:v1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CacheKeyBuilder {
    parts: Vec<String>,
}

impl CacheKeyBuilder {
    /// Start a new key
    pub fn create() -> Self {
        Self::default()
    }

    /// Append the owning service segment (e.g. `recipes`, `users`)
    pub fn service<S: Into<String>>(mut self, name: S) -> Self {
        self.parts.push(name.into());
        self
    }

    /// Append the resource type segment (e.g. `detail`, `list`)
    pub fn resource<S: Into<String>>(mut self, kind: S) -> Self {
        self.parts.push(kind.into());
        self
    }

    /// Append an entity identifier segment, verbatim
    pub fn id<S: Into<String>>(mut self, identifier: S) -> Self {
        self.parts.push(identifier.into());
        self
    }

    /// Append a scope segment (e.g. `public`, a viewer id)
    pub fn scope<S: Into<String>>(mut self, scope: S) -> Self {
        self.parts.push(scope.into());
        self
    }

    /// Append a pagination marker and page number
    pub fn page(mut self, page: u32) -> Self {
        self.parts.push("page".to_string());
        self.parts.push(page.to_string());
        self
    }

    /// Append a free-text segment, normalized
    ///
    /// User-supplied text (search strings) is case-folded and every
    /// character outside `[a-z0-9]` replaced with `_` so derived keys are
    /// deterministic and backend-safe.
    pub fn query(mut self, text: &str) -> Self {
        self.parts.push("query".to_string());
        self.parts.push(normalize_segment(text));
        self
    }

    /// Append the current key format version segment
    ///
    /// A global cache-format change is forced by bumping
    /// [`CACHE_KEY_VERSION`], without per-key invalidation.
    pub fn version(mut self) -> Self {
        self.parts.push(CACHE_KEY_VERSION.to_string());
        self
    }

    /// Join the accumulated segments into the final key string
    pub fn build(self) -> String {
        self.parts.join(":")
    }
}

/// Normalize a free-text segment for use inside a cache key
///
/// Lower-cases the input and replaces every character outside `[a-z0-9]`
/// with `_`. Normalizing the same input twice always yields the same
/// output.
pub fn normalize_segment(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Match a key against a glob-style pattern
///
/// Only `*` is supported, matching any run of characters (including
/// empty), which is all the invalidation rules ever emit. Used by the
/// in-memory backend's scan; Redis applies `MATCH` server-side.
pub fn key_matches_pattern(pattern: &str, key: &str) -> bool {
    let mut pieces = pattern.split('*');

    // First piece must anchor at the start.
    let first = pieces.next().unwrap_or("");
    if !key.starts_with(first) {
        return false;
    }
    let mut rest = &key[first.len()..];

    let mut last: Option<&str> = None;
    for piece in pieces {
        if let Some(prev) = last {
            match rest.find(prev) {
                Some(idx) => rest = &rest[idx + prev.len()..],
                None => return false,
            }
        }
        last = Some(piece);
    }

    match last {
        // Last piece must anchor at the end.
        Some(piece) => rest.ends_with(piece),
        // No '*' in the pattern at all: exact match required.
        None => rest.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_canonical_recipe_detail_key() {
        let key = CacheKeyBuilder::create()
            .service("recipes")
            .resource("detail")
            .id("abc123")
            .scope("public")
            .version()
            .build();
        assert_eq!(key, "recipes:detail:abc123:public:v1");
    }

    #[test]
    fn same_calls_same_key() {
        let build = || {
            CacheKeyBuilder::create()
                .service("search")
                .resource("recipes")
                .query("Beef & Wellington!")
                .page(2)
                .version()
                .build()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn normalizes_free_text_deterministically() {
        assert_eq!(normalize_segment("Beef & Wellington!"), "beef___wellington_");
        assert_eq!(
            normalize_segment("Beef & Wellington!"),
            normalize_segment("Beef & Wellington!")
        );
    }

    #[test]
    fn page_appends_marker_and_number() {
        let key = CacheKeyBuilder::create()
            .service("recipes")
            .resource("list")
            .page(3)
            .version()
            .build();
        assert_eq!(key, "recipes:list:page:3:v1");
    }

    #[test]
    fn glob_matching() {
        assert!(key_matches_pattern("recipes:list:*", "recipes:list:page:1:v1"));
        assert!(key_matches_pattern("posts:feed:u1:*", "posts:feed:u1:page:2:v1"));
        assert!(key_matches_pattern("*", "anything"));
        assert!(key_matches_pattern("a:*:c", "a:b:c"));
        assert!(!key_matches_pattern("recipes:list:*", "recipes:detail:r1"));
        assert!(!key_matches_pattern("a:b", "a:b:c"));
        assert!(key_matches_pattern("a:b", "a:b"));
    }
}
