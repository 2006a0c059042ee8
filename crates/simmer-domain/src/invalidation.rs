//! Per-entity invalidation rules
//!
//! One pure function per aggregate type. Given the mutated entity's
//! identifiers, each rule returns the complete set of descriptors whose
//! cached values are now stale: the entity's own detail key, literal
//! keys scoped to clearly known owners, and wildcard patterns for caches
//! whose exact key set cannot be enumerated cheaply (listings, trending
//! feeds, search results, per-follower feeds).
//!
//! Rules hold no state. Application order is irrelevant: deletions are
//! idempotent and order-independent, so concurrent invalidations for the
//! same entity race harmlessly.

use crate::value_objects::{CacheKeyBuilder, InvalidationDescriptor};

/// Descriptors stale after a recipe create/update/delete
pub fn recipe(recipe_id: &str, owner_id: &str) -> Vec<InvalidationDescriptor> {
    vec![
        InvalidationDescriptor::key(
            CacheKeyBuilder::create()
                .service("recipes")
                .resource("detail")
                .id(recipe_id)
                .scope("public")
                .version()
                .build(),
        ),
        InvalidationDescriptor::key(
            CacheKeyBuilder::create()
                .service("users")
                .resource("recipes")
                .id(owner_id)
                .scope("list")
                .version()
                .build(),
        ),
        // Aggregate caches cannot be enumerated cheaply; scanned at
        // invalidation time.
        InvalidationDescriptor::pattern("recipes:list:*"),
        InvalidationDescriptor::pattern("recipes:trending:*"),
        InvalidationDescriptor::pattern("search:recipes:*"),
    ]
}

/// Descriptors stale after a user profile mutation
pub fn user_profile(user_id: &str) -> Vec<InvalidationDescriptor> {
    let profile_key = |scope: &str| {
        CacheKeyBuilder::create()
            .service("users")
            .resource("profile")
            .id(user_id)
            .scope(scope)
            .version()
            .build()
    };

    vec![
        InvalidationDescriptor::key(profile_key("stats")),
        InvalidationDescriptor::key(profile_key("followers")),
        InvalidationDescriptor::key(profile_key("following")),
        // Profile changes affect how the user's recipes render.
        InvalidationDescriptor::key(
            CacheKeyBuilder::create()
                .service("users")
                .resource("recipes")
                .id(user_id)
                .scope("list")
                .version()
                .build(),
        ),
    ]
}

/// Descriptors stale after a post create/update/delete
pub fn post(post_id: &str, author_id: &str) -> Vec<InvalidationDescriptor> {
    vec![
        InvalidationDescriptor::key(
            CacheKeyBuilder::create()
                .service("posts")
                .resource("detail")
                .id(post_id)
                .scope("public")
                .version()
                .build(),
        ),
        InvalidationDescriptor::key(
            CacheKeyBuilder::create()
                .service("posts")
                .resource("list")
                .id(author_id)
                .version()
                .build(),
        ),
        InvalidationDescriptor::pattern("posts:feed:*"),
        InvalidationDescriptor::pattern("posts:newsfeed:*"),
    ]
}

/// Descriptors stale after a follow/unfollow
///
/// Both parties' stats go stale, plus the actor's `following` list, the
/// target's `followers` list, and every feed page scoped to the actor
/// (following decides what appears in their feed).
pub fn follow(user_id: &str, target_user_id: &str) -> Vec<InvalidationDescriptor> {
    let profile_key = |id: &str, scope: &str| {
        CacheKeyBuilder::create()
            .service("users")
            .resource("profile")
            .id(id)
            .scope(scope)
            .version()
            .build()
    };

    vec![
        InvalidationDescriptor::key(profile_key(user_id, "stats")),
        InvalidationDescriptor::key(profile_key(target_user_id, "stats")),
        InvalidationDescriptor::key(profile_key(user_id, "following")),
        InvalidationDescriptor::key(profile_key(target_user_id, "followers")),
        InvalidationDescriptor::pattern(format!("posts:feed:{user_id}:*")),
    ]
}

/// Descriptors stale after a like/unlike
///
/// The post's detail key (like count changed), plus the recipe's detail
/// key when the post references one.
pub fn like(post_id: &str, recipe_id: Option<&str>) -> Vec<InvalidationDescriptor> {
    let mut descriptors = vec![InvalidationDescriptor::key(
        CacheKeyBuilder::create()
            .service("posts")
            .resource("detail")
            .id(post_id)
            .scope("public")
            .version()
            .build(),
    )];

    if let Some(recipe_id) = recipe_id {
        descriptors.push(InvalidationDescriptor::key(
            CacheKeyBuilder::create()
                .service("recipes")
                .resource("detail")
                .id(recipe_id)
                .scope("public")
                .version()
                .build(),
        ));
    }

    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_rule_includes_literal_keys_and_patterns() {
        let descriptors = recipe("R1", "U1");

        assert!(descriptors
            .contains(&InvalidationDescriptor::key("recipes:detail:R1:public:v1")));
        assert!(descriptors.contains(&InvalidationDescriptor::key("users:recipes:U1:list:v1")));
        assert!(descriptors.contains(&InvalidationDescriptor::pattern("recipes:list:*")));
        assert!(descriptors.contains(&InvalidationDescriptor::pattern("recipes:trending:*")));
        assert!(descriptors.contains(&InvalidationDescriptor::pattern("search:recipes:*")));
    }

    #[test]
    fn follow_rule_touches_both_parties() {
        let descriptors = follow("u1", "u2");

        assert!(descriptors.contains(&InvalidationDescriptor::key("users:profile:u1:stats:v1")));
        assert!(descriptors.contains(&InvalidationDescriptor::key("users:profile:u2:stats:v1")));
        assert!(
            descriptors.contains(&InvalidationDescriptor::key("users:profile:u1:following:v1"))
        );
        assert!(
            descriptors.contains(&InvalidationDescriptor::key("users:profile:u2:followers:v1"))
        );
        assert!(descriptors.contains(&InvalidationDescriptor::pattern("posts:feed:u1:*")));
    }

    #[test]
    fn like_rule_includes_recipe_only_when_present() {
        assert_eq!(like("p1", None).len(), 1);

        let with_recipe = like("p1", Some("r1"));
        assert_eq!(with_recipe.len(), 2);
        assert!(
            with_recipe.contains(&InvalidationDescriptor::key("recipes:detail:r1:public:v1"))
        );
    }
}
