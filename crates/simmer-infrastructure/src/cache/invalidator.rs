//! Collaborator-facing invalidation interface
//!
//! Entity services call one method per mutated aggregate, **after** the
//! underlying write commits. Each call resolves the entity's
//! invalidation rules, applies the deletions locally, and broadcasts the
//! same descriptors so every other instance applies them too.
//!
//! Nothing here can fail a caller's request: local deletions go through
//! [`SafeCache`] and the broadcast is fire-and-forget.

use crate::cache::SafeCache;
use crate::sync::SyncChannel;
use simmer_domain::invalidation;
use simmer_domain::value_objects::InvalidationDescriptor;
use tracing::debug;

/// Invalidation facade handed to entity services
#[derive(Clone, Debug)]
pub struct CacheInvalidator {
    cache: SafeCache,
    sync: SyncChannel,
}

impl CacheInvalidator {
    /// Create an invalidator over a cache handle and sync channel
    pub fn new(cache: SafeCache, sync: SyncChannel) -> Self {
        Self { cache, sync }
    }

    /// Invalidate after a recipe create/update/delete
    pub async fn invalidate_recipe(&self, recipe_id: &str, owner_id: &str) {
        self.apply("recipe", invalidation::recipe(recipe_id, owner_id))
            .await;
    }

    /// Invalidate after a user profile mutation
    pub async fn invalidate_user_profile(&self, user_id: &str) {
        self.apply("user_profile", invalidation::user_profile(user_id))
            .await;
    }

    /// Invalidate after a post create/update/delete
    pub async fn invalidate_post(&self, post_id: &str, author_id: &str) {
        self.apply("post", invalidation::post(post_id, author_id))
            .await;
    }

    /// Invalidate after a follow/unfollow
    pub async fn invalidate_follow(&self, user_id: &str, target_user_id: &str) {
        self.apply("follow", invalidation::follow(user_id, target_user_id))
            .await;
    }

    /// Invalidate after a like/unlike
    pub async fn invalidate_like(&self, post_id: &str, recipe_id: Option<&str>) {
        self.apply("like", invalidation::like(post_id, recipe_id))
            .await;
    }

    /// Nuclear option: clear every cached value on this backend
    ///
    /// Development and emergencies only.
    pub async fn clear_all(&self) {
        self.cache.clear_all().await;
    }

    /// Apply descriptors locally, then broadcast them
    ///
    /// Local-first so the originating instance is consistent even when
    /// the broadcast fails.
    async fn apply(&self, entity: &str, descriptors: Vec<InvalidationDescriptor>) {
        for descriptor in &descriptors {
            match descriptor {
                InvalidationDescriptor::Key(key) => self.cache.delete(key).await,
                InvalidationDescriptor::Pattern(pattern) => {
                    self.cache.delete_pattern(pattern).await;
                }
            }
        }

        for descriptor in &descriptors {
            self.sync.publish(descriptor).await;
        }

        debug!(entity, count = descriptors.len(), "invalidated cache entries");
    }
}
