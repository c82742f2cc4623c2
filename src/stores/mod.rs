//! Capability contracts for the external collaborators of the
//! recommendation core.
//!
//! Each store is an abstract interface with swappable implementations
//! (Postgres/Redis in production, in-memory fakes or mockall mocks in
//! tests), so the core never depends on live infrastructure.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Context, Product, Recommendation, UserInteraction, UserProfile, UserSegment};

pub mod postgres;
pub mod redis_cache;

pub use postgres::{PgInteractionStore, PgProductStore, PgUserProfileStore};
pub use redis_cache::{CacheKey, RedisRecommendationCache};

/// Read/write contract over the product catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// All products in a category; an unknown category yields an empty set,
    /// never an error.
    async fn get_products_by_category(&self, category_id: Uuid) -> AppResult<Vec<Product>>;

    /// Top `limit` currently trending products for the given context,
    /// ordered by descending popularity.
    async fn get_popular_products(&self, context: &Context, limit: i64)
        -> AppResult<Vec<Product>>;

    async fn save_product(&self, product: &Product) -> AppResult<()>;

    async fn get_all_products(&self) -> AppResult<Vec<Product>>;
}

/// Append-only log of user activity
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    async fn save_interaction(&self, interaction: &UserInteraction) -> AppResult<()>;

    async fn get_user_interactions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> AppResult<Vec<UserInteraction>>;

    /// Users who interacted with the given product, keyed by user id with
    /// co-occurrence counts.
    async fn get_product_associations(
        &self,
        product_id: Uuid,
        limit: i64,
    ) -> AppResult<HashMap<i64, i64>>;
}

/// TTL-bounded per-user recommendation cache
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationCache: Send + Sync {
    /// Returns the cached set, or `None` when absent or expired
    async fn get(&self, user_id: i64) -> AppResult<Option<Vec<Recommendation>>>;

    async fn set(
        &self,
        user_id: i64,
        recommendations: &[Recommendation],
        ttl_seconds: u64,
    ) -> AppResult<()>;

    async fn invalidate(&self, user_id: i64) -> AppResult<()>;
}

/// User profile store, a reserved extension point for segmentation
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: i64) -> AppResult<Option<UserProfile>>;

    async fn save_profile(&self, profile: &UserProfile) -> AppResult<()>;

    async fn update_segment(&self, user_id: i64, segment: UserSegment) -> AppResult<()>;
}
