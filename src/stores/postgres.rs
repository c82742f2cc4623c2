use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Context, Product, UserInteraction, UserProfile, UserSegment};
use crate::stores::{InteractionStore, ProductStore, UserProfileStore};

/// Window over which interaction signals count toward popularity
const POPULARITY_WINDOW_DAYS: i64 = 7;

/// Postgres-backed product catalog
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProductStore for PgProductStore {
    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, discount_price, category_id, tags, created_at, updated_at
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn get_products_by_category(&self, category_id: Uuid) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, discount_price, category_id, tags, created_at, updated_at
             FROM products WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn get_popular_products(
        &self,
        _context: &Context,
        limit: i64,
    ) -> AppResult<Vec<Product>> {
        // Popularity = weighted interaction volume over the trailing window.
        // Context-conditioned popularity (per region, per segment) is a
        // follow-up once interactions carry those dimensions.
        let since = Utc::now() - Duration::days(POPULARITY_WINDOW_DAYS);

        let products = sqlx::query_as::<_, Product>(
            "SELECT p.id, p.name, p.price, p.discount_price, p.category_id, p.tags,
                    p.created_at, p.updated_at
             FROM products p
             JOIN (
                 SELECT product_id, SUM(weight) AS signal
                 FROM user_interactions
                 WHERE timestamp >= $1
                 GROUP BY product_id
             ) i ON i.product_id = p.id
             ORDER BY i.signal DESC
             LIMIT $2",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn save_product(&self, product: &Product) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO products (id, name, price, discount_price, category_id, tags,
                                   created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO UPDATE SET
                 name = EXCLUDED.name,
                 price = EXCLUDED.price,
                 discount_price = EXCLUDED.discount_price,
                 category_id = EXCLUDED.category_id,
                 tags = EXCLUDED.tags,
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.discount_price)
        .bind(product.category_id)
        .bind(&product.tags)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_all_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, discount_price, category_id, tags, created_at, updated_at
             FROM products",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

/// Postgres-backed interaction log
#[derive(Clone)]
pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InteractionStore for PgInteractionStore {
    async fn save_interaction(&self, interaction: &UserInteraction) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_interactions (user_id, product_id, action_type, weight, timestamp)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(interaction.user_id)
        .bind(interaction.product_id)
        .bind(interaction.action_type)
        .bind(interaction.weight)
        .bind(interaction.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_user_interactions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> AppResult<Vec<UserInteraction>> {
        let interactions = sqlx::query_as::<_, UserInteraction>(
            "SELECT id, user_id, product_id, action_type, weight, timestamp
             FROM user_interactions
             WHERE user_id = $1
             ORDER BY timestamp DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(interactions)
    }

    async fn get_product_associations(
        &self,
        product_id: Uuid,
        limit: i64,
    ) -> AppResult<HashMap<i64, i64>> {
        let rows = sqlx::query_as::<_, (i64, i64)>(
            "SELECT user_id, COUNT(*) AS co_occurrences
             FROM user_interactions
             WHERE product_id = $1
             GROUP BY user_id
             ORDER BY co_occurrences DESC
             LIMIT $2",
        )
        .bind(product_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}

/// Postgres-backed profile store (segmentation extension point)
#[derive(Clone)]
pub struct PgUserProfileStore {
    pool: PgPool,
}

impl PgUserProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw profile row; segment is stored as text and parsed on the way out
#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: i64,
    total_purchases: i64,
    total_spent: f64,
    favorite_categories: Vec<String>,
    segment: String,
    last_interaction_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> UserProfile {
        let segment = match self.segment.as_str() {
            "high_value" => UserSegment::HighValue,
            "browser" => UserSegment::Browser,
            "wishlist_collector" => UserSegment::WishlistCollector,
            "vip" => UserSegment::Vip,
            _ => UserSegment::NewUser,
        };

        UserProfile {
            user_id: self.user_id,
            total_purchases: self.total_purchases,
            total_spent: self.total_spent,
            favorite_categories: self.favorite_categories,
            segment,
            last_interaction_at: self.last_interaction_at,
        }
    }
}

fn segment_label(segment: UserSegment) -> &'static str {
    match segment {
        UserSegment::HighValue => "high_value",
        UserSegment::Browser => "browser",
        UserSegment::WishlistCollector => "wishlist_collector",
        UserSegment::NewUser => "new_user",
        UserSegment::Vip => "vip",
    }
}

#[async_trait::async_trait]
impl UserProfileStore for PgUserProfileStore {
    async fn get_profile(&self, user_id: i64) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, total_purchases, total_spent, favorite_categories, segment,
                    last_interaction_at
             FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn save_profile(&self, profile: &UserProfile) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_profiles (user_id, total_purchases, total_spent,
                                        favorite_categories, segment, last_interaction_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id) DO UPDATE SET
                 total_purchases = EXCLUDED.total_purchases,
                 total_spent = EXCLUDED.total_spent,
                 favorite_categories = EXCLUDED.favorite_categories,
                 segment = EXCLUDED.segment,
                 last_interaction_at = EXCLUDED.last_interaction_at",
        )
        .bind(profile.user_id)
        .bind(profile.total_purchases)
        .bind(profile.total_spent)
        .bind(&profile.favorite_categories)
        .bind(segment_label(profile.segment))
        .bind(profile.last_interaction_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_segment(&self, user_id: i64, segment: UserSegment) -> AppResult<()> {
        sqlx::query("UPDATE user_profiles SET segment = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(segment_label(segment))
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
