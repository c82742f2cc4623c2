use std::fmt::Display;

use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};
use crate::models::Recommendation;
use crate::stores::RecommendationCache;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Recommendations(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Recommendations(user_id) => write!(f, "recs:{}", user_id),
        }
    }
}

/// Redis-backed recommendation cache
///
/// Stores each user's ranked list as a JSON value under `recs:{user_id}`
/// with expiry enforced by Redis (`SET ... EX ttl`). Writes are awaited,
/// not fire-and-forget: the orchestrator treats a failed write as fatal.
#[derive(Clone)]
pub struct RedisRecommendationCache {
    client: Client,
}

impl RedisRecommendationCache {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RecommendationCache for RedisRecommendationCache {
    async fn get(&self, user_id: i64) -> AppResult<Option<Vec<Recommendation>>> {
        let key = CacheKey::Recommendations(user_id);
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let recommendations = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(recommendations))
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        user_id: i64,
        recommendations: &[Recommendation],
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let key = CacheKey::Recommendations(user_id);
        let json = serde_json::to_string(recommendations)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key.to_string(), json, ttl_seconds).await?;

        tracing::debug!(user_id, ttl = ttl_seconds, "Cached recommendations");

        Ok(())
    }

    async fn invalidate(&self, user_id: i64) -> AppResult<()> {
        let key = CacheKey::Recommendations(user_id);
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key.to_string()).await?;

        tracing::debug!(user_id, "Invalidated cached recommendations");

        Ok(())
    }
}
