use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ActionType, DeviceType, Recommendation, UserInteraction};
use crate::services::cache_policy::cache_ttl;
use crate::services::context::build_context;
use crate::services::generators::{
    BaselineScoring, CandidateGenerators, CategoryMappings, ScoringPolicy,
};
use crate::services::ranking::dedupe_and_rank;
use crate::stores::{InteractionStore, ProductStore, RecommendationCache};

/// Public entry point of the recommendation core
///
/// Coordinates cache lookup, context derivation, candidate generation,
/// ranking, cache population, and event recording. All collaborators are
/// capability traits, so the orchestrator runs identically over Postgres and
/// Redis or over in-memory fakes.
pub struct RecommendationService {
    generators: CandidateGenerators,
    interactions: Arc<dyn InteractionStore>,
    cache: Arc<dyn RecommendationCache>,
    region: String,
}

impl RecommendationService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        interactions: Arc<dyn InteractionStore>,
        cache: Arc<dyn RecommendationCache>,
        mappings: CategoryMappings,
        region: String,
    ) -> Self {
        Self::with_scoring(
            products,
            interactions,
            cache,
            mappings,
            region,
            Arc::new(BaselineScoring),
        )
    }

    /// Constructor taking an explicit scoring policy
    pub fn with_scoring(
        products: Arc<dyn ProductStore>,
        interactions: Arc<dyn InteractionStore>,
        cache: Arc<dyn RecommendationCache>,
        mappings: CategoryMappings,
        region: String,
        scoring: Arc<dyn ScoringPolicy>,
    ) -> Self {
        Self {
            generators: CandidateGenerators::new(products, mappings, scoring),
            interactions,
            cache,
            region,
        }
    }

    /// Returns the ranked recommendation set for a user
    ///
    /// A cache hit requires a clean read returning a non-empty list; a
    /// failed read logs and falls through to full regeneration. A failed
    /// cache write after regeneration is fatal: the fresh list is surfaced
    /// only as an error, never returned alongside one.
    pub async fn get_recommendations(
        &self,
        user_id: i64,
        device: DeviceType,
    ) -> AppResult<Vec<Recommendation>> {
        if user_id <= 0 {
            return Err(AppError::InvalidInput(format!(
                "user_id must be positive, got {}",
                user_id
            )));
        }

        match self.cache.get(user_id).await {
            Ok(Some(cached)) if !cached.is_empty() => {
                tracing::debug!(user_id, count = cached.len(), "Recommendation cache hit");
                return Ok(cached);
            }
            Ok(_) => {
                tracing::debug!(user_id, "Recommendation cache miss");
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Cache read failed, regenerating");
            }
        }

        let context = build_context(Utc::now(), device, &self.region);

        // The generators have no data dependency on one another; fan out and
        // merge in fixed order so first-seen-wins stays reproducible.
        let (seasonal, time_based, popularity) = tokio::join!(
            self.generators.seasonal(&context),
            self.generators.time_based(&context),
            self.generators.popularity(&context),
        );

        let mut candidates = seasonal;
        candidates.extend(time_based);
        candidates.extend(popularity);

        let ranked = dedupe_and_rank(candidates);

        let ttl = cache_ttl(&context);
        self.cache.set(user_id, &ranked, ttl).await?;

        tracing::info!(
            user_id,
            count = ranked.len(),
            ttl,
            season = ?context.season,
            time_of_day = %context.time_of_day,
            "Generated recommendations"
        );

        Ok(ranked)
    }

    /// Records an interaction and invalidates the user's cached set
    ///
    /// The interaction is stamped with its action weight and the current
    /// timestamp before persisting. Persistence failure skips invalidation
    /// and is surfaced; invalidation failure is surfaced even though the
    /// interaction is already durable, so the caller knows the cache may be
    /// stale.
    pub async fn record_event(
        &self,
        user_id: i64,
        product_id: Uuid,
        action_type: ActionType,
    ) -> AppResult<()> {
        if user_id <= 0 {
            return Err(AppError::InvalidInput(format!(
                "user_id must be positive, got {}",
                user_id
            )));
        }

        let interaction = UserInteraction {
            id: 0, // assigned by the store
            user_id,
            product_id,
            action_type,
            weight: action_type.weight(),
            timestamp: Utc::now(),
        };

        self.interactions.save_interaction(&interaction).await?;
        self.cache.invalidate(user_id).await?;

        tracing::info!(user_id, %product_id, action = ?action_type, "Recorded interaction");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{MockInteractionStore, MockProductStore, MockRecommendationCache};
    use mockall::predicate::eq;

    fn service(
        products: MockProductStore,
        interactions: MockInteractionStore,
        cache: MockRecommendationCache,
    ) -> RecommendationService {
        RecommendationService::new(
            Arc::new(products),
            Arc::new(interactions),
            Arc::new(cache),
            CategoryMappings::default(),
            "US".to_string(),
        )
    }

    fn sample_product(id: Uuid) -> crate::models::Product {
        let now = Utc::now();
        crate::models::Product {
            id,
            name: "widget".to_string(),
            price: 1999,
            discount_price: 1499,
            category_id: Uuid::new_v4(),
            tags: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_rejects_non_positive_user_id() {
        let svc = service(
            MockProductStore::new(),
            MockInteractionStore::new(),
            MockRecommendationCache::new(),
        );

        let err = svc
            .get_recommendations(0, DeviceType::Mobile)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = svc
            .record_event(-3, Uuid::new_v4(), ActionType::View)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_non_empty_cached_set_is_served_without_regeneration() {
        let cached = vec![Recommendation::new(Uuid::new_v4(), 85.0, "trending")];
        let expected = cached.clone();

        let mut cache = MockRecommendationCache::new();
        cache
            .expect_get()
            .with(eq(7))
            .returning(move |_| Ok(Some(cached.clone())));
        cache.expect_set().never();

        let mut products = MockProductStore::new();
        products.expect_get_popular_products().never();

        let svc = service(products, MockInteractionStore::new(), cache);
        let result = svc.get_recommendations(7, DeviceType::Mobile).await.unwrap();
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_empty_cached_set_is_not_a_hit() {
        let product_id = Uuid::new_v4();

        let mut cache = MockRecommendationCache::new();
        cache.expect_get().returning(|_| Ok(Some(Vec::new())));
        cache.expect_set().times(1).returning(|_, _, _| Ok(()));

        let mut products = MockProductStore::new();
        products
            .expect_get_popular_products()
            .returning(move |_, _| Ok(vec![sample_product(product_id)]));

        let svc = service(products, MockInteractionStore::new(), cache);
        let result = svc.get_recommendations(7, DeviceType::Mobile).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].product_id, product_id);
        assert_eq!(result[0].reason, "trending");
    }

    #[tokio::test]
    async fn test_cache_read_failure_falls_through_to_regeneration() {
        let product_id = Uuid::new_v4();

        let mut cache = MockRecommendationCache::new();
        cache
            .expect_get()
            .returning(|_| Err(AppError::Internal("redis down".to_string())));
        cache.expect_set().times(1).returning(|_, _, _| Ok(()));

        let mut products = MockProductStore::new();
        products
            .expect_get_popular_products()
            .returning(move |_, _| Ok(vec![sample_product(product_id)]));

        let svc = service(products, MockInteractionStore::new(), cache);
        let result = svc.get_recommendations(7, DeviceType::Mobile).await.unwrap();
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_write_failure_is_fatal() {
        let mut cache = MockRecommendationCache::new();
        cache.expect_get().returning(|_| Ok(None));
        cache
            .expect_set()
            .returning(|_, _, _| Err(AppError::Internal("redis down".to_string())));

        let mut products = MockProductStore::new();
        products
            .expect_get_popular_products()
            .returning(|_, _| Ok(vec![sample_product(Uuid::new_v4())]));

        let svc = service(products, MockInteractionStore::new(), cache);
        let err = svc
            .get_recommendations(7, DeviceType::Mobile)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_generator_failure_degrades_instead_of_failing() {
        let mut cache = MockRecommendationCache::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().times(1).returning(|_, _, _| Ok(()));

        let mut products = MockProductStore::new();
        products
            .expect_get_popular_products()
            .returning(|_, _| Err(AppError::Internal("store down".to_string())));

        let svc = service(products, MockInteractionStore::new(), cache);
        let result = svc.get_recommendations(7, DeviceType::Mobile).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_record_event_stamps_weight_and_invalidates() {
        let product_id = Uuid::new_v4();

        let mut interactions = MockInteractionStore::new();
        interactions
            .expect_save_interaction()
            .withf(move |i| {
                i.user_id == 7
                    && i.product_id == product_id
                    && i.action_type == ActionType::Purchase
                    && i.weight == 50
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut cache = MockRecommendationCache::new();
        cache
            .expect_invalidate()
            .with(eq(7))
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(MockProductStore::new(), interactions, cache);
        svc.record_event(7, product_id, ActionType::Purchase)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_record_event_skips_invalidation_when_persistence_fails() {
        let mut interactions = MockInteractionStore::new();
        interactions
            .expect_save_interaction()
            .returning(|_| Err(AppError::Internal("db down".to_string())));

        let mut cache = MockRecommendationCache::new();
        cache.expect_invalidate().never();

        let svc = service(MockProductStore::new(), interactions, cache);
        let err = svc
            .record_event(7, Uuid::new_v4(), ActionType::View)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_record_event_surfaces_invalidation_failure() {
        let mut interactions = MockInteractionStore::new();
        interactions
            .expect_save_interaction()
            .times(1)
            .returning(|_| Ok(()));

        let mut cache = MockRecommendationCache::new();
        cache
            .expect_invalidate()
            .returning(|_| Err(AppError::Internal("redis down".to_string())));

        let svc = service(MockProductStore::new(), interactions, cache);
        let err = svc
            .record_event(7, Uuid::new_v4(), ActionType::View)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
