use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::models::{Context, Product, Recommendation, Season, TimeOfDay};
use crate::stores::ProductStore;

/// How many trending products the popularity generator asks for
const POPULAR_LIMIT: i64 = 5;

/// Operator-maintained mapping from context buckets to catalog categories
///
/// Injected rather than compiled in, so merchandising can repoint seasonal
/// and time-of-day campaigns without a rebuild. A season or bucket with no
/// entry simply contributes no candidates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryMappings {
    #[serde(default)]
    pub seasonal: HashMap<Season, Uuid>,
    #[serde(default)]
    pub time_of_day: HashMap<TimeOfDay, Vec<Uuid>>,
}

impl CategoryMappings {
    /// Loads mappings from a JSON file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mappings = serde_json::from_str(&raw)?;
        Ok(mappings)
    }
}

/// Scoring strategy for candidate generation
///
/// The current implementation assigns static baselines per source; swapping
/// this for real signals (recency-weighted interaction counts, co-occurrence
/// strength) must keep scores comparable across generators.
pub trait ScoringPolicy: Send + Sync {
    fn seasonal_score(&self, product: &Product) -> f64;
    fn time_based_score(&self, product: &Product) -> f64;
    fn trending_score(&self, product: &Product) -> f64;
}

/// Static per-source baselines
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineScoring;

impl ScoringPolicy for BaselineScoring {
    fn seasonal_score(&self, _product: &Product) -> f64 {
        75.0
    }

    fn time_based_score(&self, _product: &Product) -> f64 {
        70.0
    }

    fn trending_score(&self, _product: &Product) -> f64 {
        85.0
    }
}

/// The three independent candidate sources
///
/// Every generator is a read-then-transform step over the product store.
/// A failing store call degrades that source to an empty candidate set; a
/// broken source must never prevent serving the candidates that succeeded.
pub struct CandidateGenerators {
    products: Arc<dyn ProductStore>,
    mappings: CategoryMappings,
    scoring: Arc<dyn ScoringPolicy>,
}

impl CandidateGenerators {
    pub fn new(
        products: Arc<dyn ProductStore>,
        mappings: CategoryMappings,
        scoring: Arc<dyn ScoringPolicy>,
    ) -> Self {
        Self {
            products,
            mappings,
            scoring,
        }
    }

    /// Candidates from the category mapped to the current season
    pub async fn seasonal(&self, context: &Context) -> Vec<Recommendation> {
        let Some(&category_id) = self.mappings.seasonal.get(&context.season) else {
            return Vec::new();
        };

        let products = match self.products.get_products_by_category(category_id).await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, season = ?context.season, "Seasonal candidate fetch failed, degrading to empty");
                return Vec::new();
            }
        };

        products
            .into_iter()
            .map(|p| Recommendation::new(p.id, self.scoring.seasonal_score(&p), "seasonal"))
            .collect()
    }

    /// Candidates from the categories mapped to the current time-of-day bucket
    pub async fn time_based(&self, context: &Context) -> Vec<Recommendation> {
        let categories = self
            .mappings
            .time_of_day
            .get(&context.time_of_day)
            .cloned()
            .unwrap_or_default();

        let mut recommendations = Vec::new();
        for category_id in categories {
            let products = match self.products.get_products_by_category(category_id).await {
                Ok(products) => products,
                Err(e) => {
                    tracing::warn!(error = %e, time_of_day = %context.time_of_day, "Time-based candidate fetch failed, degrading to empty");
                    continue;
                }
            };

            for p in products {
                recommendations.push(
                    Recommendation::new(p.id, self.scoring.time_based_score(&p), "time_based")
                        .with_detail("time_of_day", json!(context.time_of_day.to_string())),
                );
            }
        }

        recommendations
    }

    /// Candidates from the currently trending products
    pub async fn popularity(&self, context: &Context) -> Vec<Recommendation> {
        let products = match self
            .products
            .get_popular_products(context, POPULAR_LIMIT)
            .await
        {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "Popularity candidate fetch failed, degrading to empty");
                return Vec::new();
            }
        };

        products
            .into_iter()
            .map(|p| {
                Recommendation::new(p.id, self.scoring.trending_score(&p), "trending")
                    .with_detail("category", json!(p.category_id))
            })
            .collect()
    }
}
