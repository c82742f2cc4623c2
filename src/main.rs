use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use recsvc::config::Config;
use recsvc::db::{create_pool, create_redis_client};
use recsvc::routes::create_router;
use recsvc::services::{CategoryMappings, RecommendationService};
use recsvc::state::AppState;
use recsvc::stores::{PgInteractionStore, PgProductStore, RedisRecommendationCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recsvc=debug")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let redis_client = create_redis_client(&config.redis_url)?;

    let mappings = match &config.category_mappings_path {
        Some(path) => CategoryMappings::from_file(path)?,
        None => CategoryMappings::default(),
    };

    let service = RecommendationService::new(
        Arc::new(PgProductStore::new(pool.clone())),
        Arc::new(PgInteractionStore::new(pool)),
        Arc::new(RedisRecommendationCache::new(redis_client)),
        mappings,
        config.region.clone(),
    );

    let app = create_router(AppState::new(Arc::new(service)));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Recommendation service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
