use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{DeviceType, Recommendation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub user_id: i64,
    pub device: DeviceType,
}

/// GET /api/v1/recommendations?user_id=42&device=mobile
pub async fn recommend(
    State(state): State<AppState>,
    Query(query): Query<RecommendationsQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let recommendations = state
        .recommendations
        .get_recommendations(query.user_id, query.device)
        .await?;

    Ok(Json(recommendations))
}
