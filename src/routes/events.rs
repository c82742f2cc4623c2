use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::ActionType;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub user_id: i64,
    pub product_id: Uuid,
    pub action_type: ActionType,
}

/// POST /api/v1/events
pub async fn record_event(
    State(state): State<AppState>,
    Json(request): Json<RecordEventRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    state
        .recommendations
        .record_event(request.user_id, request.product_id, request.action_type)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "recorded" }))))
}
