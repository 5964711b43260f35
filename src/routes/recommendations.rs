use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RecommendationItem, RecommendationRequest},
    state::AppState,
};

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<Vec<RecommendationItem>>> {
    let Json(request) = payload?;
    tracing::info!(request_id = %request_id, "Generating recommendations");

    let items = state.recommendations.get_recommendations(request).await?;

    Ok(Json(items))
}
