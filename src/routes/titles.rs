use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{CatalogId, CatalogSearchResult, MovieRecord},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Handler for catalog title search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<Vec<CatalogSearchResult>>> {
    let Query(params) = params.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    tracing::info!(request_id = %request_id, query = %params.q, "Searching titles");

    let results = state
        .titles
        .search(&params.q)
        .await
        .map_err(|e| e.context("Error fetching movie data"))?;

    Ok(Json(results))
}

/// Handler for the enriched movie detail endpoint
pub async fn movie(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<MovieRecord>> {
    let Path(id) = id.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let id = CatalogId(id);
    tracing::info!(request_id = %request_id, tmdb_id = %id, "Fetching movie details");

    let movie = state
        .movies
        .fetch(id)
        .await
        .map_err(|e| e.context("Error fetching movie details"))?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    Ok(Json(movie))
}
