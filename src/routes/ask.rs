use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::AppResult, middleware::RequestId, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    answer: String,
}

/// Handler for the question answering endpoint
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Json<AskResponse>> {
    let Json(request) = payload?;
    tracing::info!(request_id = %request_id, "Answering question");

    let answer = state
        .assistant
        .ask(&request.question)
        .await
        .map_err(|e| e.context("Error interacting with ChatGPT"))?;

    Ok(Json(AskResponse { answer }))
}
