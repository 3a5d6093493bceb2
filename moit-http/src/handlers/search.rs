use axum::{extract::State, response::Json};
use moit_core::CoreError;
use moit_core::agent;

use crate::error::AppError;
use crate::models::{AiSearchRequest, AiSearchResponse};
use crate::server::AppState;

/// Natural-language meeting search via the agent
#[utoipa::path(
    post,
    path = "/search/ai",
    request_body = AiSearchRequest,
    responses(
        (status = 200, description = "Agent answer", body = AiSearchResponse),
        (status = 400, description = "Empty query"),
        (status = 502, description = "Agent unreachable or returned no answer")
    )
)]
#[axum::debug_handler]
pub async fn ai_search(
    State(state): State<AppState>,
    Json(payload): Json<AiSearchRequest>,
) -> Result<Json<AiSearchResponse>, AppError> {
    if payload.query.trim().is_empty() {
        return Err(CoreError::validation("query must not be empty").into());
    }
    let answer = state
        .agent
        .invoke(agent::search_input(&payload.query))
        .await?;
    Ok(Json(AiSearchResponse { answer }))
}
