use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use moit_core::CoreError;
use moit_core::services::surveys;
use serde_json::Value;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{RecommendRequest, SaveSurveyRequest, SurveyResultResponse};
use crate::server::AppState;

/// The caller's stored survey result
#[utoipa::path(
    get,
    path = "/survey",
    responses(
        (status = 200, description = "Stored survey result", body = SurveyResultResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No stored result")
    )
)]
#[axum::debug_handler]
pub async fn get_survey(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SurveyResultResponse>, AppError> {
    let result = state
        .storage
        .get_survey_result(&auth.user().id)
        .await?
        .ok_or(CoreError::NotFound("survey result"))?;
    Ok(Json(result.into()))
}

/// Save (or replace) the caller's survey result
#[utoipa::path(
    post,
    path = "/survey",
    request_body = SaveSurveyRequest,
    responses(
        (status = 201, description = "Result saved", body = SurveyResultResponse),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn save_survey(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SaveSurveyRequest>,
) -> Result<(StatusCode, Json<SurveyResultResponse>), AppError> {
    let result = state
        .storage
        .upsert_survey_result(
            &auth.user().id,
            &payload.answers,
            &payload.recommendations,
            Utc::now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// Ask the agent for hobby recommendations
///
/// Maps the raw answers to the agent's survey/user-context payload, invokes
/// the agent and returns its parsed answer. The raw answer text is archived.
#[utoipa::path(
    post,
    path = "/survey/recommend",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Agent recommendations"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Agent unreachable or returned no answer")
    )
)]
#[axum::debug_handler]
pub async fn recommend(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecommendRequest>,
) -> Result<Json<Value>, AppError> {
    let answer = surveys::recommend(
        &state.storage,
        &state.agent,
        &auth.user().id,
        &payload.answers,
    )
    .await?;
    Ok(Json(answer))
}
