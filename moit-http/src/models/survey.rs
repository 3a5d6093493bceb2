use chrono::{DateTime, Utc};
use moit_core::models::SurveyResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveSurveyRequest {
    #[schema(value_type = Object)]
    pub answers: Value,
    #[schema(value_type = Object)]
    pub recommendations: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SurveyResultResponse {
    pub user_id: String,
    #[schema(value_type = Object)]
    pub answers: Value,
    #[schema(value_type = Object)]
    pub recommendations: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SurveyResult> for SurveyResultResponse {
    fn from(result: SurveyResult) -> Self {
        Self {
            user_id: result.user_id,
            answers: result.answers,
            recommendations: result.recommendations,
            created_at: result.created_at,
            updated_at: result.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecommendRequest {
    /// Raw survey answers: Q6..Q15 scales plus the budget and time buckets.
    #[schema(value_type = Object)]
    pub answers: Value,
}
