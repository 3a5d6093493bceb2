use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored survey outcome. One row per user; re-submitting replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResult {
    pub user_id: String,
    pub answers: Value,
    pub recommendations: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw agent answer archived per recommendation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HobbyRecommendation {
    pub id: String,
    pub user_id: String,
    pub recommendation_text: String,
    pub created_at: DateTime<Utc>,
}
