//! Survey results (one per user) and archived agent recommendations.

use chrono::{DateTime, Utc};
use libsql::params;
use serde_json::Value;

use super::{Storage, from_secs, to_secs};
use crate::error::CoreError;
use crate::models::{HobbyRecommendation, SurveyResult};

impl Storage {
    pub async fn get_survey_result(
        &self,
        user_id: &str,
    ) -> Result<Option<SurveyResult>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT user_id, answers, recommendations, created_at, updated_at \
                 FROM survey_results WHERE user_id = ?1",
                params![user_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => {
                let answers: String = row.get(1)?;
                let recommendations: String = row.get(2)?;
                Ok(Some(SurveyResult {
                    user_id: row.get(0)?,
                    answers: serde_json::from_str(&answers)
                        .map_err(|e| CoreError::Storage(e.to_string()))?,
                    recommendations: serde_json::from_str(&recommendations)
                        .map_err(|e| CoreError::Storage(e.to_string()))?,
                    created_at: from_secs(row.get(3)?),
                    updated_at: from_secs(row.get(4)?),
                }))
            }
            None => Ok(None),
        }
    }

    /// Insert or replace the single result a user may have.
    pub async fn upsert_survey_result(
        &self,
        user_id: &str,
        answers: &Value,
        recommendations: &Value,
        at: DateTime<Utc>,
    ) -> Result<SurveyResult, CoreError> {
        let answers_json =
            serde_json::to_string(answers).map_err(|e| CoreError::Storage(e.to_string()))?;
        let recommendations_json = serde_json::to_string(recommendations)
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        self.conn()
            .execute(
                "INSERT INTO survey_results (user_id, answers, recommendations, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?4) \
                 ON CONFLICT (user_id) DO UPDATE SET \
                     answers = excluded.answers, \
                     recommendations = excluded.recommendations, \
                     updated_at = excluded.updated_at",
                params![user_id, answers_json, recommendations_json, to_secs(at)],
            )
            .await?;
        self.get_survey_result(user_id)
            .await?
            .ok_or_else(|| CoreError::Storage("survey upsert lost its row".to_string()))
    }

    pub async fn insert_hobby_recommendation(
        &self,
        rec: &HobbyRecommendation,
    ) -> Result<(), CoreError> {
        self.conn()
            .execute(
                "INSERT INTO hobby_recommendations (id, user_id, recommendation_text, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    rec.id.as_str(),
                    rec.user_id.as_str(),
                    rec.recommendation_text.as_str(),
                    to_secs(rec.created_at)
                ],
            )
            .await?;
        Ok(())
    }
}
