//! Survey handling and the hobby-recommendation bridge to the agent.
//!
//! The agent expects the ten 1–5 scale answers (Q6..Q15) plus a user context
//! with concrete budget and time numbers; the web survey stores buckets, so
//! the mapping lives here.

use chrono::Utc;
use serde_json::{Value, json};

use crate::agent::AgentClient;
use crate::error::CoreError;
use crate::models::HobbyRecommendation;
use crate::storage::Storage;

/// Scale questions forwarded to the agent.
const SCALE_QUESTIONS: [&str; 10] = [
    "Q6", "Q7", "Q8", "Q9", "Q10", "Q11", "Q12", "Q13", "Q14", "Q15",
];

const DEFAULT_SCALE: i64 = 3;
const DEFAULT_BUDGET_WON: i64 = 100_000;
const DEFAULT_TIME_HOURS: i64 = 5;

/// Monthly-budget bucket to a spendable amount in won.
pub fn budget_to_won(bucket: &str) -> i64 {
    match bucket {
        "under_50k" => 50_000,
        "50k_100k" => 100_000,
        "100k_200k" => 200_000,
        "over_200k" => 1_000_000,
        _ => DEFAULT_BUDGET_WON,
    }
}

/// Weekly-time bucket to a per-session hour limit.
pub fn time_to_hours(bucket: &str) -> i64 {
    match bucket {
        "under_3h" => 3,
        "3_5h" => 5,
        "5_10h" => 10,
        "over_10h" => 24,
        _ => DEFAULT_TIME_HOURS,
    }
}

fn scale_answer(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(DEFAULT_SCALE),
        Some(Value::String(s)) => s.parse().unwrap_or(DEFAULT_SCALE),
        _ => DEFAULT_SCALE,
    }
}

fn bucket_answer<'a>(answers: &'a Value, key: &str) -> &'a str {
    answers.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Build the `user_input` payload for a hobby-recommendation invocation.
pub fn recommendation_input(answers: &Value, user_id: &str) -> Value {
    let mut survey = serde_json::Map::new();
    for question in SCALE_QUESTIONS {
        survey.insert(
            question.to_string(),
            Value::from(scale_answer(answers.get(question))),
        );
    }
    json!({
        "survey": survey,
        "user_context": {
            "monthly_budget": budget_to_won(bucket_answer(answers, "monthly_budget")),
            "session_time_limit_hours": time_to_hours(bucket_answer(answers, "weekly_time")),
            "offline_ok": true,
            "user_id": user_id,
        }
    })
}

/// Ask the agent for hobby recommendations and archive the raw answer. The
/// answer is usually a JSON document; when it is not, the raw text is
/// returned as a string value.
pub async fn recommend(
    storage: &Storage,
    agent: &AgentClient,
    user_id: &str,
    answers: &Value,
) -> Result<Value, CoreError> {
    let answer_text = agent.invoke(recommendation_input(answers, user_id)).await?;

    storage
        .insert_hobby_recommendation(&HobbyRecommendation {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            recommendation_text: answer_text.clone(),
            created_at: Utc::now(),
        })
        .await?;

    Ok(serde_json::from_str(&answer_text).unwrap_or(Value::String(answer_text)))
}
