//! HTTP client for the external AI agent service.
//!
//! The agent is a black box reached over plain HTTP POST. Every request wraps
//! its payload in `{"user_input": ...}` and every answer comes back as a
//! `final_answer` string; what happens in between (similarity search, hobby
//! scoring, natural-language search) is the agent's business.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::CoreError;
use crate::models::Meeting;

/// Invocations may sit behind a slow model; give them a minute.
const INVOKE_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Index pushes are fire-and-forget and must never hold a request hostage.
const INDEX_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    final_answer: Option<String>,
}

/// Client for the agent's `/agent/invoke` and `/meetings/add` endpoints.
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(INVOKE_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Agent(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send a `user_input` payload and return the agent's `final_answer`.
    pub async fn invoke(&self, user_input: Value) -> Result<String, CoreError> {
        let url = format!("{}/agent/invoke", self.base_url);
        debug!(%url, "invoking agent");
        let response = self
            .http
            .post(&url)
            .json(&json!({ "user_input": user_input }))
            .send()
            .await
            .map_err(|e| CoreError::Agent(format!("agent unreachable: {e}")))?;
        if !response.status().is_success() {
            return Err(CoreError::Agent(format!(
                "agent returned HTTP {}",
                response.status()
            )));
        }
        let body: InvokeResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Agent(format!("bad agent response: {e}")))?;
        body.final_answer
            .filter(|answer| !answer.is_empty())
            .ok_or_else(|| CoreError::Agent("agent returned no answer".to_string()))
    }

    /// Push a freshly created meeting into the agent's vector index. Callers
    /// treat failures as non-fatal; the deadline here is deliberately short.
    pub async fn index_meeting(&self, meeting: &Meeting) -> Result<(), CoreError> {
        let url = format!("{}/meetings/add", self.base_url);
        let payload = json!({
            "meeting_id": meeting.id,
            "title": meeting.title,
            "description": meeting.description,
            "time": meeting.starts_at.format("%Y-%m-%d %H:%M").to_string(),
            "location": meeting.location,
        });
        self.http
            .post(&url)
            .timeout(INDEX_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::Agent(format!("index push failed: {e}")))?
            .error_for_status()
            .map_err(|e| CoreError::Agent(format!("index push rejected: {e}")))?;
        Ok(())
    }
}

/// Payload for natural-language search.
pub fn search_input(query: &str) -> Value {
    json!({ "messages": [["user", query]] })
}

/// Payload for similar-meeting matching against a draft meeting.
pub fn meeting_match_input(
    title: &str,
    description: &str,
    time: &str,
    location: &str,
) -> Value {
    json!({
        "title": title,
        "description": description,
        "time": time,
        "location": location,
    })
}
