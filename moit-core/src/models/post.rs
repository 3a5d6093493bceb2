use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post. `number` is a human-facing sequential id assigned on insert;
/// `file_urls` lists attachments living in the object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub number: i64,
    pub title: String,
    pub content: String,
    pub file_urls: Vec<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
