use chrono::{DateTime, Utc};
use moit_core::models::Post;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub file_urls: Vec<String>,
}

pub type UpdatePostRequest = CreatePostRequest;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: String,
    pub number: i64,
    pub title: String,
    pub content: String,
    pub file_urls: Vec<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            number: post.number,
            title: post.title,
            content: post.content,
            file_urls: post.file_urls,
            views: post.views,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
