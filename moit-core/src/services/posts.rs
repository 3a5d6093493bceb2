//! Post lifecycle: sequential numbering, deduplicated view counting, and
//! object cleanup when attachments or inline images disappear.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::error::CoreError;
use crate::models::Post;
use crate::objects::ObjectStore;
use crate::storage::Storage;

/// Inline image URLs embedded in markdown content.
static IMAGE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)https://[^"'\s)]+?\.(?:png|jpg|jpeg|gif)"#).unwrap());

/// A view by the same (ip, user agent) pair within this window counts once.
const VIEW_DEDUP_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub file_urls: Vec<String>,
}

/// Image URLs referenced by a post's markdown body.
pub fn content_image_urls(content: &str) -> Vec<String> {
    IMAGE_URL_RE
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// URLs present in the old revision but gone from the new one: both inline
/// images and explicit attachments. These objects are safe to delete.
pub fn removed_urls(old: &Post, new_content: &str, new_files: &[String]) -> Vec<String> {
    let new_images = content_image_urls(new_content);
    let mut removed: Vec<String> = content_image_urls(&old.content)
        .into_iter()
        .filter(|url| !new_images.contains(url))
        .collect();
    for url in &old.file_urls {
        if !new_files.contains(url) && !removed.contains(url) {
            removed.push(url.clone());
        }
    }
    removed
}

pub async fn create_post(storage: &Storage, draft: PostDraft) -> Result<Post, CoreError> {
    if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
        return Err(CoreError::validation("title and content are required"));
    }
    let now = Utc::now();
    let post = Post {
        id: uuid::Uuid::new_v4().to_string(),
        number: storage.next_post_number().await?,
        title: draft.title,
        content: draft.content,
        file_urls: draft.file_urls,
        views: 0,
        created_at: now,
        updated_at: now,
    };
    storage.insert_post(&post).await?;
    Ok(post)
}

/// Fetch a post for display, counting the view unless this visitor already
/// viewed it within the dedup window.
pub async fn view_post(
    storage: &Storage,
    id: &str,
    ip: &str,
    user_agent: &str,
    now: DateTime<Utc>,
) -> Result<Post, CoreError> {
    let post = storage
        .get_post(id)
        .await?
        .ok_or(CoreError::NotFound("post"))?;
    let since = now - Duration::hours(VIEW_DEDUP_HOURS);
    if !storage.has_recent_view(id, ip, user_agent, since).await? {
        storage.record_view(id, ip, user_agent, now).await?;
        return storage
            .get_post(id)
            .await?
            .ok_or(CoreError::NotFound("post"));
    }
    Ok(post)
}

/// Update a post and delete every object the new revision no longer
/// references. Cleanup failures are logged, never surfaced.
pub async fn update_post(
    storage: &Storage,
    objects: &dyn ObjectStore,
    id: &str,
    draft: PostDraft,
) -> Result<Post, CoreError> {
    let existing = storage
        .get_post(id)
        .await?
        .ok_or(CoreError::NotFound("post"))?;

    for url in removed_urls(&existing, &draft.content, &draft.file_urls) {
        delete_by_url(objects, &url).await;
    }

    storage
        .update_post(id, &draft.title, &draft.content, &draft.file_urls, Utc::now())
        .await?;
    storage
        .get_post(id)
        .await?
        .ok_or(CoreError::NotFound("post"))
}

/// Delete a post. The row goes synchronously; object cleanup runs in the
/// background so the response never waits on the store.
pub async fn delete_post(
    storage: &Storage,
    objects: Arc<dyn ObjectStore>,
    id: &str,
) -> Result<(), CoreError> {
    let post = storage
        .get_post(id)
        .await?
        .ok_or(CoreError::NotFound("post"))?;
    storage.delete_post(id).await?;

    tokio::spawn(async move {
        let mut urls = content_image_urls(&post.content);
        urls.extend(post.file_urls.iter().cloned());
        for url in urls {
            delete_by_url(objects.as_ref(), &url).await;
        }
    });
    Ok(())
}

async fn delete_by_url(objects: &dyn ObjectStore, url: &str) {
    let Some(key) = objects.key_for_url(url) else {
        return;
    };
    if let Err(e) = objects.delete(&key).await {
        warn!(key, error = %e, "object cleanup failed");
    }
}
