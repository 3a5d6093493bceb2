//! Post rows and the view log used for 24h view dedup.

use chrono::{DateTime, Utc};
use libsql::params;

use super::{Storage, from_secs, to_secs};
use crate::error::CoreError;
use crate::models::Post;

const POST_COLUMNS: &str =
    "id, number, title, content, file_urls, views, created_at, updated_at";

fn post_from_row(row: &libsql::Row) -> Result<Post, CoreError> {
    let file_urls_json: String = row.get(4)?;
    let file_urls = serde_json::from_str(&file_urls_json)
        .map_err(|e| CoreError::Storage(format!("bad file_urls column: {e}")))?;
    Ok(Post {
        id: row.get(0)?,
        number: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        file_urls,
        views: row.get(5)?,
        created_at: from_secs(row.get(6)?),
        updated_at: from_secs(row.get(7)?),
    })
}

impl Storage {
    /// The next sequential post number (1 for an empty table).
    pub async fn next_post_number(&self) -> Result<i64, CoreError> {
        let mut rows = self
            .conn()
            .query("SELECT COALESCE(MAX(number), 0) + 1 FROM posts", ())
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::Storage("MAX query returned no row".to_string()))?;
        Ok(row.get(0)?)
    }

    pub async fn insert_post(&self, post: &Post) -> Result<(), CoreError> {
        let file_urls = serde_json::to_string(&post.file_urls)
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        self.conn()
            .execute(
                &format!("INSERT INTO posts ({POST_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                params![
                    post.id.as_str(),
                    post.number,
                    post.title.as_str(),
                    post.content.as_str(),
                    file_urls,
                    post.views,
                    to_secs(post.created_at),
                    to_secs(post.updated_at)
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"),
                (),
            )
            .await?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next().await? {
            posts.push(post_from_row(&row)?);
        }
        Ok(posts)
    }

    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                params![id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(post_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_post(
        &self,
        id: &str,
        title: &str,
        content: &str,
        file_urls: &[String],
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let file_urls = serde_json::to_string(file_urls)
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        self.conn()
            .execute(
                "UPDATE posts SET title = ?2, content = ?3, file_urls = ?4, updated_at = ?5 \
                 WHERE id = ?1",
                params![id, title, content, file_urls, to_secs(at)],
            )
            .await?;
        Ok(())
    }

    pub async fn delete_post(&self, id: &str) -> Result<bool, CoreError> {
        let affected = self
            .conn()
            .execute("DELETE FROM posts WHERE id = ?1", params![id])
            .await?;
        Ok(affected > 0)
    }

    /// Has this (ip, user_agent) pair viewed the post since `since`?
    pub async fn has_recent_view(
        &self,
        post_id: &str,
        ip: &str,
        user_agent: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT 1 FROM post_view_logs \
                 WHERE post_id = ?1 AND ip = ?2 AND user_agent = ?3 AND viewed_at > ?4 \
                 LIMIT 1",
                params![post_id, ip, user_agent, to_secs(since)],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Count a view: bump the counter and log the visitor.
    pub async fn record_view(
        &self,
        post_id: &str,
        ip: &str,
        user_agent: &str,
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.conn()
            .execute(
                "UPDATE posts SET views = views + 1 WHERE id = ?1",
                params![post_id],
            )
            .await?;
        self.conn()
            .execute(
                "INSERT INTO post_view_logs (post_id, ip, user_agent, viewed_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![post_id, ip, user_agent, to_secs(at)],
            )
            .await?;
        Ok(())
    }
}
