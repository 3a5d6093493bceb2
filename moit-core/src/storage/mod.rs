//! SQLite persistence via libsql.
//!
//! One database file holds every table. The schema is applied on connect with
//! `CREATE TABLE IF NOT EXISTS`; WAL mode keeps concurrent reads cheap.
//! Timestamps are stored as unix seconds.

mod contacts;
mod meetings;
mod posts;
mod surveys;
mod users;

use std::path::Path;

use chrono::{DateTime, Utc};
use libsql::Connection;
use tracing::info;

use crate::error::CoreError;

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    name TEXT NOT NULL,
    nickname TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    is_admin INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    failed_login_attempts INTEGER NOT NULL DEFAULT 0,
    last_login_attempt INTEGER,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
)"#;

const MEETINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS meetings (
    id TEXT PRIMARY KEY,
    organizer_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    location TEXT NOT NULL,
    max_members INTEGER NOT NULL,
    image_url TEXT,
    starts_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
)"#;

const MEETINGS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_meetings_starts_at ON meetings (starts_at)";

const PARTICIPANTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS meeting_participants (
    meeting_id TEXT NOT NULL REFERENCES meetings (id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    joined_at INTEGER NOT NULL,
    PRIMARY KEY (meeting_id, user_id)
)"#;

const POSTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    number INTEGER NOT NULL UNIQUE,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    file_urls TEXT NOT NULL DEFAULT '[]',
    views INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
)"#;

const POST_VIEW_LOGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS post_view_logs (
    post_id TEXT NOT NULL REFERENCES posts (id) ON DELETE CASCADE,
    ip TEXT NOT NULL,
    user_agent TEXT NOT NULL,
    viewed_at INTEGER NOT NULL
)"#;

const POST_VIEW_LOGS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_post_view_logs_lookup
ON post_view_logs (post_id, ip, user_agent, viewed_at)"#;

const CONTACTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    message TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
)"#;

const SURVEY_RESULTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS survey_results (
    user_id TEXT PRIMARY KEY REFERENCES users (id) ON DELETE CASCADE,
    answers TEXT NOT NULL,
    recommendations TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
)"#;

const HOBBY_RECOMMENDATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS hobby_recommendations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    recommendation_text TEXT NOT NULL,
    created_at INTEGER NOT NULL
)"#;

const SCHEMA: &[&str] = &[
    USERS_TABLE,
    MEETINGS_TABLE,
    MEETINGS_INDEX,
    PARTICIPANTS_TABLE,
    POSTS_TABLE,
    POST_VIEW_LOGS_TABLE,
    POST_VIEW_LOGS_INDEX,
    CONTACTS_TABLE,
    SURVEY_RESULTS_TABLE,
    HOBBY_RECOMMENDATIONS_TABLE,
];

/// Handle to the platform database. Shared via `Arc` from the HTTP state;
/// the single connection serializes writes, which SQLite does anyway.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at `path` and ensure the schema exists.
    /// `:memory:` is accepted for tests and ephemeral runs.
    pub async fn connect(path: &str) -> Result<Self, CoreError> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| CoreError::Storage(e.to_string()))?;
                }
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        let conn = db.connect().map_err(|e| CoreError::Storage(e.to_string()))?;

        // WAL enables concurrent readers with a single writer. PRAGMA returns
        // a row, so it must go through query.
        let mut rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| CoreError::Storage(format!("WAL pragma failed: {e}")))?;
        while rows.next().await?.is_some() {}

        conn.execute("PRAGMA foreign_keys=ON", ()).await?;

        for statement in SCHEMA {
            conn.execute(statement, ()).await?;
        }

        info!(path, "database ready");

        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Unix seconds for a timestamp column.
pub(crate) fn to_secs(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}

/// Timestamp column back to a `DateTime`.
pub(crate) fn from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}
