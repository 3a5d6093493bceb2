use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. `password_hash` is an argon2id PHC string and must
/// never leave the core crate; the HTTP layer exposes its own response model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub failed_login_attempts: i64,
    pub last_login_attempt: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}
