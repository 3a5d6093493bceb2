use chrono::{DateTime, Utc};

pub type SessionId = String;
pub type UserId = String;

/// Data for one login session.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
