use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;

use super::data::{SessionData, SessionId, UserId};

/// Sessions outlive the login by this many hours.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Manages login sessions. Tokens are opaque UUIDs handed to the client in an
/// HttpOnly cookie; everything else stays server-side.
#[derive(Clone, Default)]
pub struct SessionManager {
    sessions: Arc<DashMap<SessionId, SessionData>>,
    users: Arc<DashMap<UserId, Vec<SessionId>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&self, user_id: &str) -> SessionId {
        let session_id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let data = SessionData {
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        };
        self.sessions.insert(session_id.clone(), data);
        self.users
            .entry(user_id.to_string())
            .or_default()
            .push(session_id.clone());
        session_id
    }

    /// Look up a session. Expired sessions are evicted on read.
    pub fn get_session(&self, session_id: &str) -> Option<SessionData> {
        let expired = {
            let data = self.sessions.get(session_id)?;
            if data.is_expired(Utc::now()) {
                true
            } else {
                return Some(data.value().clone());
            }
        };
        if expired {
            self.remove_session(session_id);
        }
        None
    }

    pub fn remove_session(&self, session_id: &str) {
        if let Some((_, data)) = self.sessions.remove(session_id) {
            if let Some(mut sessions) = self.users.get_mut(&data.user_id) {
                sessions.retain(|id| id != session_id)
            }
        }
    }

    /// Drop every session a user holds, e.g. when the account is deleted.
    pub fn remove_sessions(&self, user_id: &str) {
        if let Some((_, sessions)) = self.users.remove(user_id) {
            for session_id in sessions {
                self.sessions.remove(&session_id);
            }
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

// test for session manager
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_remove() {
        let manager = SessionManager::new();
        let session_id = manager.create_session("user-1");

        let session = manager.get_session(&session_id).unwrap();
        assert_eq!(session.user_id, "user-1");
        assert!(session.expires_at > session.created_at);

        manager.remove_session(&session_id);
        assert!(manager.get_session(&session_id).is_none());
    }

    #[test]
    fn removing_a_user_drops_every_session() {
        let manager = SessionManager::new();
        let first = manager.create_session("user-1");
        let second = manager.create_session("user-1");
        let other = manager.create_session("user-2");

        manager.remove_sessions("user-1");
        assert!(manager.get_session(&first).is_none());
        assert!(manager.get_session(&second).is_none());
        assert!(manager.get_session(&other).is_some());
    }

    #[test]
    fn expired_sessions_are_evicted_on_read() {
        let manager = SessionManager::new();
        let session_id = manager.create_session("user-1");
        manager
            .sessions
            .get_mut(&session_id)
            .unwrap()
            .expires_at = Utc::now() - Duration::seconds(1);

        assert!(manager.get_session(&session_id).is_none());
        assert_eq!(manager.session_count(), 0);
    }
}
