//! Shared builders for unit tests.

use chrono::{Duration, Utc};

use crate::models::{Meeting, User};

pub(crate) fn sample_user(username: &str, nickname: &str) -> User {
    let now = Utc::now();
    User {
        id: uuid::Uuid::new_v4().to_string(),
        username: username.to_string(),
        password_hash: "$argon2id$test".to_string(),
        name: "Sample".to_string(),
        nickname: nickname.to_string(),
        email: format!("{username}@example.com"),
        is_admin: false,
        is_active: true,
        failed_login_attempts: 0,
        last_login_attempt: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn sample_meeting(organizer_id: &str, title: &str) -> Meeting {
    let now = Utc::now();
    Meeting {
        id: uuid::Uuid::new_v4().to_string(),
        organizer_id: organizer_id.to_string(),
        title: title.to_string(),
        description: "a meetup".to_string(),
        category: "sports".to_string(),
        location: "Seoul".to_string(),
        max_members: 4,
        image_url: None,
        starts_at: now + Duration::days(3),
        created_at: now,
        updated_at: now,
    }
}
