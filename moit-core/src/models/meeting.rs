use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hobby meetup. `max_members` counts the organizer, who is not stored as a
/// participant row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub max_members: i64,
    pub image_url: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A meeting row enriched for listings: organizer nickname, live member count
/// (participants + organizer) and whether the viewer already joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingSummary {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub organizer_nickname: String,
    pub current_members: i64,
    pub is_joined: bool,
}

/// Sort orders for the meeting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeetingSort {
    /// Newest created first.
    #[default]
    Latest,
    /// Soonest start first.
    Deadline,
}

impl FromStr for MeetingSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "deadline" => Ok(Self::Deadline),
            _ => Err(()),
        }
    }
}

/// Platform-wide counters surfaced on the landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_meetings: i64,
    pub popular_category: Option<String>,
    pub new_users_this_week: i64,
}
