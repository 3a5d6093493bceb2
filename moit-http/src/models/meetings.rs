use chrono::{DateTime, Utc};
use moit_core::models::{Meeting, MeetingSummary, PlatformStats};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMeetingRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub max_members: i64,
    pub image_url: Option<String>,
    pub starts_at: DateTime<Utc>,
}

pub type UpdateMeetingRequest = CreateMeetingRequest;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeetingResponse {
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

impl From<Meeting> for MeetingResponse {
    fn from(meeting: Meeting) -> Self {
        Self {
            id: meeting.id,
            organizer_id: meeting.organizer_id,
            title: meeting.title,
            description: meeting.description,
            category: meeting.category,
            location: meeting.location,
            max_members: meeting.max_members,
            image_url: meeting.image_url,
            starts_at: meeting.starts_at,
            created_at: meeting.created_at,
            updated_at: meeting.updated_at,
        }
    }
}

/// A meeting in listings: row data plus organizer nickname, live member count
/// and the viewer's join flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeetingSummaryResponse {
    #[serde(flatten)]
    pub meeting: MeetingResponse,
    pub organizer_nickname: String,
    pub current_members: i64,
    pub is_joined: bool,
}

impl From<MeetingSummary> for MeetingSummaryResponse {
    fn from(summary: MeetingSummary) -> Self {
        Self {
            meeting: summary.meeting.into(),
            organizer_nickname: summary.organizer_nickname,
            current_members: summary.current_members,
            is_joined: summary.is_joined,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeetingListResponse {
    pub meetings: Vec<MeetingSummaryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeetingDetailResponse {
    #[serde(flatten)]
    pub meeting: MeetingSummaryResponse,
    /// Nicknames, organizer first.
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListMeetingsQuery {
    /// `latest` (default) or `deadline`.
    pub sort: Option<String>,
}

/// Draft data for agent-backed similar-meeting matching.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MatchMeetingsRequest {
    pub title: String,
    pub description: String,
    pub time: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SimilarMeetingsRequest {
    pub title: String,
    pub category: String,
    pub location: String,
    pub exclude_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub total_meetings: i64,
    pub popular_category: Option<String>,
    pub new_users_this_week: i64,
}

impl From<PlatformStats> for StatsResponse {
    fn from(stats: PlatformStats) -> Self {
        Self {
            total_meetings: stats.total_meetings,
            popular_category: stats.popular_category,
            new_users_this_week: stats.new_users_this_week,
        }
    }
}
