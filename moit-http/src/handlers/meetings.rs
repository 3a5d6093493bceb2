use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use moit_core::models::MeetingSort;
use moit_core::services::meetings::{self, MeetingDraft, SimilarQuery};

use crate::auth::{AuthUser, MaybeUser};
use crate::error::AppError;
use crate::models::{
    CreateMeetingRequest, ListMeetingsQuery, MatchMeetingsRequest, MeetingDetailResponse,
    MeetingListResponse, MeetingResponse, MessageResponse, SimilarMeetingsRequest,
    StatsResponse, UpdateMeetingRequest,
};
use crate::server::AppState;

impl From<CreateMeetingRequest> for MeetingDraft {
    fn from(payload: CreateMeetingRequest) -> Self {
        Self {
            title: payload.title,
            description: payload.description,
            category: payload.category,
            location: payload.location,
            max_members: payload.max_members,
            image_url: payload.image_url,
            starts_at: payload.starts_at,
        }
    }
}

/// List upcoming meetings
///
/// Public; `is_joined` only lights up for authenticated callers.
#[utoipa::path(
    get,
    path = "/meetings",
    responses((status = 200, description = "Upcoming meetings", body = MeetingListResponse)),
    params(("sort" = Option<String>, Query, description = "latest (default) or deadline"))
)]
#[axum::debug_handler]
pub async fn list_meetings(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(query): Query<ListMeetingsQuery>,
) -> Result<Json<MeetingListResponse>, AppError> {
    // Anything that is not a known sort falls back to latest.
    let sort = query
        .sort
        .as_deref()
        .and_then(|s| s.parse::<MeetingSort>().ok())
        .unwrap_or_default();
    let meetings = state
        .storage
        .list_upcoming_meetings(chrono::Utc::now(), sort, viewer.as_ref().map(|u| u.id.as_str()))
        .await?;

    Ok(Json(MeetingListResponse {
        meetings: meetings.into_iter().map(Into::into).collect(),
    }))
}

/// Create a meeting
#[utoipa::path(
    post,
    path = "/meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting created", body = MeetingResponse),
        (status = 400, description = "Invalid meeting data"),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn create_meeting(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateMeetingRequest>,
) -> Result<(StatusCode, Json<MeetingResponse>), AppError> {
    let meeting =
        meetings::create_meeting(&state.storage, &state.agent, &auth.user().id, payload.into())
            .await?;
    Ok((StatusCode::CREATED, Json(meeting.into())))
}

/// Meeting detail with its participant list
#[utoipa::path(
    get,
    path = "/meetings/{meeting_id}",
    responses(
        (status = 200, description = "Meeting detail", body = MeetingDetailResponse),
        (status = 404, description = "Meeting not found")
    ),
    params(("meeting_id" = String, Path, description = "Meeting identifier"))
)]
#[axum::debug_handler]
pub async fn get_meeting(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(meeting_id): Path<String>,
) -> Result<Json<MeetingDetailResponse>, AppError> {
    let summary = state
        .storage
        .get_meeting_summary(&meeting_id, viewer.as_ref().map(|u| u.id.as_str()))
        .await?
        .ok_or(moit_core::CoreError::NotFound("meeting"))?;
    let participants = meetings::participants(&state.storage, &meeting_id).await?;

    Ok(Json(MeetingDetailResponse {
        meeting: summary.into(),
        participants,
    }))
}

/// Update a meeting (organizer only)
#[utoipa::path(
    put,
    path = "/meetings/{meeting_id}",
    request_body = CreateMeetingRequest,
    responses(
        (status = 200, description = "Meeting updated", body = MeetingResponse),
        (status = 400, description = "Invalid meeting data"),
        (status = 403, description = "Not the organizer"),
        (status = 404, description = "Meeting not found")
    ),
    params(("meeting_id" = String, Path, description = "Meeting identifier"))
)]
#[axum::debug_handler]
pub async fn update_meeting(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(meeting_id): Path<String>,
    Json(payload): Json<UpdateMeetingRequest>,
) -> Result<Json<MeetingResponse>, AppError> {
    let meeting = meetings::update_meeting(
        &state.storage,
        state.objects.as_ref(),
        &auth.user().id,
        &meeting_id,
        payload.into(),
    )
    .await?;
    Ok(Json(meeting.into()))
}

/// Delete a meeting (organizer only)
#[utoipa::path(
    delete,
    path = "/meetings/{meeting_id}",
    responses(
        (status = 200, description = "Meeting deleted", body = MessageResponse),
        (status = 403, description = "Not the organizer"),
        (status = 404, description = "Meeting not found")
    ),
    params(("meeting_id" = String, Path, description = "Meeting identifier"))
)]
#[axum::debug_handler]
pub async fn delete_meeting(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(meeting_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    meetings::delete_meeting(
        &state.storage,
        state.objects.as_ref(),
        &auth.user().id,
        &meeting_id,
    )
    .await?;
    Ok(Json(MessageResponse::new("meeting deleted")))
}

/// Join a meeting
#[utoipa::path(
    post,
    path = "/meetings/{meeting_id}/join",
    responses(
        (status = 200, description = "Joined", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found"),
        (status = 409, description = "Own meeting, full, or already joined")
    ),
    params(("meeting_id" = String, Path, description = "Meeting identifier"))
)]
#[axum::debug_handler]
pub async fn join_meeting(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(meeting_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    meetings::join_meeting(&state.storage, &auth.user().id, &meeting_id).await?;
    Ok(Json(MessageResponse::new("joined meeting")))
}

/// Cancel participation
#[utoipa::path(
    delete,
    path = "/meetings/{meeting_id}/join",
    responses(
        (status = 200, description = "Participation cancelled", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting or participation not found"),
        (status = 409, description = "Meeting already started")
    ),
    params(("meeting_id" = String, Path, description = "Meeting identifier"))
)]
#[axum::debug_handler]
pub async fn cancel_participation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(meeting_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    meetings::cancel_participation(&state.storage, &auth.user().id, &meeting_id).await?;
    Ok(Json(MessageResponse::new("participation cancelled")))
}

/// Participant nicknames, organizer first
#[utoipa::path(
    get,
    path = "/meetings/{meeting_id}/participants",
    responses(
        (status = 200, description = "Participant nicknames", body = [String]),
        (status = 404, description = "Meeting not found")
    ),
    params(("meeting_id" = String, Path, description = "Meeting identifier"))
)]
#[axum::debug_handler]
pub async fn list_participants(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(meetings::participants(&state.storage, &meeting_id).await?))
}

/// Find meetings similar to a draft
///
/// Keyword match over titles in the same category and location, used to nudge
/// organizers toward joining instead of duplicating.
#[utoipa::path(
    post,
    path = "/meetings/similar",
    request_body = SimilarMeetingsRequest,
    responses(
        (status = 200, description = "Similar meetings", body = MeetingListResponse),
        (status = 400, description = "Missing title, category or location")
    )
)]
#[axum::debug_handler]
pub async fn similar_meetings(
    State(state): State<AppState>,
    Json(payload): Json<SimilarMeetingsRequest>,
) -> Result<Json<MeetingListResponse>, AppError> {
    let meetings = meetings::similar_meetings(
        &state.storage,
        SimilarQuery {
            title: payload.title,
            category: payload.category,
            location: payload.location,
            exclude_id: payload.exclude_id,
        },
    )
    .await?;

    Ok(Json(MeetingListResponse {
        meetings: meetings.into_iter().map(Into::into).collect(),
    }))
}

/// Ask the agent for similar existing meetings
///
/// Semantic counterpart of `/meetings/similar`: the draft goes to the agent's
/// vector index and the answer comes back as its summary/recommendations
/// document.
#[utoipa::path(
    post,
    path = "/meetings/match",
    request_body = MatchMeetingsRequest,
    responses(
        (status = 200, description = "Agent matching result"),
        (status = 400, description = "Missing title or description"),
        (status = 502, description = "Agent unreachable or returned no answer")
    )
)]
#[axum::debug_handler]
pub async fn match_meetings(
    State(state): State<AppState>,
    Json(payload): Json<MatchMeetingsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(
            moit_core::CoreError::validation("title and description are required").into(),
        );
    }
    let answer = state
        .agent
        .invoke(moit_core::agent::meeting_match_input(
            &payload.title,
            &payload.description,
            payload.time.as_deref().unwrap_or(""),
            payload.location.as_deref().unwrap_or(""),
        ))
        .await?;
    Ok(Json(
        serde_json::from_str(&answer).unwrap_or(serde_json::Value::String(answer)),
    ))
}

/// Platform statistics
#[utoipa::path(
    get,
    path = "/meetings/stats",
    responses((status = 200, description = "Platform statistics", body = StatsResponse))
)]
#[axum::debug_handler]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = meetings::platform_stats(&state.storage).await?;
    Ok(Json(stats.into()))
}
