//! Meeting lifecycle: creation with agent indexing, the join/cancel rules,
//! similar-meeting lookup and platform stats.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::agent::AgentClient;
use crate::error::CoreError;
use crate::models::{Meeting, MeetingSummary, PlatformStats};
use crate::objects::ObjectStore;
use crate::storage::Storage;

/// A meeting needs at least the organizer and one guest.
pub const MIN_MEMBERS: i64 = 2;

#[derive(Debug, Clone)]
pub struct MeetingDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub max_members: i64,
    pub image_url: Option<String>,
    pub starts_at: DateTime<Utc>,
}

fn validate_draft(draft: &MeetingDraft, now: DateTime<Utc>) -> Result<(), CoreError> {
    if draft.title.trim().is_empty()
        || draft.description.trim().is_empty()
        || draft.category.trim().is_empty()
        || draft.location.trim().is_empty()
    {
        return Err(CoreError::validation(
            "title, description, category and location are required",
        ));
    }
    if draft.max_members < MIN_MEMBERS {
        return Err(CoreError::validation(format!(
            "max_members must be at least {MIN_MEMBERS}"
        )));
    }
    if draft.starts_at < now {
        return Err(CoreError::validation(
            "a meeting cannot be scheduled in the past",
        ));
    }
    Ok(())
}

/// Create a meeting and push it into the agent's index. The index push is
/// best-effort: a down agent must not block creation.
pub async fn create_meeting(
    storage: &Storage,
    agent: &AgentClient,
    organizer_id: &str,
    draft: MeetingDraft,
) -> Result<Meeting, CoreError> {
    let now = Utc::now();
    validate_draft(&draft, now)?;

    let meeting = Meeting {
        id: uuid::Uuid::new_v4().to_string(),
        organizer_id: organizer_id.to_string(),
        title: draft.title,
        description: draft.description,
        category: draft.category,
        location: draft.location,
        max_members: draft.max_members,
        image_url: draft.image_url,
        starts_at: draft.starts_at,
        created_at: now,
        updated_at: now,
    };
    storage.insert_meeting(&meeting).await?;

    if let Err(e) = agent.index_meeting(&meeting).await {
        warn!(meeting_id = %meeting.id, error = %e, "agent index push failed");
    }

    Ok(meeting)
}

/// Update a meeting. Only the organizer may edit, and the start time cannot
/// be moved into the past. A replaced cover image is deleted from the store.
pub async fn update_meeting(
    storage: &Storage,
    objects: &dyn ObjectStore,
    caller_id: &str,
    meeting_id: &str,
    draft: MeetingDraft,
) -> Result<Meeting, CoreError> {
    let existing = storage
        .get_meeting(meeting_id)
        .await?
        .ok_or(CoreError::NotFound("meeting"))?;
    if existing.organizer_id != caller_id {
        return Err(CoreError::Forbidden);
    }
    let now = Utc::now();
    validate_draft(&draft, now)?;

    if let Some(old_url) = existing.image_url.as_deref() {
        if draft.image_url.as_deref() != Some(old_url) {
            delete_by_url(objects, old_url).await;
        }
    }

    let updated = Meeting {
        title: draft.title,
        description: draft.description,
        category: draft.category,
        location: draft.location,
        max_members: draft.max_members,
        image_url: draft.image_url,
        starts_at: draft.starts_at,
        updated_at: now,
        ..existing
    };
    storage.update_meeting(&updated).await?;
    Ok(updated)
}

/// Delete a meeting (organizer only). The row goes first; cover-image cleanup
/// is best-effort afterwards.
pub async fn delete_meeting(
    storage: &Storage,
    objects: &dyn ObjectStore,
    caller_id: &str,
    meeting_id: &str,
) -> Result<(), CoreError> {
    let meeting = storage
        .get_meeting(meeting_id)
        .await?
        .ok_or(CoreError::NotFound("meeting"))?;
    if meeting.organizer_id != caller_id {
        return Err(CoreError::Forbidden);
    }
    storage.delete_meeting(meeting_id).await?;

    if let Some(url) = meeting.image_url.as_deref() {
        delete_by_url(objects, url).await;
    }
    Ok(())
}

/// Join a meeting. Checked in order: the meeting exists, it is not the
/// caller's own, it has room (max_members counts the organizer), and the
/// caller has not joined already.
pub async fn join_meeting(
    storage: &Storage,
    user_id: &str,
    meeting_id: &str,
) -> Result<(), CoreError> {
    let meeting = storage
        .get_meeting(meeting_id)
        .await?
        .ok_or(CoreError::NotFound("meeting"))?;
    if meeting.organizer_id == user_id {
        return Err(CoreError::conflict("you cannot join your own meeting"));
    }
    if storage.current_members(meeting_id).await? >= meeting.max_members {
        return Err(CoreError::conflict("meeting is full"));
    }
    if storage.is_participant(meeting_id, user_id).await? {
        return Err(CoreError::conflict("already joined this meeting"));
    }
    storage
        .add_participant(meeting_id, user_id, Utc::now())
        .await
}

/// Leave a meeting. Meetings that already started cannot be cancelled.
pub async fn cancel_participation(
    storage: &Storage,
    user_id: &str,
    meeting_id: &str,
) -> Result<(), CoreError> {
    let meeting = storage
        .get_meeting(meeting_id)
        .await?
        .ok_or(CoreError::NotFound("meeting"))?;
    if meeting.starts_at < Utc::now() {
        return Err(CoreError::conflict(
            "a meeting that already started cannot be cancelled",
        ));
    }
    if storage.remove_participant(meeting_id, user_id).await? {
        Ok(())
    } else {
        Err(CoreError::NotFound("participation"))
    }
}

/// Attendee nicknames with the organizer first, tagged as such.
pub async fn participants(storage: &Storage, meeting_id: &str) -> Result<Vec<String>, CoreError> {
    let summary = storage
        .get_meeting_summary(meeting_id, None)
        .await?
        .ok_or(CoreError::NotFound("meeting"))?;
    let mut names = storage.participant_nicknames(meeting_id).await?;
    names.insert(0, format!("{} (organizer)", summary.organizer_nickname));
    Ok(names)
}

#[derive(Debug, Clone)]
pub struct SimilarQuery {
    pub title: String,
    pub category: String,
    pub location: String,
    pub exclude_id: Option<String>,
}

/// Keyword pre-filter for the duplicate-meeting nudge: same category and
/// location, title sharing at least one word with the draft.
pub async fn similar_meetings(
    storage: &Storage,
    query: SimilarQuery,
) -> Result<Vec<MeetingSummary>, CoreError> {
    if query.title.trim().is_empty()
        || query.category.trim().is_empty()
        || query.location.trim().is_empty()
    {
        return Err(CoreError::validation(
            "title, category and location are required",
        ));
    }

    let keywords: Vec<String> = query
        .title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if keywords.is_empty() {
        return Ok(Vec::new());
    }

    let candidates = storage
        .meetings_in_category_location(&query.category, &query.location)
        .await?;
    Ok(candidates
        .into_iter()
        .filter(|candidate| Some(&candidate.meeting.id) != query.exclude_id.as_ref())
        .filter(|candidate| {
            let title = candidate.meeting.title.to_lowercase();
            keywords.iter().any(|keyword| title.contains(keyword))
        })
        .collect())
}

/// Landing-page counters.
pub async fn platform_stats(storage: &Storage) -> Result<PlatformStats, CoreError> {
    let week_ago = Utc::now() - Duration::days(7);
    Ok(PlatformStats {
        total_meetings: storage.count_meetings().await?,
        popular_category: storage.popular_category().await?,
        new_users_this_week: storage.count_users_since(week_ago).await?,
    })
}

async fn delete_by_url(objects: &dyn ObjectStore, url: &str) {
    let Some(key) = objects.key_for_url(url) else {
        return;
    };
    if let Err(e) = objects.delete(&key).await {
        warn!(key, error = %e, "object cleanup failed");
    }
}
