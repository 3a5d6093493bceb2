//! Meeting and participant rows.

use chrono::{DateTime, Utc};
use libsql::params;

use super::{Storage, from_secs, to_secs};
use crate::error::CoreError;
use crate::models::{Meeting, MeetingSort, MeetingSummary};

const MEETING_COLUMNS: &str = "m.id, m.organizer_id, m.title, m.description, m.category, \
     m.location, m.max_members, m.image_url, m.starts_at, m.created_at, m.updated_at";

const SUMMARY_COLUMNS: &str = "m.id, m.organizer_id, m.title, m.description, m.category, \
     m.location, m.max_members, m.image_url, m.starts_at, m.created_at, m.updated_at, \
     u.nickname, \
     (SELECT COUNT(*) FROM meeting_participants mp WHERE mp.meeting_id = m.id) + 1, \
     EXISTS (SELECT 1 FROM meeting_participants mp \
             WHERE mp.meeting_id = m.id AND mp.user_id = ?2)";

fn meeting_from_row(row: &libsql::Row) -> Result<Meeting, CoreError> {
    let image_url: Option<String> = row.get(7).ok();
    Ok(Meeting {
        id: row.get(0)?,
        organizer_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        location: row.get(5)?,
        max_members: row.get(6)?,
        image_url,
        starts_at: from_secs(row.get(8)?),
        created_at: from_secs(row.get(9)?),
        updated_at: from_secs(row.get(10)?),
    })
}

fn summary_from_row(row: &libsql::Row) -> Result<MeetingSummary, CoreError> {
    Ok(MeetingSummary {
        meeting: meeting_from_row(row)?,
        organizer_nickname: row.get(11)?,
        current_members: row.get(12)?,
        is_joined: row.get::<i64>(13)? != 0,
    })
}

impl Storage {
    pub async fn insert_meeting(&self, meeting: &Meeting) -> Result<(), CoreError> {
        self.conn()
            .execute(
                "INSERT INTO meetings (id, organizer_id, title, description, category, \
                 location, max_members, image_url, starts_at, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    meeting.id.as_str(),
                    meeting.organizer_id.as_str(),
                    meeting.title.as_str(),
                    meeting.description.as_str(),
                    meeting.category.as_str(),
                    meeting.location.as_str(),
                    meeting.max_members,
                    meeting.image_url.as_deref(),
                    to_secs(meeting.starts_at),
                    to_secs(meeting.created_at),
                    to_secs(meeting.updated_at)
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn get_meeting(&self, id: &str) -> Result<Option<Meeting>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {MEETING_COLUMNS} FROM meetings m WHERE m.id = ?1"),
                params![id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(meeting_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_meeting(&self, meeting: &Meeting) -> Result<(), CoreError> {
        self.conn()
            .execute(
                "UPDATE meetings SET title = ?2, description = ?3, category = ?4, \
                 location = ?5, max_members = ?6, image_url = ?7, starts_at = ?8, \
                 updated_at = ?9 WHERE id = ?1",
                params![
                    meeting.id.as_str(),
                    meeting.title.as_str(),
                    meeting.description.as_str(),
                    meeting.category.as_str(),
                    meeting.location.as_str(),
                    meeting.max_members,
                    meeting.image_url.as_deref(),
                    to_secs(meeting.starts_at),
                    to_secs(meeting.updated_at)
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn delete_meeting(&self, id: &str) -> Result<bool, CoreError> {
        let affected = self
            .conn()
            .execute("DELETE FROM meetings WHERE id = ?1", params![id])
            .await?;
        Ok(affected > 0)
    }

    /// Upcoming meetings (starting at or after `now`) with listing metadata.
    /// `viewer` drives the `is_joined` flag; pass `None` for anonymous
    /// listings.
    pub async fn list_upcoming_meetings(
        &self,
        now: DateTime<Utc>,
        sort: MeetingSort,
        viewer: Option<&str>,
    ) -> Result<Vec<MeetingSummary>, CoreError> {
        let order = match sort {
            MeetingSort::Latest => "m.created_at DESC",
            MeetingSort::Deadline => "m.starts_at ASC",
        };
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM meetings m \
             JOIN users u ON u.id = m.organizer_id \
             WHERE m.starts_at >= ?1 ORDER BY {order}"
        );
        let mut rows = self
            .conn()
            .query(&sql, params![to_secs(now), viewer])
            .await?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next().await? {
            meetings.push(summary_from_row(&row)?);
        }
        Ok(meetings)
    }

    pub async fn get_meeting_summary(
        &self,
        id: &str,
        viewer: Option<&str>,
    ) -> Result<Option<MeetingSummary>, CoreError> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM meetings m \
             JOIN users u ON u.id = m.organizer_id WHERE m.id = ?1"
        );
        let mut rows = self.conn().query(&sql, params![id, viewer]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(summary_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Candidates for similar-meeting matching: same category and location.
    /// Keyword filtering happens in the service layer.
    pub async fn meetings_in_category_location(
        &self,
        category: &str,
        location: &str,
    ) -> Result<Vec<MeetingSummary>, CoreError> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM meetings m \
             JOIN users u ON u.id = m.organizer_id \
             WHERE m.category = ?1 AND m.location = ?3"
        );
        // ?2 is the viewer slot baked into SUMMARY_COLUMNS.
        let mut rows = self
            .conn()
            .query(&sql, params![category, None::<&str>, location])
            .await?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next().await? {
            meetings.push(summary_from_row(&row)?);
        }
        Ok(meetings)
    }

    /// Members counting the organizer.
    pub async fn current_members(&self, meeting_id: &str) -> Result<i64, CoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT COUNT(*) + 1 FROM meeting_participants WHERE meeting_id = ?1",
                params![meeting_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::Storage("COUNT query returned no row".to_string()))?;
        Ok(row.get(0)?)
    }

    pub async fn is_participant(
        &self,
        meeting_id: &str,
        user_id: &str,
    ) -> Result<bool, CoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT 1 FROM meeting_participants WHERE meeting_id = ?1 AND user_id = ?2",
                params![meeting_id, user_id],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    pub async fn add_participant(
        &self,
        meeting_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.conn()
            .execute(
                "INSERT INTO meeting_participants (meeting_id, user_id, joined_at) \
                 VALUES (?1, ?2, ?3)",
                params![meeting_id, user_id, to_secs(at)],
            )
            .await?;
        Ok(())
    }

    /// Returns false when the user was not a participant.
    pub async fn remove_participant(
        &self,
        meeting_id: &str,
        user_id: &str,
    ) -> Result<bool, CoreError> {
        let affected = self
            .conn()
            .execute(
                "DELETE FROM meeting_participants WHERE meeting_id = ?1 AND user_id = ?2",
                params![meeting_id, user_id],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Participant nicknames in join order, organizer excluded.
    pub async fn participant_nicknames(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<String>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT u.nickname FROM users u \
                 JOIN meeting_participants mp ON mp.user_id = u.id \
                 WHERE mp.meeting_id = ?1 ORDER BY mp.joined_at ASC",
                params![meeting_id],
            )
            .await?;
        let mut nicknames = Vec::new();
        while let Some(row) = rows.next().await? {
            nicknames.push(row.get(0)?);
        }
        Ok(nicknames)
    }

    pub async fn meetings_hosted_by(&self, user_id: &str) -> Result<Vec<Meeting>, CoreError> {
        let sql = format!(
            "SELECT {MEETING_COLUMNS} FROM meetings m \
             WHERE m.organizer_id = ?1 ORDER BY m.starts_at DESC"
        );
        let mut rows = self.conn().query(&sql, params![user_id]).await?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next().await? {
            meetings.push(meeting_from_row(&row)?);
        }
        Ok(meetings)
    }

    /// Meetings the user joined as a participant; meetings they host are
    /// listed separately.
    pub async fn meetings_joined_by(&self, user_id: &str) -> Result<Vec<Meeting>, CoreError> {
        let sql = format!(
            "SELECT {MEETING_COLUMNS} FROM meetings m \
             JOIN meeting_participants mp ON mp.meeting_id = m.id \
             WHERE mp.user_id = ?1 AND m.organizer_id != ?1 \
             ORDER BY m.starts_at DESC"
        );
        let mut rows = self.conn().query(&sql, params![user_id]).await?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next().await? {
            meetings.push(meeting_from_row(&row)?);
        }
        Ok(meetings)
    }

    pub async fn count_meetings(&self) -> Result<i64, CoreError> {
        let mut rows = self.conn().query("SELECT COUNT(*) FROM meetings", ()).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::Storage("COUNT query returned no row".to_string()))?;
        Ok(row.get(0)?)
    }

    /// Category with the most meetings; ties break alphabetically.
    pub async fn popular_category(&self) -> Result<Option<String>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT category, COUNT(*) AS c FROM meetings \
                 GROUP BY category ORDER BY c DESC, category ASC LIMIT 1",
                (),
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}
