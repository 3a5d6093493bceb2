//! User rows.

use chrono::{DateTime, Utc};
use libsql::params;

use super::{Storage, from_secs, to_secs};
use crate::error::CoreError;
use crate::models::User;

const USER_COLUMNS: &str = "id, username, password_hash, name, nickname, email, \
     is_admin, is_active, failed_login_attempts, last_login_attempt, created_at, updated_at";

fn user_from_row(row: &libsql::Row) -> Result<User, CoreError> {
    let last_attempt: Option<i64> = row.get(9).ok();
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        name: row.get(3)?,
        nickname: row.get(4)?,
        email: row.get(5)?,
        is_admin: row.get::<i64>(6)? != 0,
        is_active: row.get::<i64>(7)? != 0,
        failed_login_attempts: row.get(8)?,
        last_login_attempt: last_attempt.map(from_secs),
        created_at: from_secs(row.get(10)?),
        updated_at: from_secs(row.get(11)?),
    })
}

impl Storage {
    pub async fn insert_user(&self, user: &User) -> Result<(), CoreError> {
        self.conn()
            .execute(
                &format!("INSERT INTO users ({USER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
                params![
                    user.id.as_str(),
                    user.username.as_str(),
                    user.password_hash.as_str(),
                    user.name.as_str(),
                    user.nickname.as_str(),
                    user.email.as_str(),
                    user.is_admin as i64,
                    user.is_active as i64,
                    user.failed_login_attempts,
                    user.last_login_attempt.map(to_secs),
                    to_secs(user.created_at),
                    to_secs(user.updated_at)
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                params![username],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Which unique field would a new (username, nickname, email) triple
    /// collide on? Rows belonging to `exclude_id` are ignored so profile
    /// updates can keep their own values.
    pub async fn find_duplicate_field(
        &self,
        username: Option<&str>,
        nickname: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<&str>,
    ) -> Result<Option<&'static str>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT username, nickname, email FROM users \
                 WHERE (username = ?1 OR nickname = ?2 OR email = ?3) AND id != ?4",
                params![username, nickname, email, exclude_id.unwrap_or("")],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            let row_username: String = row.get(0)?;
            let row_nickname: String = row.get(1)?;
            let row_email: String = row.get(2)?;
            if username == Some(row_username.as_str()) {
                return Ok(Some("username"));
            }
            if nickname == Some(row_nickname.as_str()) {
                return Ok(Some("nickname"));
            }
            if email == Some(row_email.as_str()) {
                return Ok(Some("email"));
            }
        }
        Ok(None)
    }

    /// Record a failed login: bump the counter, stamp the attempt and
    /// optionally deactivate the account.
    pub async fn record_login_failure(
        &self,
        user_id: &str,
        attempts: i64,
        deactivate: bool,
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.conn()
            .execute(
                "UPDATE users SET failed_login_attempts = ?2, last_login_attempt = ?3, \
                 is_active = CASE WHEN ?4 THEN 0 ELSE is_active END, updated_at = ?3 \
                 WHERE id = ?1",
                params![user_id, attempts, to_secs(at), deactivate as i64],
            )
            .await?;
        Ok(())
    }

    /// Successful login: clear the failure counter.
    pub async fn record_login_success(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.conn()
            .execute(
                "UPDATE users SET failed_login_attempts = 0, last_login_attempt = ?2, \
                 updated_at = ?2 WHERE id = ?1",
                params![user_id, to_secs(at)],
            )
            .await?;
        Ok(())
    }

    pub async fn update_user_profile(
        &self,
        user_id: &str,
        nickname: &str,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.conn()
            .execute(
                "UPDATE users SET nickname = ?2, email = ?3, updated_at = ?4 WHERE id = ?1",
                params![user_id, nickname, email, to_secs(at)],
            )
            .await?;
        Ok(())
    }

    pub async fn update_user_password(
        &self,
        user_id: &str,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.conn()
            .execute(
                "UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1",
                params![user_id, password_hash, to_secs(at)],
            )
            .await?;
        Ok(())
    }

    /// Returns false when no such user existed.
    pub async fn delete_user(&self, user_id: &str) -> Result<bool, CoreError> {
        let affected = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![user_id])
            .await?;
        Ok(affected > 0)
    }

    pub async fn count_users_since(&self, since: DateTime<Utc>) -> Result<i64, CoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT COUNT(*) FROM users WHERE created_at >= ?1",
                params![to_secs(since)],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| {
            CoreError::Storage("COUNT query returned no row".to_string())
        })?;
        Ok(row.get(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use crate::testutil::sample_user;
    use chrono::Duration;

    #[tokio::test]
    async fn insert_and_lookup() {
        let storage = Storage::connect(":memory:").await.unwrap();
        let user = sample_user("alice_01", "alice");
        storage.insert_user(&user).await.unwrap();

        let by_name = storage
            .find_user_by_username("alice_01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, user.id);
        assert_eq!(by_name.email, "alice_01@example.com");
        assert!(by_name.is_active);

        assert!(storage.find_user_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_detection_names_the_field() {
        let storage = Storage::connect(":memory:").await.unwrap();
        let user = sample_user("bob_0001", "bobby");
        storage.insert_user(&user).await.unwrap();

        let dup = storage
            .find_duplicate_field(Some("bob_0001"), Some("fresh"), Some("x@y.zz"), None)
            .await
            .unwrap();
        assert_eq!(dup, Some("username"));

        let dup = storage
            .find_duplicate_field(Some("fresh_01"), Some("bobby"), Some("x@y.zz"), None)
            .await
            .unwrap();
        assert_eq!(dup, Some("nickname"));

        // A user never collides with itself.
        let dup = storage
            .find_duplicate_field(None, Some("bobby"), None, Some(&user.id))
            .await
            .unwrap();
        assert_eq!(dup, None);
    }

    #[tokio::test]
    async fn login_failure_bookkeeping() {
        let storage = Storage::connect(":memory:").await.unwrap();
        let user = sample_user("carol_01", "carol");
        storage.insert_user(&user).await.unwrap();
        let now = Utc::now();

        storage
            .record_login_failure(&user.id, 4, false, now)
            .await
            .unwrap();
        let loaded = storage.find_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(loaded.failed_login_attempts, 4);
        assert!(loaded.is_active);

        storage
            .record_login_failure(&user.id, 5, true, now)
            .await
            .unwrap();
        let loaded = storage.find_user_by_id(&user.id).await.unwrap().unwrap();
        assert!(!loaded.is_active);

        storage.record_login_success(&user.id, now).await.unwrap();
        let loaded = storage.find_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(loaded.failed_login_attempts, 0);
    }

    #[tokio::test]
    async fn new_user_window() {
        let storage = Storage::connect(":memory:").await.unwrap();
        storage
            .insert_user(&sample_user("dave_001", "dave"))
            .await
            .unwrap();
        let week_ago = Utc::now() - Duration::days(7);
        assert_eq!(storage.count_users_since(week_ago).await.unwrap(), 1);
        let tomorrow = Utc::now() + Duration::days(1);
        assert_eq!(storage.count_users_since(tomorrow).await.unwrap(), 0);
    }
}
