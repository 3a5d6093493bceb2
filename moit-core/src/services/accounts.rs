//! Account lifecycle: signup, login with lockout, profile changes, deletion.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use tracing::warn;

use crate::error::CoreError;
use crate::models::User;
use crate::storage::Storage;
use crate::validate;

/// Failures allowed before the account is deactivated.
pub const MAX_LOGIN_ATTEMPTS: i64 = 5;

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub name: String,
    pub nickname: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub fn hash_password(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Register a new account. Field rules and uniqueness are checked here; the
/// returned error names the offending field.
pub async fn signup(storage: &Storage, account: NewAccount) -> Result<User, CoreError> {
    validate::username(&account.username)?;
    validate::password(&account.password)?;
    validate::name(&account.name)?;
    validate::nickname(&account.nickname)?;
    validate::email(&account.email)?;

    if let Some(field) = storage
        .find_duplicate_field(
            Some(&account.username),
            Some(&account.nickname),
            Some(&account.email),
            None,
        )
        .await?
    {
        return Err(CoreError::Duplicate { field });
    }

    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: account.username,
        password_hash: hash_password(&account.password)?,
        name: account.name,
        nickname: account.nickname,
        email: account.email,
        is_admin: false,
        is_active: true,
        failed_login_attempts: 0,
        last_login_attempt: None,
        created_at: now,
        updated_at: now,
    };
    storage.insert_user(&user).await?;
    Ok(user)
}

/// Check credentials. Each failure counts toward the lockout; the fifth
/// deactivates the account. A success resets the counter.
pub async fn login(storage: &Storage, username: &str, password: &str) -> Result<User, CoreError> {
    let Some(user) = storage.find_user_by_username(username).await? else {
        return Err(CoreError::Credentials {
            remaining_attempts: None,
        });
    };

    if !user.is_active {
        return Err(CoreError::AccountLocked);
    }

    let now = Utc::now();
    if !verify_password(password, &user.password_hash) {
        let attempts = user.failed_login_attempts + 1;
        let deactivate = attempts >= MAX_LOGIN_ATTEMPTS;
        storage
            .record_login_failure(&user.id, attempts, deactivate, now)
            .await?;
        if deactivate {
            warn!(username, "account deactivated after repeated login failures");
            return Err(CoreError::AccountLocked);
        }
        return Err(CoreError::Credentials {
            remaining_attempts: Some(MAX_LOGIN_ATTEMPTS - attempts),
        });
    }

    storage.record_login_success(&user.id, now).await?;
    Ok(User {
        failed_login_attempts: 0,
        last_login_attempt: Some(now),
        updated_at: now,
        ..user
    })
}

/// Apply profile changes: nickname/email swaps re-check uniqueness, password
/// changes require the current password.
pub async fn update_profile(
    storage: &Storage,
    user_id: &str,
    changes: ProfileChanges,
) -> Result<User, CoreError> {
    let user = storage
        .find_user_by_id(user_id)
        .await?
        .ok_or(CoreError::NotFound("user"))?;

    let nickname = changes.nickname.unwrap_or_else(|| user.nickname.clone());
    let email = changes.email.unwrap_or_else(|| user.email.clone());
    let nickname_changed = nickname != user.nickname;
    let email_changed = email != user.email;

    if nickname_changed {
        validate::nickname(&nickname)?;
    }
    if email_changed {
        validate::email(&email)?;
    }
    if nickname_changed || email_changed {
        if let Some(field) = storage
            .find_duplicate_field(
                None,
                nickname_changed.then_some(nickname.as_str()),
                email_changed.then_some(email.as_str()),
                Some(user_id),
            )
            .await?
        {
            return Err(CoreError::Duplicate { field });
        }
        storage
            .update_user_profile(user_id, &nickname, &email, Utc::now())
            .await?;
    }

    if let Some(new_password) = changes.new_password {
        let current = changes
            .current_password
            .ok_or_else(|| CoreError::validation("current password is required"))?;
        if !verify_password(&current, &user.password_hash) {
            return Err(CoreError::Credentials {
                remaining_attempts: None,
            });
        }
        validate::password(&new_password)?;
        storage
            .update_user_password(user_id, &hash_password(&new_password)?, Utc::now())
            .await?;
    }

    storage
        .find_user_by_id(user_id)
        .await?
        .ok_or(CoreError::NotFound("user"))
}

/// Remove an account. Allowed for the account owner and for admins.
pub async fn delete_account(
    storage: &Storage,
    caller: &User,
    target_id: &str,
) -> Result<(), CoreError> {
    if caller.id != target_id && !caller.is_admin() {
        return Err(CoreError::Forbidden);
    }
    if storage.delete_user(target_id).await? {
        Ok(())
    } else {
        Err(CoreError::NotFound("user"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str, nickname: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            password: "hunter2secret".to_string(),
            name: "Tester".to_string(),
            nickname: nickname.to_string(),
            email: format!("{username}@example.com"),
        }
    }

    #[tokio::test]
    async fn signup_then_login() {
        let storage = Storage::connect(":memory:").await.unwrap();
        let user = signup(&storage, account("alice_01", "alice")).await.unwrap();
        assert!(user.password_hash.starts_with("$argon2"));

        let logged_in = login(&storage, "alice_01", "hunter2secret").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let err = login(&storage, "alice_01", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Credentials {
                remaining_attempts: Some(4)
            }
        ));
    }

    #[tokio::test]
    async fn signup_reports_conflicting_field() {
        let storage = Storage::connect(":memory:").await.unwrap();
        signup(&storage, account("alice_01", "alice")).await.unwrap();

        let mut dup = account("alice_01", "other");
        dup.email = "fresh@example.com".to_string();
        let err = signup(&storage, dup).await.unwrap_err();
        assert!(matches!(err, CoreError::Duplicate { field: "username" }));

        let mut dup = account("bobby_01", "alice");
        dup.email = "fresh2@example.com".to_string();
        let err = signup(&storage, dup).await.unwrap_err();
        assert!(matches!(err, CoreError::Duplicate { field: "nickname" }));
    }

    #[tokio::test]
    async fn fifth_failure_locks_the_account() {
        let storage = Storage::connect(":memory:").await.unwrap();
        signup(&storage, account("carol_01", "carol")).await.unwrap();

        for expected_remaining in (1..=4).rev() {
            let err = login(&storage, "carol_01", "nope-nope").await.unwrap_err();
            assert!(matches!(
                err,
                CoreError::Credentials { remaining_attempts: Some(r) } if r == expected_remaining
            ));
        }
        let err = login(&storage, "carol_01", "nope-nope").await.unwrap_err();
        assert!(matches!(err, CoreError::AccountLocked));

        // Even the right password is refused once locked.
        let err = login(&storage, "carol_01", "hunter2secret").await.unwrap_err();
        assert!(matches!(err, CoreError::AccountLocked));
    }

    #[tokio::test]
    async fn success_resets_the_counter() {
        let storage = Storage::connect(":memory:").await.unwrap();
        signup(&storage, account("dave_001", "dave")).await.unwrap();

        login(&storage, "dave_001", "bad-guess").await.unwrap_err();
        login(&storage, "dave_001", "bad-guess").await.unwrap_err();
        login(&storage, "dave_001", "hunter2secret").await.unwrap();

        let err = login(&storage, "dave_001", "bad-guess").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Credentials {
                remaining_attempts: Some(4)
            }
        ));
    }

    #[tokio::test]
    async fn profile_update_checks_password_and_uniqueness() {
        let storage = Storage::connect(":memory:").await.unwrap();
        let user = signup(&storage, account("erin_001", "erin")).await.unwrap();
        signup(&storage, account("frank_01", "frank")).await.unwrap();

        let err = update_profile(
            &storage,
            &user.id,
            ProfileChanges {
                nickname: Some("frank".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::Duplicate { field: "nickname" }));

        let err = update_profile(
            &storage,
            &user.id,
            ProfileChanges {
                new_password: Some("newsecret".to_string()),
                current_password: Some("wrong".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::Credentials { .. }));

        update_profile(
            &storage,
            &user.id,
            ProfileChanges {
                nickname: Some("erin2".to_string()),
                new_password: Some("newsecret".to_string()),
                current_password: Some("hunter2secret".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let logged_in = login(&storage, "erin_001", "newsecret").await.unwrap();
        assert_eq!(logged_in.nickname, "erin2");
    }

    #[tokio::test]
    async fn deletion_is_self_or_admin() {
        let storage = Storage::connect(":memory:").await.unwrap();
        let alice = signup(&storage, account("alice_01", "alice")).await.unwrap();
        let bob = signup(&storage, account("bobby_01", "bobby")).await.unwrap();

        let err = delete_account(&storage, &bob, &alice.id).await.unwrap_err();
        assert!(matches!(err, CoreError::Forbidden));

        delete_account(&storage, &alice, &alice.id).await.unwrap();
        assert!(storage.find_user_by_id(&alice.id).await.unwrap().is_none());
    }
}
