//! Field validation for account data.
//!
//! Rules match the registration form: usernames are at least 4 word
//! characters, passwords at least 6 characters, names 2..=20, nicknames
//! 2..=15, and emails must look like an address.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CoreError;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn username(value: &str) -> Result<(), CoreError> {
    if value.chars().count() >= 4 && USERNAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::validation(
            "username must be at least 4 characters of letters, digits or underscores",
        ))
    }
}

pub fn password(value: &str) -> Result<(), CoreError> {
    if value.chars().count() >= 6 {
        Ok(())
    } else {
        Err(CoreError::validation(
            "password must be at least 6 characters",
        ))
    }
}

pub fn name(value: &str) -> Result<(), CoreError> {
    let len = value.chars().count();
    if (2..=20).contains(&len) {
        Ok(())
    } else {
        Err(CoreError::validation("name must be 2 to 20 characters"))
    }
}

pub fn nickname(value: &str) -> Result<(), CoreError> {
    let len = value.chars().count();
    if (2..=15).contains(&len) {
        Ok(())
    } else {
        Err(CoreError::validation("nickname must be 2 to 15 characters"))
    }
}

pub fn email(value: &str) -> Result<(), CoreError> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::validation("email address is not valid"))
    }
}
