//! Core errors. Services and storage return these; the HTTP layer maps them
//! onto status codes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    /// Wrong username or password. Carries the attempts left before the
    /// account is deactivated, when that is known.
    #[error("invalid username or password")]
    Credentials { remaining_attempts: Option<i64> },

    #[error("account is deactivated")]
    AccountLocked,

    #[error("{field} is already in use")]
    Duplicate { field: &'static str },

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("forbidden")]
    Forbidden,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("object store error: {0}")]
    Object(String),

    #[error("agent error: {0}")]
    Agent(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

impl From<libsql::Error> for CoreError {
    fn from(err: libsql::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
