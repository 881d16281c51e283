//! Domain operations
//!
//! Each public function here is one unit of work: it validates its input,
//! performs every row mutation and notification inside a single transaction,
//! and commits. The HTTP handlers, HTML views and CLI all call these.
//!
//! Errors carry the user-facing message; callers display
//! `err.to_string()` as is.

pub mod admin;
pub mod driver;
pub mod messages;
pub mod notify;
pub mod resident;
pub mod seed;
pub mod user;

use crate::auth::{jwt::JwtError, password::PasswordError};
use crate::schedule::ScheduleError;

/// Error type for domain operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Referenced entity does not exist (or is not visible to the caller)
    #[error("{0}")]
    NotFound(String),

    /// Input failed validation or the entity is in the wrong state
    #[error("{0}")]
    Invalid(String),

    /// Uniqueness rule would be violated
    #[error("{0}")]
    Conflict(String),

    /// Caller does not own the entity
    #[error("{0}")]
    Forbidden(String),

    /// Bad credentials or token
    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ServiceError::Invalid(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ServiceError::Conflict(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ServiceError::Forbidden(msg.into())
    }

    /// Whether the message is safe to show to an end user
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            ServiceError::Database(_) | ServiceError::Password(_) | ServiceError::Token(_)
        )
    }
}

impl From<ScheduleError> for ServiceError {
    fn from(err: ScheduleError) -> Self {
        ServiceError::Invalid(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rewrites a unique violation into a `Conflict` with the given message
pub(crate) fn unique_as_conflict(err: sqlx::Error, msg: &str) -> ServiceError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => ServiceError::conflict(msg),
        _ => ServiceError::Database(err),
    }
}

/// Rewrites a foreign key violation into a `Conflict` with the given message
pub(crate) fn foreign_key_as_conflict(err: sqlx::Error, msg: &str) -> ServiceError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => ServiceError::conflict(msg),
        _ => ServiceError::Database(err),
    }
}

/// Column widths in the schema; longer text is refused before any write
pub const MAX_USERNAME_LEN: usize = 80;
pub const MAX_NAME_LEN: usize = 120;
pub const MAX_ETA_LEN: usize = 20;
pub const MAX_STATUS_LEN: usize = 120;

/// Trims a name and rejects it when blank or wider than `max` characters
pub(crate) fn required(value: &str, what: &str, max: usize) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::invalid(format!("{} cannot be empty.", what)));
    }
    check_length(Some(trimmed), what, max)?;
    Ok(trimmed.to_string())
}

/// Rejects text longer than `max` characters
pub(crate) fn check_length(value: Option<&str>, what: &str, max: usize) -> ServiceResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(ServiceError::invalid(format!(
            "{} must be at most {} characters.",
            what, max
        ))),
        _ => Ok(()),
    }
}

/// Treats blank optional text as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
