//! Database access for the pre-launch store.
//!
//! All reads and writes to the embedded SQLite file go through the
//! repositories here; the maintenance commands open the same file
//! out-of-process through the same types.

pub mod diesel_models;
pub mod diesel_pool;
mod diesel_generation;
mod diesel_signup;
pub mod migrations;

pub use diesel_generation::{BlueprintCount, DieselGenerationRepository};
pub use diesel_signup::DieselSignupRepository;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Store failure, split so callers can map duplicates to user errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A UNIQUE constraint rejected the write (duplicate email, or a
    /// second generation for the same IP and day).
    #[error("unique constraint violation")]
    UniqueViolation,

    /// Any other Diesel/SQLite failure.
    #[error("database error: {0}")]
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => RepositoryError::UniqueViolation,
            other => RepositoryError::Database(other),
        }
    }
}

impl RepositoryError {
    /// True when the failure was a uniqueness conflict.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, RepositoryError::UniqueViolation)
    }
}

/// Parse an RFC 3339 timestamp stored as TEXT, defaulting to the epoch on
/// malformed data rather than failing a read.
pub fn parse_datetime(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
