//! Shared database types for Matchday
//!
//! This module provides common database-related types used by the league store.

use crate::error::Error;
use thiserror::Error;

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists ({0})")]
    AlreadyExists(String),

    /// A foreign key no longer resolves, or a delete would orphan rows
    #[error("Referenced record is missing or still in use ({0})")]
    InvalidReference(String),

    #[error("Database connection error: {0}")]
    Connection(sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for RepositoryError {
    /// Unique and foreign key violations carry the constraint name, so rules
    /// enforced by the schema read as conflicts upstream.
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return RepositoryError::AlreadyExists(constraint);
            }
            if db_err.is_foreign_key_violation() {
                let constraint = db_err.constraint().unwrap_or("foreign_key").to_string();
                return RepositoryError::InvalidReference(constraint);
            }
        }
        RepositoryError::Connection(err)
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::AlreadyExists(constraint) => {
                Error::Conflict(format!("Record already exists ({})", constraint))
            }
            RepositoryError::InvalidReference(constraint) => Error::Conflict(format!(
                "Referenced record is missing or still in use ({})",
                constraint
            )),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Validation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_maps_to_conflict() {
        let err: Error = RepositoryError::AlreadyExists("results_fixture_id_key".to_string()).into();
        assert!(matches!(err, Error::Conflict(msg) if msg.contains("results_fixture_id_key")));
    }

    #[test]
    fn test_invalid_reference_maps_to_conflict() {
        let err: Error =
            RepositoryError::InvalidReference("goals_player_id_fkey".to_string()).into();
        assert!(matches!(err, Error::Conflict(msg) if msg.contains("goals_player_id_fkey")));
    }

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err: Error = RepositoryError::NotFound.into();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_non_database_sqlx_error_is_connection() {
        let err = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Connection(_)));
    }
}
