//! Repository Module
//!
//! Free functions over SQLite. Single-statement functions accept any
//! executor (`&SqlitePool` or `&mut *tx`); multi-statement ones take a
//! connection so callers can run them inside a transaction.

// Catalog
pub mod dining_table;
pub mod product;

// Ordering
pub mod order;
pub mod payment;

// Accounts
pub mod customer;
pub mod otp;
pub mod staff;

// Feedback & reports
pub mod feedback;
pub mod report;

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// `'a', 'b'` list for a fixed set of enum literals
pub(crate) fn sql_in_list<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| format!("'{}'", v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_in_list() {
        assert_eq!(sql_in_list(["pending", "paid"]), "'pending', 'paid'");
        assert_eq!(sql_in_list(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_repo_error_to_app_error() {
        let err: AppError = RepoError::NotFound("Order 7".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: AppError = RepoError::Duplicate("name".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: AppError = RepoError::Validation("bad".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err: AppError = RepoError::Database("disk".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
