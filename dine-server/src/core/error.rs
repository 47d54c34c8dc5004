use shared::AppError;
use thiserror::Error;

/// Startup and lifecycle errors (request errors use [`AppError`])
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AppError> for ServerError {
    fn from(err: AppError) -> Self {
        ServerError::Database(err.message)
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
