//! Utility Module
//!
//! Logging setup, input validation and the re-exported error types.

pub mod logger;
pub mod validation;

// Unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
