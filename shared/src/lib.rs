//! Shared types for the dine service
//!
//! Data models, the unified error system and small utilities used by the
//! server and by any Rust client of its HTTP API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
