//! Unified error system
//!
//! - [`ErrorCode`]: standardized error codes for all error types
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: rich error type with codes, messages, and details
//! - [`ApiResponse`]: unified API response format
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::TableOccupied)
//!     .with_detail("table_id", 4);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(7002));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
