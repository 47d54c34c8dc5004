//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are Unix millis.

pub mod account;
pub mod dining_table;
pub mod feedback;
pub mod order;
pub mod payment;
pub mod product;
pub mod report;

// Re-exports
pub use account::*;
pub use dining_table::*;
pub use feedback::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use report::*;
