//! Orders and the tables they occupy
//!
//! - **manager**: `OrdersManager`, the coordinator owning every status change
//! - **occupancy**: derived table occupancy, recounted per transaction
//! - **money**: decimal arithmetic for totals
//!
//! # Data Flow
//!
//! 1. API handler decodes the principal and the payload
//! 2. `OrdersManager` opens a SQLite transaction
//! 3. Rows are checked against the status state machine
//! 4. Items and totals are written, the status is compare-and-set
//! 5. Occupancy of every touched table is recounted
//! 6. The transaction commits and the handler renders the result

pub mod manager;
pub mod money;
pub mod occupancy;

pub use manager::{ManagerError, ManagerResult, OrdersManager};
