//! Dining Table Model

use serde::{Deserialize, Serialize};

use super::order::Order;

/// Dining table entity
///
/// `is_occupied` is maintained by the order coordinator: it is true while at
/// least one active order references the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub is_occupied: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub name: String,
    pub capacity: Option<i32>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub name: Option<String>,
    pub capacity: Option<i32>,
}

/// Manual occupancy change (walk-in hold / release)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub is_occupied: bool,
}

/// Table occupancy counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TableStats {
    pub total: i64,
    pub occupied: i64,
    pub available: i64,
}

/// A table together with the order it currently hosts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOverview {
    pub table: DiningTable,
    pub current_order: Option<Order>,
    pub total_amount: f64,
}
