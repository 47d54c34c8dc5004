//! Revenue report and dashboard models

use serde::{Deserialize, Serialize};

use super::dining_table::TableStats;
use super::order::Order;
use super::payment::PaymentMethod;

/// Count and sum of payments for one method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MethodBreakdown {
    pub method: PaymentMethod,
    pub count: i64,
    pub amount: f64,
}

/// Revenue over completed payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub today_revenue: f64,
    pub month_revenue: f64,
    pub payment_count: i64,
    pub by_method: Vec<MethodBreakdown>,
}

/// One payment as listed in reports, with its order's table and customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentLine {
    pub payment_id: i64,
    pub order_id: i64,
    pub table_name: Option<String>,
    pub customer_name: Option<String>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub transaction_id: String,
    pub created_at: i64,
}

/// Time window for payment listings and exports (Unix millis, `to` exclusive)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Text,
}

/// Export request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportExport {
    #[serde(default)]
    pub format: ReportFormat,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// Staff dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub active_orders: Vec<Order>,
    pub payment_pending_orders: Vec<Order>,
    pub table_stats: TableStats,
    pub today_revenue: f64,
}
