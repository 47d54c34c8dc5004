//! Payment Model
//!
//! A payment row is written exactly once, when an order is settled, and is
//! never updated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::order::Order;

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status
///
/// Only settled payments are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    #[default]
    Completed,
}

/// Payment record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: String,
    /// Last four digits for card payments
    pub card_last4: Option<String>,
    /// Staff account that settled the order
    pub recorded_by: Option<i64>,
    pub created_at: i64,
}

/// Settle an order at the till
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub method: PaymentMethod,
    pub card_number: Option<String>,
    /// Invoice recipient; falls back to the owning customer's email
    pub invoice_email: Option<String>,
}

/// Outcome of a settlement
///
/// `warnings` lists follow-up failures (invoice delivery) that did not undo
/// the payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub order: Order,
    pub payment: Payment,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Re-send the invoice of a paid order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub email: Option<String>,
}

/// Invoice delivery outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDelivery {
    pub order_id: i64,
    pub recipient: Option<String>,
    pub delivered: bool,
    #[serde(default)]
    pub warnings: Vec<String>,
}
