//! Order Model
//!
//! Order status lifecycle:
//!
//! ```text
//! pending ──place──▶ completed ──request──▶ payment_pending ──settle──▶ paid
//!    ▲                  │                        │
//!    └──── reopen ──────┴────────────────────────┘
//!
//! pending | completed | payment_pending ──cancel──▶ cancelled
//! ```
//!
//! `paid` and `cancelled` are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::payment::{Payment, PaymentMethod};

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    PaymentPending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Statuses that hold a table
    pub const ACTIVE: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Completed,
        OrderStatus::PaymentPending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::PaymentPending => "payment_pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Completed)
                | (Pending, PaymentPending)
                | (Pending, Cancelled)
                | (Completed, Pending)
                | (Completed, PaymentPending)
                | (Completed, Cancelled)
                | (PaymentPending, Pending)
                | (PaymentPending, Paid)
                | (PaymentPending, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order aggregate root
///
/// `total_amount` is a cache of `Σ quantity × unit_price` over the order's
/// items, recomputed on every item mutation and status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Owning customer; `None` for walk-in orders opened by staff
    pub customer_id: Option<i64>,
    pub table_id: Option<i64>,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Product price captured when the item was first added
    pub unit_price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Line item joined with its product name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemDetail {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Full order view used by both customer and staff screens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    pub table_name: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub payment: Option<Payment>,
}

/// Add a product to the caller's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemAdd {
    pub product_id: i64,
    /// Missing or non-positive quantities count as 1
    pub quantity: Option<i64>,
}

/// Change the quantity of a cart line; 0 or less removes it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub quantity: i64,
}

/// Submit the cart with a table selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: Option<i64>,
    pub table_id: Option<i64>,
}

/// Generic status change from the machine API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    /// Used when the target is `paid`; defaults to cash
    pub method: Option<PaymentMethod>,
    pub card_number: Option<String>,
}

/// Staff adds an item to whatever order a table currently hosts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableItemAdd {
    pub product_id: i64,
    pub quantity: Option<i64>,
}

/// Order listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Completed.is_active());
        assert!(OrderStatus::PaymentPending.is_active());
        assert!(!OrderStatus::Paid.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::PaymentPending,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Paid.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_paid_only_from_payment_pending() {
        assert!(OrderStatus::PaymentPending.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Paid));
    }

    #[test]
    fn test_cancel_from_every_active_status() {
        for from in OrderStatus::ACTIVE {
            assert!(from.can_transition_to(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::PaymentPending).unwrap();
        assert_eq!(json, "\"payment_pending\"");
        let status: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
        assert_eq!(OrderStatus::PaymentPending.to_string(), "payment_pending");
    }

    #[test]
    fn test_order_detail_flattens_order() {
        let detail = OrderDetail {
            order: Order {
                id: 3,
                customer_id: Some(1),
                table_id: None,
                status: OrderStatus::Pending,
                total_amount: 120.0,
                created_at: 0,
                updated_at: 0,
            },
            items: vec![],
            table_name: None,
            customer_name: Some("Ada".into()),
            customer_email: None,
            payment: None,
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["status"], "pending");
        assert_eq!(value["total_amount"], 120.0);
    }
}
