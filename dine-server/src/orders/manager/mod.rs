//! OrdersManager - the order/table coordinator
//!
//! Every public operation runs in a single SQLite transaction:
//!
//! ```text
//! operation(principal, args)
//!     ├─ 1. Begin transaction
//!     ├─ 2. Load order / table / product rows
//!     ├─ 3. Check ownership and the status state machine
//!     ├─ 4. Mutate line items, recompute the cached total
//!     ├─ 5. Compare-and-set the status (`UPDATE … WHERE status IN (…)`)
//!     ├─ 6. Recount occupancy of every table touched
//!     └─ 7. Commit (or roll back on any error)
//! ```
//!
//! A compare-and-set that affects no row means another request changed the
//! order first; it is reported as a conflict and the transaction rolls back.

mod cart;
mod error;
mod placement;
mod settlement;
mod tables;

pub use error::*;
pub use settlement::{card_last4, transaction_id};

use crate::auth::Principal;
use crate::db::repository::{RepoError, customer, dining_table, order, payment};
use crate::orders::money;
use shared::models::{Order, OrderDetail, OrderQuery, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};

/// Order/table coordinator
#[derive(Clone)]
pub struct OrdersManager {
    pool: SqlitePool,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("pool", &"<SqlitePool>")
            .finish()
    }
}

impl OrdersManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ========== Views ==========

    /// Full view of one order, for its owner or any staff member
    pub async fn order_detail(&self, principal: &Principal, order_id: i64) -> ManagerResult<OrderDetail> {
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        let order = load_order(&mut conn, order_id).await?;
        ensure_access(principal, &order)?;
        build_detail(&mut conn, order).await
    }

    /// Orders owned by a customer, newest first
    pub async fn order_history(&self, customer_id: i64) -> ManagerResult<Vec<Order>> {
        Ok(order::find_by_customer(&self.pool, customer_id).await?)
    }

    /// Staff listing with optional status/table filters
    pub async fn list_orders(&self, query: &OrderQuery) -> ManagerResult<Vec<Order>> {
        Ok(order::find_all(&self.pool, query).await?)
    }

    /// Orders in any active status
    pub async fn active_orders(&self) -> ManagerResult<Vec<Order>> {
        Ok(order::find_by_statuses(&self.pool, &OrderStatus::ACTIVE).await?)
    }

    pub async fn payment_pending_orders(&self) -> ManagerResult<Vec<Order>> {
        Ok(order::find_by_statuses(&self.pool, &[OrderStatus::PaymentPending]).await?)
    }

    /// All orders ever placed on a table
    pub async fn orders_for_table(&self, table_id: i64) -> ManagerResult<Vec<Order>> {
        dining_table::find_by_id(&self.pool, table_id)
            .await?
            .ok_or(ManagerError::TableNotFound(table_id))?;
        Ok(order::find_by_table(&self.pool, table_id).await?)
    }
}

// ========== Shared helpers (run on the caller's transaction) ==========

pub(crate) async fn load_order(conn: &mut SqliteConnection, order_id: i64) -> ManagerResult<Order> {
    order::find_by_id(&mut *conn, order_id)
        .await?
        .ok_or(ManagerError::OrderNotFound(order_id))
}

/// Staff may touch any order; a customer only their own
pub(crate) fn ensure_access(principal: &Principal, order: &Order) -> ManagerResult<()> {
    match principal {
        Principal::Staff(_) => Ok(()),
        Principal::Customer(c) if order.customer_id == Some(c.id) => Ok(()),
        Principal::Customer(_) => Err(ManagerError::NotOrderOwner(order.id)),
    }
}

/// Rejects terminal orders with the matching error
pub(crate) fn ensure_not_terminal(order: &Order) -> ManagerResult<()> {
    match order.status {
        OrderStatus::Paid => Err(ManagerError::OrderAlreadyPaid(order.id)),
        OrderStatus::Cancelled => Err(ManagerError::OrderAlreadyCancelled(order.id)),
        _ => Ok(()),
    }
}

/// Recompute `total_amount` from the current line items; returns (total, item count)
pub(crate) async fn recompute_total(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> ManagerResult<(f64, usize)> {
    let items = order::items(&mut *conn, order_id).await?;
    let total = money::order_total(&items);
    order::set_total(&mut *conn, order_id, total).await?;
    Ok((total, items.len()))
}

/// Compare-and-set along the state machine
///
/// Only sources that may legally reach `to` are accepted; losing the race is
/// reported as a concurrent update.
pub(crate) async fn apply_transition(
    conn: &mut SqliteConnection,
    current: &Order,
    to: OrderStatus,
) -> ManagerResult<()> {
    if !current.status.can_transition_to(to) {
        return Err(ManagerError::InvalidTransition {
            id: current.id,
            from: current.status,
            to,
        });
    }
    let applied = order::transition(&mut *conn, current.id, &[current.status], to).await?;
    if !applied {
        return Err(ManagerError::ConcurrentUpdate(current.id));
    }
    tracing::info!(
        order_id = current.id,
        from = %current.status,
        to = %to,
        "Order status changed"
    );
    Ok(())
}

pub(crate) async fn build_detail(conn: &mut SqliteConnection, order: Order) -> ManagerResult<OrderDetail> {
    let items = order::item_details(&mut *conn, order.id).await?;
    let table_name = match order.table_id {
        Some(id) => dining_table::find_by_id(&mut *conn, id).await?.map(|t| t.name),
        None => None,
    };
    let owner = match order.customer_id {
        Some(id) => customer::find_by_id(&mut *conn, id).await?,
        None => None,
    };
    let payment = payment::find_by_order(&mut *conn, order.id).await?;

    Ok(OrderDetail {
        order,
        items,
        table_name,
        customer_name: owner.as_ref().map(|c| c.name.clone()),
        customer_email: owner.map(|c| c.email),
        payment,
    })
}

#[cfg(test)]
mod tests;
