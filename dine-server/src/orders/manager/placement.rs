//! Order placement: bind the cart to a table and send it to the kitchen

use super::{
    ManagerError, ManagerResult, OrdersManager, apply_transition, build_detail, ensure_access,
    load_order, recompute_total,
};
use crate::auth::{CustomerPrincipal, Principal};
use crate::db::repository::{RepoError, dining_table, order};
use crate::orders::occupancy;
use shared::models::{Order, OrderDetail, OrderStatus, PlaceOrder};
use sqlx::SqliteConnection;

impl OrdersManager {
    /// Place the customer's cart (or the order named in `payload`)
    ///
    /// The order moves `pending → completed`; placing a `completed` order
    /// again only rebinds the table. The target table must not be held by
    /// anyone else.
    pub async fn place_order(
        &self,
        customer: &CustomerPrincipal,
        payload: PlaceOrder,
    ) -> ManagerResult<OrderDetail> {
        let principal = Principal::Customer(customer.clone());
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        let current = match payload.order_id {
            Some(id) => load_order(&mut tx, id).await?,
            None => order::find_latest_active_for_customer(&mut *tx, customer.id)
                .await?
                .ok_or(ManagerError::NoActiveCart)?,
        };
        ensure_access(&principal, &current)?;

        match current.status {
            OrderStatus::Pending | OrderStatus::Completed => {}
            OrderStatus::PaymentPending => {
                return Err(ManagerError::OrderNotEditable {
                    id: current.id,
                    status: current.status,
                });
            }
            OrderStatus::Paid => return Err(ManagerError::OrderAlreadyPaid(current.id)),
            OrderStatus::Cancelled => return Err(ManagerError::OrderAlreadyCancelled(current.id)),
        }

        let (total, item_count) = recompute_total(&mut tx, current.id).await?;
        if item_count == 0 {
            return Err(ManagerError::OrderEmpty(current.id));
        }

        let table_id = payload
            .table_id
            .or(current.table_id)
            .ok_or(ManagerError::TableRequired)?;
        bind_table(&mut tx, &current, table_id).await?;

        if current.status == OrderStatus::Pending {
            apply_transition(&mut tx, &current, OrderStatus::Completed).await?;
        }
        occupancy::sync_tables(&mut tx, [current.table_id, Some(table_id)]).await?;

        let placed = load_order(&mut tx, current.id).await?;
        let detail = build_detail(&mut tx, placed).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id = current.id,
            customer_id = customer.id,
            table_id,
            total,
            "Order placed"
        );
        Ok(detail)
    }
}

/// Point `order` at `table_id`, refusing a table held by another party
async fn bind_table(conn: &mut SqliteConnection, order: &Order, table_id: i64) -> ManagerResult<()> {
    let table = dining_table::find_by_id(&mut *conn, table_id)
        .await?
        .ok_or(ManagerError::TableNotFound(table_id))?;

    if order.table_id == Some(table_id) {
        return Ok(());
    }

    let others = dining_table::count_active_orders(&mut *conn, table_id, Some(order.id)).await?;
    if table.is_occupied || others > 0 {
        return Err(ManagerError::TableOccupied(table_id));
    }

    order::set_table(&mut *conn, order.id, Some(table_id)).await?;
    Ok(())
}
