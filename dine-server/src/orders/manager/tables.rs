//! Table-side operations that must stay consistent with orders

use super::{ManagerError, ManagerResult, OrdersManager, build_detail, load_order};
use super::cart::{add_item, normalize_add_quantity};
use crate::auth::StaffPrincipal;
use crate::db::repository::{RepoError, dining_table, order};
use crate::orders::occupancy;
use shared::models::{DiningTable, Order, OrderDetail, TableItemAdd, TableOverview};
use sqlx::SqliteConnection;

async fn load_table(conn: &mut SqliteConnection, table_id: i64) -> ManagerResult<DiningTable> {
    dining_table::find_by_id(&mut *conn, table_id)
        .await?
        .ok_or(ManagerError::TableNotFound(table_id))
}

impl OrdersManager {
    /// Delete a table no active order references
    pub async fn delete_table(&self, table_id: i64) -> ManagerResult<()> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        load_table(&mut tx, table_id).await?;
        if dining_table::count_active_orders(&mut *tx, table_id, None).await? > 0 {
            return Err(ManagerError::TableHasActiveOrders(table_id));
        }
        dining_table::delete(&mut tx, table_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(table_id, "Table deleted");
        Ok(())
    }

    /// Manual occupancy override
    ///
    /// Holding an idle table for walk-ins is always allowed; releasing is
    /// refused while any active order still references the table.
    pub async fn set_table_occupancy(
        &self,
        staff: &StaffPrincipal,
        table_id: i64,
        is_occupied: bool,
    ) -> ManagerResult<DiningTable> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        load_table(&mut tx, table_id).await?;

        if !is_occupied && dining_table::count_active_orders(&mut *tx, table_id, None).await? > 0 {
            return Err(ManagerError::TableHasActiveOrders(table_id));
        }
        dining_table::set_occupied(&mut *tx, table_id, is_occupied).await?;

        let table = load_table(&mut tx, table_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(table_id, is_occupied, staff_id = staff.id, "Table occupancy set manually");
        Ok(table)
    }

    /// Add an item to the order a table currently hosts, opening a walk-in
    /// order when the table has none
    pub async fn add_item_to_table(
        &self,
        staff: &StaffPrincipal,
        table_id: i64,
        payload: TableItemAdd,
    ) -> ManagerResult<OrderDetail> {
        let quantity = normalize_add_quantity(payload.quantity)?;
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        load_table(&mut tx, table_id).await?;

        let target = match order::find_current_for_table(&mut *tx, table_id).await? {
            Some(existing) => existing,
            None => {
                let created = order::create(&mut tx, None, Some(table_id)).await?;
                tracing::info!(order_id = created.id, table_id, staff_id = staff.id, "Walk-in order opened");
                created
            }
        };

        add_item(&mut tx, &target, payload.product_id, quantity).await?;
        occupancy::sync_table(&mut tx, table_id).await?;

        let updated = load_order(&mut tx, target.id).await?;
        let detail = build_detail(&mut tx, updated).await?;
        tx.commit().await.map_err(RepoError::from)?;
        Ok(detail)
    }

    /// Open an additional (split) order on a table, occupied or not
    pub async fn open_split_order(&self, staff: &StaffPrincipal, table_id: i64) -> ManagerResult<Order> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        load_table(&mut tx, table_id).await?;

        let created = order::create(&mut tx, None, Some(table_id)).await?;
        occupancy::sync_table(&mut tx, table_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id = created.id, table_id, staff_id = staff.id, "Split order opened");
        Ok(created)
    }

    /// A table with the order it currently hosts
    pub async fn table_overview(&self, table_id: i64) -> ManagerResult<TableOverview> {
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        let table = load_table(&mut conn, table_id).await?;
        let current_order = order::find_current_for_table(&mut *conn, table_id).await?;
        let total_amount = current_order.as_ref().map_or(0.0, |o| o.total_amount);

        Ok(TableOverview {
            table,
            current_order,
            total_amount,
        })
    }
}
