//! Table occupancy maintenance
//!
//! Occupancy is derived: a table is occupied iff at least one order in an
//! active status references it. Instead of toggling the flag on each event,
//! every change that touches a table recounts inside the same transaction,
//! so split orders on one table release it only when the last one ends.

use crate::db::repository::{RepoError, RepoResult, sql_in_list};
use shared::models::OrderStatus;
use sqlx::SqliteConnection;

/// Recompute and store the occupancy flag of one table, returning the new value
pub async fn sync_table(conn: &mut SqliteConnection, table_id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let sql = format!(
        "UPDATE dining_table SET is_occupied = EXISTS(SELECT 1 FROM orders WHERE table_id = ?1 AND status IN ({})), updated_at = ?2 WHERE id = ?1 RETURNING is_occupied",
        sql_in_list(OrderStatus::ACTIVE.iter().map(|s| s.as_str()))
    );
    let occupied: Option<bool> = sqlx::query_scalar(&sql)
        .bind(table_id)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

    let occupied =
        occupied.ok_or_else(|| RepoError::NotFound(format!("Dining table {table_id} not found")))?;
    tracing::debug!(table_id, occupied, "Table occupancy synced");
    Ok(occupied)
}

/// Sync every distinct table in `tables`, skipping `None`
pub async fn sync_tables(
    conn: &mut SqliteConnection,
    tables: impl IntoIterator<Item = Option<i64>>,
) -> RepoResult<()> {
    let mut seen: Vec<i64> = Vec::new();
    for table_id in tables.into_iter().flatten() {
        if seen.contains(&table_id) {
            continue;
        }
        seen.push(table_id);
        sync_table(conn, table_id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{dining_table, order};
    use shared::models::DiningTableCreate;

    #[tokio::test]
    async fn test_sync_follows_active_orders() {
        let db = DbService::open_in_memory().await.unwrap();
        let table = dining_table::create(
            &db.pool,
            DiningTableCreate {
                name: "T1".into(),
                capacity: None,
            },
        )
        .await
        .unwrap();

        let mut conn = db.pool.acquire().await.unwrap();
        assert!(!sync_table(&mut conn, table.id).await.unwrap());

        let o = order::create(&mut conn, None, Some(table.id)).await.unwrap();
        assert!(sync_table(&mut conn, table.id).await.unwrap());

        order::transition(&mut *conn, o.id, &[OrderStatus::Pending], OrderStatus::Cancelled)
            .await
            .unwrap();
        assert!(!sync_table(&mut conn, table.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_sync_unknown_table() {
        let db = DbService::open_in_memory().await.unwrap();
        let mut conn = db.pool.acquire().await.unwrap();
        assert!(matches!(
            sync_table(&mut conn, 42).await,
            Err(RepoError::NotFound(_))
        ));
        sync_tables(&mut conn, [None, None]).await.unwrap();
    }
}
