//! Revenue aggregates over completed payments

use super::RepoResult;
use shared::models::{MethodBreakdown, PaymentLine};
use sqlx::SqlitePool;

/// Sum and count of completed payments created at or after `since`
pub async fn revenue_since(pool: &SqlitePool, since: Option<i64>) -> RepoResult<(f64, i64)> {
    let row: (f64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0.0), COUNT(*) FROM payment WHERE status = 'completed' AND (?1 IS NULL OR created_at >= ?1)",
    )
    .bind(since)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn by_method(pool: &SqlitePool) -> RepoResult<Vec<MethodBreakdown>> {
    let rows = sqlx::query_as::<_, MethodBreakdown>(
        "SELECT method, COUNT(*) AS count, COALESCE(SUM(amount), 0.0) AS amount FROM payment WHERE status = 'completed' GROUP BY method ORDER BY method",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Completed payments in `[from, to)` joined with table and customer names, oldest first
pub async fn payment_lines(
    pool: &SqlitePool,
    from: Option<i64>,
    to: Option<i64>,
) -> RepoResult<Vec<PaymentLine>> {
    let rows = sqlx::query_as::<_, PaymentLine>(
        "SELECT p.id AS payment_id, p.order_id, t.name AS table_name, c.name AS customer_name, p.amount, p.method, p.transaction_id, p.created_at FROM payment p JOIN orders o ON o.id = p.order_id LEFT JOIN dining_table t ON t.id = o.table_id LEFT JOIN customer c ON c.id = o.customer_id WHERE p.status = 'completed' AND (?1 IS NULL OR p.created_at >= ?1) AND (?2 IS NULL OR p.created_at < ?2) ORDER BY p.created_at, p.id",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{order, payment};
    use shared::models::PaymentMethod;

    async fn paid_order(db: &DbService, amount: f64, method: PaymentMethod, tx_id: &str) -> i64 {
        let mut conn = db.pool.acquire().await.unwrap();
        let created = order::create(&mut conn, None, None).await.unwrap();
        payment::insert(
            &mut conn,
            payment::NewPayment {
                order_id: created.id,
                amount,
                method,
                transaction_id: tx_id.into(),
                card_last4: None,
                recorded_by: None,
            },
        )
        .await
        .unwrap();
        created.id
    }

    #[tokio::test]
    async fn test_revenue_and_breakdown() {
        let db = DbService::open_in_memory().await.unwrap();
        assert_eq!(revenue_since(&db.pool, None).await.unwrap(), (0.0, 0));

        paid_order(&db, 10.0, PaymentMethod::Cash, "TX-1").await;
        paid_order(&db, 20.5, PaymentMethod::Card, "TX-2").await;
        paid_order(&db, 4.5, PaymentMethod::Cash, "TX-3").await;

        let (total, count) = revenue_since(&db.pool, None).await.unwrap();
        assert_eq!(count, 3);
        assert!((total - 35.0).abs() < 1e-9);

        let future = shared::util::now_millis() + 60_000;
        assert_eq!(revenue_since(&db.pool, Some(future)).await.unwrap(), (0.0, 0));

        let methods = by_method(&db.pool).await.unwrap();
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].method, PaymentMethod::Card);
        assert_eq!(methods[1].count, 2);
        assert!((methods[1].amount - 14.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_payment_lines_window() {
        let db = DbService::open_in_memory().await.unwrap();
        let first = paid_order(&db, 12.0, PaymentMethod::Cash, "TX-1").await;
        paid_order(&db, 8.0, PaymentMethod::Card, "TX-2").await;

        let lines = payment_lines(&db.pool, None, None).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].order_id, first);
        assert!(lines[0].table_name.is_none());

        // `to` is exclusive
        let start = lines[0].created_at;
        assert!(payment_lines(&db.pool, None, Some(start)).await.unwrap().is_empty());
        assert_eq!(payment_lines(&db.pool, Some(start), None).await.unwrap().len(), 2);
    }
}
