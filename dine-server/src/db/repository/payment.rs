//! Payment Repository
//!
//! Payments are insert-only; the schema rejects updates.

use super::{RepoError, RepoResult};
use shared::models::{Payment, PaymentMethod};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

/// Values for a new payment row
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    pub transaction_id: String,
    pub card_last4: Option<String>,
    pub recorded_by: Option<i64>,
}

pub async fn insert(conn: &mut SqliteConnection, data: NewPayment) -> RepoResult<Payment> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO payment (order_id, amount, method, status, transaction_id, card_last4, recorded_by, created_at) VALUES (?1, ?2, ?3, 'completed', ?4, ?5, ?6, ?7) RETURNING id",
    )
    .bind(data.order_id)
    .bind(data.amount)
    .bind(data.method)
    .bind(&data.transaction_id)
    .bind(&data.card_last4)
    .bind(data.recorded_by)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to record payment".into()))
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Payment>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let payment = sqlx::query_as::<_, Payment>(
        "SELECT id, order_id, amount, method, status, transaction_id, card_last4, recorded_by, created_at FROM payment WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(payment)
}

pub async fn find_by_order<'e, E>(executor: E, order_id: i64) -> RepoResult<Option<Payment>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let payment = sqlx::query_as::<_, Payment>(
        "SELECT id, order_id, amount, method, status, transaction_id, card_last4, recorded_by, created_at FROM payment WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_optional(executor)
    .await?;
    Ok(payment)
}

pub async fn count_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
