//! Order Repository
//!
//! Row-level access to `orders` and `order_item`. Status rules live in the
//! coordinator (`orders::manager`); this module only offers compare-and-set
//! primitives.

use super::{RepoError, RepoResult, sql_in_list};
use shared::models::{Order, OrderItem, OrderItemDetail, OrderQuery, OrderStatus};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const MAX_PAGE: i64 = 500;

fn active_list() -> String {
    sql_in_list(OrderStatus::ACTIVE.iter().map(|s| s.as_str()))
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Order>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, table_id, status, total_amount, created_at, updated_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(order)
}

/// The customer's cart: their most recently touched active order
pub async fn find_latest_active_for_customer<'e, E>(
    executor: E,
    customer_id: i64,
) -> RepoResult<Option<Order>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT id, customer_id, table_id, status, total_amount, created_at, updated_at FROM orders WHERE customer_id = ? AND status IN ({}) ORDER BY updated_at DESC, id DESC LIMIT 1",
        active_list()
    );
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(customer_id)
        .fetch_optional(executor)
        .await?;
    Ok(order)
}

/// The order a table currently hosts: its most recently touched active order
pub async fn find_current_for_table<'e, E>(executor: E, table_id: i64) -> RepoResult<Option<Order>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT id, customer_id, table_id, status, total_amount, created_at, updated_at FROM orders WHERE table_id = ? AND status IN ({}) ORDER BY updated_at DESC, id DESC LIMIT 1",
        active_list()
    );
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(table_id)
        .fetch_optional(executor)
        .await?;
    Ok(order)
}

pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, table_id, status, total_amount, created_at, updated_at FROM orders WHERE customer_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub async fn find_by_table(pool: &SqlitePool, table_id: i64) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, table_id, status, total_amount, created_at, updated_at FROM orders WHERE table_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(table_id)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub async fn find_all(pool: &SqlitePool, query: &OrderQuery) -> RepoResult<Vec<Order>> {
    let limit = query.limit.unwrap_or(100).clamp(1, MAX_PAGE);
    let offset = query.offset.unwrap_or(0).max(0);
    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, table_id, status, total_amount, created_at, updated_at FROM orders WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR table_id = ?2) ORDER BY created_at DESC, id DESC LIMIT ?3 OFFSET ?4",
    )
    .bind(query.status)
    .bind(query.table_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub async fn find_by_statuses(pool: &SqlitePool, statuses: &[OrderStatus]) -> RepoResult<Vec<Order>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, customer_id, table_id, status, total_amount, created_at, updated_at FROM orders WHERE status IN ({}) ORDER BY updated_at DESC, id DESC",
        sql_in_list(statuses.iter().map(|s| s.as_str()))
    );
    let orders = sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?;
    Ok(orders)
}

pub async fn create(
    conn: &mut SqliteConnection,
    customer_id: Option<i64>,
    table_id: Option<i64>,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (customer_id, table_id, status, total_amount, created_at, updated_at) VALUES (?1, ?2, 'pending', 0, ?3, ?3) RETURNING id",
    )
    .bind(customer_id)
    .bind(table_id)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Compare-and-set status change
///
/// Returns `false` when the order is not in one of `from` (or does not exist).
pub async fn transition<'e, E>(
    executor: E,
    id: i64,
    from: &[OrderStatus],
    to: OrderStatus,
) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    if from.is_empty() {
        return Ok(false);
    }
    let now = shared::util::now_millis();
    let sql = format!(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status IN ({})",
        sql_in_list(from.iter().map(|s| s.as_str()))
    );
    let rows = sqlx::query(&sql)
        .bind(to)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() == 1)
}

pub async fn set_table<'e, E>(executor: E, id: i64, table_id: Option<i64>) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    sqlx::query("UPDATE orders SET table_id = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(table_id)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn set_total<'e, E>(executor: E, id: i64, total_amount: f64) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    sqlx::query("UPDATE orders SET total_amount = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(total_amount)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

// ── Line items ──────────────────────────────────────────────────────

pub async fn items<'e, E>(executor: E, order_id: i64) -> RepoResult<Vec<OrderItem>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, quantity, unit_price, created_at, updated_at FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(executor)
    .await?;
    Ok(items)
}

pub async fn item_details<'e, E>(executor: E, order_id: i64) -> RepoResult<Vec<OrderItemDetail>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let items = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.id, oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price, ROUND(oi.quantity * oi.unit_price, 2) AS line_total FROM order_item oi JOIN product p ON p.id = oi.product_id WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(executor)
    .await?;
    Ok(items)
}

pub async fn find_item<'e, E>(executor: E, item_id: i64) -> RepoResult<Option<OrderItem>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let item = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, quantity, unit_price, created_at, updated_at FROM order_item WHERE id = ?",
    )
    .bind(item_id)
    .fetch_optional(executor)
    .await?;
    Ok(item)
}

/// The line for `product_id` on an order, if present
pub async fn find_item_for_product<'e, E>(
    executor: E,
    order_id: i64,
    product_id: i64,
) -> RepoResult<Option<OrderItem>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let item = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, quantity, unit_price, created_at, updated_at FROM order_item WHERE order_id = ? AND product_id = ?",
    )
    .bind(order_id)
    .bind(product_id)
    .fetch_optional(executor)
    .await?;
    Ok(item)
}

/// Add `quantity` of a product, merging into the existing line for that product
///
/// A new line captures `unit_price`; an existing line keeps its captured price.
pub async fn upsert_item<'e, E>(
    executor: E,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    unit_price: f64,
) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO order_item (order_id, product_id, quantity, unit_price, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) ON CONFLICT (order_id, product_id) DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = excluded.updated_at",
    )
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn set_item_quantity<'e, E>(executor: E, item_id: i64, quantity: i64) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE order_item SET quantity = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(quantity)
        .bind(now)
        .bind(item_id)
        .execute(executor)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order item {item_id} not found")));
    }
    Ok(())
}

pub async fn delete_item<'e, E>(executor: E, item_id: i64) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("DELETE FROM order_item WHERE id = ?")
        .bind(item_id)
        .execute(executor)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order item {item_id} not found")));
    }
    Ok(())
}
