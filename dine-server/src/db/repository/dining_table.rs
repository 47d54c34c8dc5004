//! Dining Table Repository

use super::{RepoError, RepoResult, sql_in_list};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, OrderStatus, TableStats};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

/// Default seats for a new table
pub const DEFAULT_CAPACITY: i32 = 4;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, name, capacity, is_occupied, created_at, updated_at FROM dining_table ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

/// Tables not currently occupied
pub async fn find_available(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, name, capacity, is_occupied, created_at, updated_at FROM dining_table WHERE is_occupied = 0 ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<DiningTable>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id, name, capacity, is_occupied, created_at, updated_at FROM dining_table WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(table)
}

pub async fn find_by_name<'e, E>(executor: E, name: &str) -> RepoResult<Option<DiningTable>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id, name, capacity, is_occupied, created_at, updated_at FROM dining_table WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(executor)
    .await?;
    Ok(table)
}

pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Table '{}' already exists",
            data.name
        )));
    }

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dining_table (name, capacity, is_occupied, created_at, updated_at) VALUES (?1, ?2, 0, ?3, ?3) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.capacity.unwrap_or(DEFAULT_CAPACITY))
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DiningTableUpdate) -> RepoResult<DiningTable> {
    if let Some(name) = &data.name
        && let Some(found) = find_by_name(pool, name).await?
        && found.id != id
    {
        return Err(RepoError::Duplicate(format!("Table '{name}' already exists")));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET name = COALESCE(?1, name), capacity = COALESCE(?2, capacity), updated_at = ?3 WHERE id = ?4",
    )
    .bind(&data.name)
    .bind(data.capacity)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining table {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dining table {id} not found")))
}

/// Write the occupancy flag as-is
pub async fn set_occupied<'e, E>(executor: E, id: i64, is_occupied: bool) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE dining_table SET is_occupied = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(is_occupied)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining table {id} not found")));
    }
    Ok(())
}

/// Number of active orders on a table, optionally ignoring one order
pub async fn count_active_orders<'e, E>(
    executor: E,
    table_id: i64,
    excluding_order: Option<i64>,
) -> RepoResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT COUNT(*) FROM orders WHERE table_id = ?1 AND (?2 IS NULL OR id <> ?2) AND status IN ({})",
        sql_in_list(OrderStatus::ACTIVE.iter().map(|s| s.as_str()))
    );
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(table_id)
        .bind(excluding_order)
        .fetch_one(executor)
        .await?;
    Ok(count)
}

/// Delete a table that no active order references
///
/// Historical orders keep a NULL table reference (`ON DELETE SET NULL`).
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<()> {
    if count_active_orders(&mut *conn, id, None).await? > 0 {
        return Err(RepoError::Validation(format!(
            "Dining table {id} has active orders"
        )));
    }
    let rows = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining table {id} not found")));
    }
    Ok(())
}

pub async fn stats(pool: &SqlitePool) -> RepoResult<TableStats> {
    let stats = sqlx::query_as::<_, TableStats>(
        "SELECT COUNT(*) AS total, COALESCE(SUM(is_occupied), 0) AS occupied, COUNT(*) - COALESCE(SUM(is_occupied), 0) AS available FROM dining_table",
    )
    .fetch_one(pool)
    .await?;
    Ok(stats)
}
