//! Staff Account Repository

use super::{RepoError, RepoResult};
use shared::models::StaffAccount;
use sqlx::{Sqlite, SqlitePool};

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<StaffAccount>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let staff = sqlx::query_as::<_, StaffAccount>(
        "SELECT id, email, name, password_hash, is_active, created_at, updated_at FROM staff_account WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(staff)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<StaffAccount>> {
    let staff = sqlx::query_as::<_, StaffAccount>(
        "SELECT id, email, name, password_hash, is_active, created_at, updated_at FROM staff_account WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(staff)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff_account")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a staff account; `password_hash` must already be hashed
pub async fn create(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> RepoResult<StaffAccount> {
    if find_by_email(pool, email).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Email '{email}' is already registered"
        )));
    }

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO staff_account (email, name, password_hash, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, 1, ?4, ?4) RETURNING id",
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create staff account".into()))
}

pub async fn update_password(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE staff_account SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(password_hash)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Staff account {id} not found")));
    }
    Ok(())
}
