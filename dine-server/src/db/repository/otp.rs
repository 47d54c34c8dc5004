//! One-time password codes (staff password reset)

use super::RepoResult;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OtpCode {
    pub id: i64,
    pub email: String,
    pub code_hash: String,
    pub attempts: i32,
    pub used: bool,
    pub expires_at: i64,
    pub created_at: i64,
}

pub async fn insert(
    pool: &SqlitePool,
    email: &str,
    code_hash: &str,
    expires_at: i64,
    now: i64,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO otp_code (email, code_hash, attempts, used, expires_at, created_at) VALUES (?1, ?2, 0, 0, ?3, ?4) RETURNING id",
    )
    .bind(email)
    .bind(code_hash)
    .bind(expires_at)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Latest unused, unexpired code for an email
pub async fn find_active(pool: &SqlitePool, email: &str, now: i64) -> RepoResult<Option<OtpCode>> {
    let code = sqlx::query_as::<_, OtpCode>(
        "SELECT id, email, code_hash, attempts, used, expires_at, created_at FROM otp_code WHERE email = ?1 AND used = 0 AND expires_at > ?2 ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(email)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(code)
}

/// Creation time of the newest code issued for an email
pub async fn last_issued_at(pool: &SqlitePool, email: &str) -> RepoResult<Option<i64>> {
    let at: Option<i64> = sqlx::query_scalar("SELECT MAX(created_at) FROM otp_code WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(at)
}

pub async fn increment_attempts(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE otp_code SET attempts = attempts + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Mark a code used; `false` if it was already consumed
pub async fn mark_used(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE otp_code SET used = 1 WHERE id = ? AND used = 0")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() == 1)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM otp_code WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop expired and used codes
pub async fn purge(pool: &SqlitePool, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM otp_code WHERE used = 1 OR expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
