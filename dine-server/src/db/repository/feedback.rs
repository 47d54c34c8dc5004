//! Feedback Repository (contact form and reviews)

use super::{RepoError, RepoResult};
use shared::models::{Feedback, FeedbackKind, FeedbackQuery, FeedbackStats, RatingCount};
use sqlx::{Sqlite, SqlitePool};

/// Values for a new feedback row
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub customer_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub kind: FeedbackKind,
    pub message: String,
    pub rating: Option<i32>,
    pub is_visible: bool,
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Feedback>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let feedback = sqlx::query_as::<_, Feedback>(
        "SELECT id, customer_id, name, email, kind, message, rating, is_visible, reply, replied_at, replied_by, created_at FROM feedback WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(feedback)
}

pub async fn create(pool: &SqlitePool, data: NewFeedback) -> RepoResult<Feedback> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO feedback (customer_id, name, email, kind, message, rating, is_visible, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING id",
    )
    .bind(data.customer_id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(data.kind)
    .bind(&data.message)
    .bind(data.rating)
    .bind(data.is_visible)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to store feedback".into()))
}

pub async fn find_all(pool: &SqlitePool, query: &FeedbackQuery) -> RepoResult<Vec<Feedback>> {
    let rows = sqlx::query_as::<_, Feedback>(
        "SELECT id, customer_id, name, email, kind, message, rating, is_visible, reply, replied_at, replied_by, created_at FROM feedback WHERE (?1 IS NULL OR kind = ?1) AND (?2 IS NULL OR (reply IS NOT NULL) = ?2) ORDER BY created_at DESC, id DESC",
    )
    .bind(query.kind)
    .bind(query.replied)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Visible reviews (rated entries), newest first
pub async fn find_visible_reviews(pool: &SqlitePool) -> RepoResult<Vec<Feedback>> {
    let rows = sqlx::query_as::<_, Feedback>(
        "SELECT id, customer_id, name, email, kind, message, rating, is_visible, reply, replied_at, replied_by, created_at FROM feedback WHERE is_visible = 1 AND rating IS NOT NULL ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Per-star counts over visible reviews, one entry for each of 1..=5
pub async fn rating_counts(pool: &SqlitePool) -> RepoResult<Vec<RatingCount>> {
    let rows: Vec<(i32, i64)> = sqlx::query_as(
        "SELECT rating, COUNT(*) FROM feedback WHERE is_visible = 1 AND rating IS NOT NULL GROUP BY rating",
    )
    .fetch_all(pool)
    .await?;

    Ok((1..=5)
        .map(|rating| RatingCount {
            rating,
            count: rows
                .iter()
                .find(|(r, _)| *r == rating)
                .map(|(_, c)| *c)
                .unwrap_or(0),
        })
        .collect())
}

pub async fn average_visible_rating(pool: &SqlitePool) -> RepoResult<Option<f64>> {
    let avg: Option<f64> = sqlx::query_scalar(
        "SELECT AVG(rating) FROM feedback WHERE is_visible = 1 AND rating IS NOT NULL",
    )
    .fetch_one(pool)
    .await?;
    Ok(avg)
}

pub async fn stats(pool: &SqlitePool) -> RepoResult<FeedbackStats> {
    let stats = sqlx::query_as::<_, FeedbackStats>(
        "SELECT COUNT(*) AS total, \
         COALESCE(SUM(kind = 'request'), 0) AS requests, \
         COALESCE(SUM(kind = 'complaint'), 0) AS complaints, \
         COALESCE(SUM(kind = 'comment'), 0) AS comments, \
         COALESCE(SUM(reply IS NOT NULL), 0) AS replied, \
         COALESCE(SUM(reply IS NULL), 0) AS pending, \
         AVG(rating) AS average_rating \
         FROM feedback",
    )
    .fetch_one(pool)
    .await?;
    Ok(stats)
}

pub async fn reply(pool: &SqlitePool, id: i64, reply: &str, staff_id: i64) -> RepoResult<Feedback> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE feedback SET reply = ?1, replied_at = ?2, replied_by = ?3 WHERE id = ?4",
    )
    .bind(reply)
    .bind(now)
    .bind(staff_id)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Feedback {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Feedback {id} not found")))
}

pub async fn set_visibility(pool: &SqlitePool, id: i64, is_visible: bool) -> RepoResult<Feedback> {
    let rows = sqlx::query("UPDATE feedback SET is_visible = ?1 WHERE id = ?2")
        .bind(is_visible)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Feedback {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Feedback {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM feedback WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Feedback {id} not found")));
    }
    Ok(())
}
