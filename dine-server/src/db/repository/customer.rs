//! Customer Repository

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerRegister};
use sqlx::{Sqlite, SqlitePool};

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Customer>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT id, email, name, phone, is_active, created_at FROM customer WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(customer)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT id, email, name, phone, is_active, created_at FROM customer WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(customer)
}

pub async fn create(pool: &SqlitePool, data: &CustomerRegister) -> RepoResult<Customer> {
    if find_by_email(pool, &data.email).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Email '{}' is already registered",
            data.email
        )));
    }

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO customer (email, name, phone, is_active, created_at) VALUES (?1, ?2, ?3, 1, ?4) RETURNING id",
    )
    .bind(&data.email)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_register_is_unique_per_email() {
        let db = DbService::open_in_memory().await.unwrap();
        let data = CustomerRegister {
            email: "ada@example.com".into(),
            name: "Ada".into(),
            phone: None,
        };
        let created = create(&db.pool, &data).await.unwrap();
        assert!(created.is_active);

        let shouting = CustomerRegister {
            email: "ADA@example.com".into(),
            ..data
        };
        assert!(matches!(
            create(&db.pool, &shouting).await,
            Err(RepoError::Duplicate(_))
        ));
        let found = find_by_email(&db.pool, "Ada@Example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }
}
