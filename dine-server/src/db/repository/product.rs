//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{
    CategorySummary, Product, ProductCategory, ProductCreate, ProductQuery, ProductRemoval,
    ProductUpdate,
};
use sqlx::{Sqlite, SqlitePool};

pub async fn find_all(pool: &SqlitePool, query: &ProductQuery) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price, category, image_url, is_available, created_at, updated_at FROM product WHERE (?1 IS NULL OR category = ?1) AND (?2 = 0 OR is_available = 1) ORDER BY category, name",
    )
    .bind(query.category)
    .bind(query.available_only)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Product>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price, category, image_url, is_available, created_at, updated_at FROM product WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(product)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price, category, image_url, is_available, created_at, updated_at FROM product WHERE name = ? COLLATE NOCASE LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// Case-insensitive substring search over available products
pub async fn search(pool: &SqlitePool, term: &str) -> RepoResult<Vec<Product>> {
    let pattern = format!("%{}%", escape_like(term.trim()));
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price, category, image_url, is_available, created_at, updated_at FROM product WHERE is_available = 1 AND name LIKE ? ESCAPE '\\' ORDER BY name",
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Every category with its product count (zero included)
pub async fn categories(pool: &SqlitePool) -> RepoResult<Vec<CategorySummary>> {
    let counted = sqlx::query_as::<_, CategorySummary>(
        "SELECT category, COUNT(*) AS product_count FROM product GROUP BY category",
    )
    .fetch_all(pool)
    .await?;

    Ok(ProductCategory::ALL
        .into_iter()
        .map(|category| CategorySummary {
            category,
            product_count: counted
                .iter()
                .find(|c| c.category == category)
                .map(|c| c.product_count)
                .unwrap_or(0),
        })
        .collect())
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Product '{}' already exists",
            data.name
        )));
    }

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO product (name, description, price, category, image_url, is_available, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category)
    .bind(&data.image_url)
    .bind(data.is_available.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(name) = &data.name
        && let Some(found) = find_by_name(pool, name).await?
        && found.id != id
    {
        return Err(RepoError::Duplicate(format!("Product '{name}' already exists")));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), description = COALESCE(?2, description), price = COALESCE(?3, price), category = COALESCE(?4, category), image_url = COALESCE(?5, image_url), is_available = COALESCE(?6, is_available), updated_at = ?7 WHERE id = ?8",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category)
    .bind(&data.image_url)
    .bind(data.is_available)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn set_availability(pool: &SqlitePool, id: i64, is_available: bool) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE product SET is_available = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(is_available)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Remove a product, or soft-disable it when any order line still references it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<ProductRemoval> {
    let mut tx = pool.begin().await?;

    let referenced: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM order_item WHERE product_id = ?)")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

    let (rows, removal) = if referenced {
        let now = shared::util::now_millis();
        let rows = sqlx::query("UPDATE product SET is_available = 0, updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        (rows, ProductRemoval::Disabled)
    } else {
        let rows = sqlx::query("DELETE FROM product WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        (rows, ProductRemoval::Deleted)
    };

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    tx.commit().await?;
    Ok(removal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn burger() -> ProductCreate {
        ProductCreate {
            name: "Burger".into(),
            description: Some("Beef patty".into()),
            price: 60.0,
            category: ProductCategory::Food,
            image_url: None,
            is_available: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_duplicate_name() {
        let db = DbService::open_in_memory().await.unwrap();
        let created = create(&db.pool, burger()).await.unwrap();
        assert_eq!(created.name, "Burger");
        assert!(created.is_available);

        let mut dup = burger();
        dup.name = "burger".into();
        assert!(matches!(create(&db.pool, dup).await, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_filter_and_search() {
        let db = DbService::open_in_memory().await.unwrap();
        create(&db.pool, burger()).await.unwrap();
        let cola = create(
            &db.pool,
            ProductCreate {
                name: "Cola_Zero".into(),
                description: None,
                price: 3.5,
                category: ProductCategory::Drink,
                image_url: None,
                is_available: Some(false),
            },
        )
        .await
        .unwrap();

        let drinks = find_all(
            &db.pool,
            &ProductQuery {
                category: Some(ProductCategory::Drink),
                available_only: false,
            },
        )
        .await
        .unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].id, cola.id);

        let available = find_all(
            &db.pool,
            &ProductQuery {
                category: None,
                available_only: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(available.len(), 1);

        assert_eq!(search(&db.pool, "BURG").await.unwrap().len(), 1);
        // unavailable products never appear in search
        assert!(search(&db.pool, "cola").await.unwrap().is_empty());
        // wildcard characters are literal
        assert!(search(&db.pool, "%").await.unwrap().is_empty());

        let cats = categories(&db.pool).await.unwrap();
        assert_eq!(cats.len(), 4);
        let food = cats.iter().find(|c| c.category == ProductCategory::Food).unwrap();
        assert_eq!(food.product_count, 1);
        let salad = cats.iter().find(|c| c.category == ProductCategory::Salad).unwrap();
        assert_eq!(salad.product_count, 0);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = DbService::open_in_memory().await.unwrap();
        let p = create(&db.pool, burger()).await.unwrap();
        let updated = update(
            &db.pool,
            p.id,
            ProductUpdate {
                price: Some(65.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price, 65.5);
        assert_eq!(updated.name, "Burger");
        assert_eq!(updated.description.as_deref(), Some("Beef patty"));

        assert!(matches!(
            update(&db.pool, 999, ProductUpdate::default()).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_unreferenced_product() {
        let db = DbService::open_in_memory().await.unwrap();
        let p = create(&db.pool, burger()).await.unwrap();
        assert_eq!(delete(&db.pool, p.id).await.unwrap(), ProductRemoval::Deleted);
        assert!(find_by_id(&db.pool, p.id).await.unwrap().is_none());
        assert!(matches!(delete(&db.pool, p.id).await, Err(RepoError::NotFound(_))));
    }
}
