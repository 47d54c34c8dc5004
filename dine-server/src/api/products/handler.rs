//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{
    CategorySummary, Product, ProductAvailability, ProductCreate, ProductQuery, ProductRemoval,
    ProductSearch, ProductUpdate,
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, product};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_name, validate_optional_text, validate_price,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn product_error(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ProductNotFound, msg),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ProductNameExists, msg),
        other => other.into(),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// GET /api/products - list, optionally by category / available only
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = product::find_all(&state.db.pool, &query).await?;
    Ok(Json(ApiResponse::success(products)))
}

/// GET /api/products/search?q= - available products whose name contains `q`
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<ProductSearch>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    validate_required_text(&query.q, "q", MAX_NAME_LEN)?;
    let products = product::search(&state.db.pool, &query.q).await?;
    Ok(Json(ApiResponse::success(products)))
}

/// GET /api/products/categories - categories with product counts
pub async fn categories(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<CategorySummary>>>> {
    let categories = product::categories(&state.db.pool).await?;
    Ok(Json(ApiResponse::success(categories)))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let found = product::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        })?;
    Ok(Json(ApiResponse::success(found)))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    validate_name(&payload.name, "name")?;
    validate_price(payload.price)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;

    let data = ProductCreate {
        name: payload.name.trim().to_string(),
        description: trimmed(payload.description),
        image_url: trimmed(payload.image_url),
        ..payload
    };
    let created = product::create(&state.db.pool, data)
        .await
        .map_err(product_error)?;
    tracing::info!(product_id = created.id, name = %created.name, "Product created");
    Ok(Json(ApiResponse::success(created)))
}

/// PUT /api/products/{id} - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    if let Some(name) = &payload.name {
        validate_name(name, "name")?;
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;

    let data = ProductUpdate {
        name: trimmed(payload.name),
        description: trimmed(payload.description),
        image_url: trimmed(payload.image_url),
        ..payload
    };
    let updated = product::update(&state.db.pool, id, data)
        .await
        .map_err(product_error)?;
    tracing::info!(product_id = id, "Product updated");
    Ok(Json(ApiResponse::success(updated)))
}

/// PUT /api/products/{id}/availability
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductAvailability>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let updated = product::set_availability(&state.db.pool, id, payload.is_available)
        .await
        .map_err(product_error)?;
    tracing::info!(product_id = id, is_available = payload.is_available, "Product availability changed");
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/products/{id}
///
/// Products already used in an order are disabled instead of removed.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductRemoval>>> {
    let removal = product::delete(&state.db.pool, id)
        .await
        .map_err(product_error)?;
    tracing::info!(product_id = id, outcome = ?removal, "Product removed");
    Ok(Json(ApiResponse::success(removal)))
}
