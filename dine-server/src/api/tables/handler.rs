//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, Order, OrderDetail, TableItemAdd,
    TableOverview, TableStats, TableStatusUpdate,
};

use crate::auth::Principal;
use crate::core::ServerState;
use crate::db::repository::{RepoError, dining_table};
use crate::utils::validation::{MAX_TABLE_NAME_LEN, validate_capacity, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn table_error(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::TableNotFound, msg),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::TableNameExists, msg),
        other => other.into(),
    }
}

fn not_found(id: impl std::fmt::Display) -> AppError {
    AppError::with_message(ErrorCode::TableNotFound, format!("Table {id} not found"))
}

/// GET /api/tables
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    let tables = dining_table::find_all(&state.db.pool).await?;
    Ok(Json(ApiResponse::success(tables)))
}

/// GET /api/tables/available - unoccupied tables
pub async fn list_available(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    let tables = dining_table::find_available(&state.db.pool).await?;
    Ok(Json(ApiResponse::success(tables)))
}

/// GET /api/tables/stats
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<TableStats>>> {
    let stats = dining_table::stats(&state.db.pool).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// GET /api/tables/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let table = dining_table::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::success(table)))
}

/// GET /api/tables/by-name/{name}
pub async fn get_by_name(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let table = dining_table::find_by_name(&state.db.pool, name.trim())
        .await?
        .ok_or_else(|| not_found(&name))?;
    Ok(Json(ApiResponse::success(table)))
}

/// POST /api/tables
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    validate_required_text(&payload.name, "name", MAX_TABLE_NAME_LEN)?;
    if let Some(capacity) = payload.capacity {
        validate_capacity(capacity)?;
    }

    let data = DiningTableCreate {
        name: payload.name.trim().to_string(),
        capacity: payload.capacity,
    };
    let table = dining_table::create(&state.db.pool, data)
        .await
        .map_err(table_error)?;
    tracing::info!(table_id = table.id, name = %table.name, "Table created");
    Ok(Json(ApiResponse::success(table)))
}

/// PUT /api/tables/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_TABLE_NAME_LEN)?;
    }
    if let Some(capacity) = payload.capacity {
        validate_capacity(capacity)?;
    }

    let data = DiningTableUpdate {
        name: payload.name.map(|n| n.trim().to_string()),
        capacity: payload.capacity,
    };
    let table = dining_table::update(&state.db.pool, id, data)
        .await
        .map_err(table_error)?;
    tracing::info!(table_id = id, "Table updated");
    Ok(Json(ApiResponse::success(table)))
}

/// PUT /api/tables/{id}/status - manual occupancy (walk-in hold / release)
pub async fn set_status(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let staff = principal.staff()?;
    let table = state
        .orders
        .set_table_occupancy(staff, id, payload.is_occupied)
        .await?;
    Ok(Json(ApiResponse::success(table)))
}

/// DELETE /api/tables/{id} - refused while an active order uses the table
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.orders.delete_table(id).await?;
    tracing::info!(table_id = id, "Table deleted");
    Ok(Json(ApiResponse::ok()))
}

/// GET /api/tables/{id}/current-order
pub async fn current_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<TableOverview>>> {
    let overview = state.orders.table_overview(id).await?;
    Ok(Json(ApiResponse::success(overview)))
}

/// GET /api/tables/{id}/orders - every order ever placed on the table
pub async fn list_orders(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = state.orders.orders_for_table(id).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// POST /api/tables/{id}/items - add to the table's current order
pub async fn add_item(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<TableItemAdd>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let staff = principal.staff()?;
    let detail = state.orders.add_item_to_table(staff, id, payload).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// POST /api/tables/{id}/orders - open a split order on the table
pub async fn open_order(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let staff = principal.staff()?;
    let order = state.orders.open_split_order(staff, id).await?;
    Ok(Json(ApiResponse::success(order)))
}
