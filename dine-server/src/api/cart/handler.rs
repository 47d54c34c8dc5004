//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{CartItemAdd, CartItemUpdate, OrderDetail, PlaceOrder};

use crate::auth::Principal;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/cart - the latest active order, or `null`
pub async fn get_cart(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<Option<OrderDetail>>>> {
    let customer = principal.customer()?;
    let cart = state.orders.cart(customer).await?;
    Ok(Json(ApiResponse::success(cart)))
}

/// POST /api/cart/items - add a product, opening a cart when needed
pub async fn add_item(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<CartItemAdd>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let customer = principal.customer()?;
    let cart = state
        .orders
        .add_to_cart(customer, payload.product_id, payload.quantity)
        .await?;
    Ok(Json(ApiResponse::success(cart)))
}

/// PUT /api/cart/items/{item_id} - set quantity; zero or less removes the line
pub async fn update_item(
    State(state): State<ServerState>,
    principal: Principal,
    Path(item_id): Path<i64>,
    Json(payload): Json<CartItemUpdate>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let cart = state
        .orders
        .update_cart_item(&principal, item_id, payload.quantity)
        .await?;
    Ok(Json(ApiResponse::success(cart)))
}

/// DELETE /api/cart/items/{item_id}
pub async fn remove_item(
    State(state): State<ServerState>,
    principal: Principal,
    Path(item_id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let cart = state.orders.remove_cart_item(&principal, item_id).await?;
    Ok(Json(ApiResponse::success(cart)))
}

/// POST /api/cart/place - bind a table and send the order to the kitchen
pub async fn place(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<PlaceOrder>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let customer = principal.customer()?;
    let placed = state.orders.place_order(customer, payload).await?;
    Ok(Json(ApiResponse::success_with_message("Order placed", placed)))
}
