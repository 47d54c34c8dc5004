//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{
    InvoiceDelivery, InvoiceRequest, Order, OrderDetail, OrderQuery, OrderStatusUpdate,
    PaymentReceipt, PaymentRequest,
};

use crate::auth::Principal;
use crate::core::ServerState;
use crate::services::invoice;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// GET /api/orders - own history for customers, filtered listing for staff
pub async fn list(
    State(state): State<ServerState>,
    principal: Principal,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = match &principal {
        Principal::Staff(_) => state.orders.list_orders(&query).await?,
        Principal::Customer(c) => state.orders.order_history(c.id).await?,
    };
    Ok(Json(ApiResponse::success(orders)))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let detail = state.orders.order_detail(&principal, id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// POST /api/orders/{id}/request-payment
pub async fn request_payment(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.request_payment(&principal, id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// POST /api/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.cancel_order(&principal, id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// PUT /api/orders/{id}/status - machine API over the state machine
pub async fn update_status(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let detail = state.orders.update_status(&principal, id, &payload).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// POST /api/orders/{id}/payment - settle at the till
///
/// The invoice goes to `invoice_email` or the customer's address; a failed
/// delivery is reported in `warnings` and does not undo the payment.
pub async fn complete_payment(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<ApiResponse<PaymentReceipt>>> {
    let staff = principal.staff()?;
    let (order, payment) = state.orders.complete_payment(staff, id, &payload).await?;

    let mut warnings = Vec::new();
    match state.orders.order_detail(&principal, id).await {
        Ok(detail) if payload.invoice_email.is_some() || detail.customer_email.is_some() => {
            let delivery = invoice::send_invoice(
                state.notifier.as_ref(),
                &state.config.restaurant_name,
                &detail,
                payload.invoice_email.as_deref(),
            )
            .await;
            warnings.extend(delivery.warnings);
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(order_id = id, error = %e, "Could not load order for invoice");
            warnings.push(format!("Invoice not sent: {e}"));
        }
    }

    Ok(Json(ApiResponse::success_with_message(
        "Payment recorded",
        PaymentReceipt {
            order,
            payment,
            warnings,
        },
    )))
}

/// POST /api/orders/{id}/invoice - re-send the invoice of a paid order
pub async fn send_invoice(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<InvoiceRequest>,
) -> AppResult<Json<ApiResponse<InvoiceDelivery>>> {
    let detail = state.orders.order_detail(&principal, id).await?;
    if detail.payment.is_none() {
        return Err(AppError::with_message(
            ErrorCode::PaymentNotFound,
            format!("Order {id} has not been paid"),
        ));
    }

    let delivery = invoice::send_invoice(
        state.notifier.as_ref(),
        &state.config.restaurant_name,
        &detail,
        payload.email.as_deref(),
    )
    .await;
    Ok(Json(ApiResponse::success(delivery)))
}
