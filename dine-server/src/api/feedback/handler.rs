//! Feedback API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{
    ContactSubmit, Feedback, FeedbackQuery, FeedbackReceipt, FeedbackReply, FeedbackStats,
    FeedbackVisibility, ReviewBoard, ReviewSubmit,
};

use crate::auth::Principal;
use crate::core::ServerState;
use crate::db::repository::feedback;
use crate::utils::{ApiResponse, AppResult};

/// POST /api/feedback/contact - public
pub async fn contact(
    State(state): State<ServerState>,
    Json(payload): Json<ContactSubmit>,
) -> AppResult<Json<ApiResponse<FeedbackReceipt>>> {
    let receipt = state.feedback.submit_contact(payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Thank you, your message has been received",
        receipt,
    )))
}

/// GET /api/feedback/reviews - public
pub async fn review_board(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<ReviewBoard>>> {
    let board = state.feedback.review_board().await?;
    Ok(Json(ApiResponse::success(board)))
}

/// POST /api/feedback/reviews - signed-in customers
pub async fn post_review(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<ReviewSubmit>,
) -> AppResult<Json<ApiResponse<Feedback>>> {
    let customer = principal.customer()?;
    let review = state.feedback.submit_review(customer, payload).await?;
    Ok(Json(ApiResponse::success(review)))
}

/// GET /api/feedback?kind=&replied=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FeedbackQuery>,
) -> AppResult<Json<ApiResponse<Vec<Feedback>>>> {
    let entries = feedback::find_all(&state.db.pool, &query).await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// GET /api/feedback/stats
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<FeedbackStats>>> {
    let stats = feedback::stats(&state.db.pool).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// POST /api/feedback/{id}/reply
pub async fn reply(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<FeedbackReply>,
) -> AppResult<Json<ApiResponse<FeedbackReceipt>>> {
    let staff = principal.staff()?;
    let receipt = state.feedback.reply(staff, id, &payload.reply).await?;
    Ok(Json(ApiResponse::success(receipt)))
}

/// PUT /api/feedback/{id}/visibility
pub async fn set_visibility(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<FeedbackVisibility>,
) -> AppResult<Json<ApiResponse<Feedback>>> {
    let entry = state.feedback.set_visibility(id, payload.is_visible).await?;
    Ok(Json(ApiResponse::success(entry)))
}

/// DELETE /api/feedback/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.feedback.delete(id).await?;
    Ok(Json(ApiResponse::ok()))
}
