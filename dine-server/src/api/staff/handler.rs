use axum::{Json, extract::State};
use shared::models::DashboardSummary;
use shared::util::{now_millis, start_of_day_millis};

use crate::core::ServerState;
use crate::db::repository::{dining_table, report};
use crate::orders::money::round_money;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/staff/dashboard - open work and today's takings
pub async fn dashboard(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<DashboardSummary>>> {
    let active_orders = state.orders.active_orders().await?;
    let payment_pending_orders = state.orders.payment_pending_orders().await?;
    let table_stats = dining_table::stats(&state.db.pool).await?;
    let (today_revenue, _) =
        report::revenue_since(&state.db.pool, Some(start_of_day_millis(now_millis()))).await?;

    Ok(Json(ApiResponse::success(DashboardSummary {
        active_orders,
        payment_pending_orders,
        table_stats,
        today_revenue: round_money(today_revenue),
    })))
}
