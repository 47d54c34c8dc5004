//! Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use shared::models::{PaymentLine, ReportExport, ReportFormat, ReportRange, RevenueSummary};
use shared::util::{now_millis, start_of_day_millis, start_of_month_millis};

use crate::core::ServerState;
use crate::db::repository::report;
use crate::orders::money::round_money;
use crate::services::documents::{revenue_csv, revenue_text};
use crate::utils::{ApiResponse, AppError, AppResult};

fn check_range(from: Option<i64>, to: Option<i64>) -> AppResult<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(AppError::validation("'from' must not be after 'to'"));
    }
    Ok(())
}

/// GET /api/reports/revenue
pub async fn revenue(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<RevenueSummary>>> {
    let pool = &state.db.pool;
    let now = now_millis();

    let (total_revenue, payment_count) = report::revenue_since(pool, None).await?;
    let (today_revenue, _) = report::revenue_since(pool, Some(start_of_day_millis(now))).await?;
    let (month_revenue, _) = report::revenue_since(pool, Some(start_of_month_millis(now))).await?;
    let by_method = report::by_method(pool).await?;

    Ok(Json(ApiResponse::success(RevenueSummary {
        total_revenue: round_money(total_revenue),
        today_revenue: round_money(today_revenue),
        month_revenue: round_money(month_revenue),
        payment_count,
        by_method,
    })))
}

/// GET /api/reports/payments?from=&to=
pub async fn payments(
    State(state): State<ServerState>,
    Query(range): Query<ReportRange>,
) -> AppResult<Json<ApiResponse<Vec<PaymentLine>>>> {
    check_range(range.from, range.to)?;
    let lines = report::payment_lines(&state.db.pool, range.from, range.to).await?;
    Ok(Json(ApiResponse::success(lines)))
}

/// GET /api/reports/revenue/export?format=csv|text&from=&to=
///
/// Returns the file body directly, not wrapped in [`ApiResponse`].
pub async fn export(
    State(state): State<ServerState>,
    Query(export): Query<ReportExport>,
) -> AppResult<Response> {
    check_range(export.from, export.to)?;
    let lines = report::payment_lines(&state.db.pool, export.from, export.to).await?;
    tracing::info!(lines = lines.len(), format = ?export.format, "Revenue report exported");

    let (body, content_type, extension) = match export.format {
        ReportFormat::Csv => (revenue_csv(&lines), "text/csv; charset=utf-8", "csv"),
        ReportFormat::Text => (
            revenue_text(&state.config.restaurant_name, &lines, now_millis()),
            "text/plain; charset=utf-8",
            "txt",
        ),
    };
    let disposition = format!("attachment; filename=\"revenue-report.{extension}\"");

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
