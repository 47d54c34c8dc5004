//! Health check routes
//!
//! | Path | Method | Purpose | Auth |
//! |------|--------|---------|------|
//! | /health | GET | liveness | none |
//! | /health/detailed | GET | database ping and uptime | none |
//!
//! ```json
//! { "status": "ok", "version": "0.1.0" }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::SystemTime;

use crate::core::ServerState;

/// Public routes
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    environment: String,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    latency_ms: Option<u64>,
    message: Option<String>,
}

impl CheckResult {
    fn ok_with_latency(latency_ms: u64) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

/// Start the uptime clock; later calls are no-ops
pub fn mark_started() {
    START_TIME.get_or_init(SystemTime::now);
}

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let database = match state.db.ping().await {
        Ok(latency) => CheckResult::ok_with_latency(latency.as_millis() as u64),
        Err(e) => {
            tracing::error!(error = %e, "Health check: database ping failed");
            CheckResult::error(e.message)
        }
    };

    Json(DetailedHealthResponse {
        status: if database.is_ok() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: get_uptime_seconds(),
        environment: state.config.environment.clone(),
        checks: HealthChecks { database },
    })
}
