//! Revenue report API module (staff)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/revenue", get(handler::revenue))
        .route("/revenue/export", get(handler::export))
        .route("/payments", get(handler::payments))
        .layer(middleware::from_fn(require_staff))
}
