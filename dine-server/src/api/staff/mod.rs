//! Staff dashboard API module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/staff", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .layer(middleware::from_fn(require_staff))
}
