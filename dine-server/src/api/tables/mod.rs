//! Dining Table API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/available", get(handler::list_available))
        .route("/stats", get(handler::stats))
        .route("/by-name/{name}", get(handler::get_by_name))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/status", put(handler::set_status))
        .route("/{id}/current-order", get(handler::current_order))
        .route("/{id}/items", post(handler::add_item))
        .route("/{id}/orders", get(handler::list_orders).post(handler::open_order))
        .layer(middleware::from_fn(require_staff));

    read_routes.merge(manage_routes)
}
