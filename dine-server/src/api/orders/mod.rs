//! Order API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // owner or staff; ownership is checked by the coordinator
    let order_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/request-payment", post(handler::request_payment))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/status", put(handler::update_status));

    let till_routes = Router::new()
        .route("/{id}/payment", post(handler::complete_payment))
        .route("/{id}/invoice", post(handler::send_invoice))
        .layer(middleware::from_fn(require_staff));

    order_routes.merge(till_routes)
}
