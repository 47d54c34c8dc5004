//! Product API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/search", get(handler::search))
        .route("/categories", get(handler::categories))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/availability", put(handler::set_availability))
        .layer(middleware::from_fn(require_staff));

    read_routes.merge(manage_routes)
}
