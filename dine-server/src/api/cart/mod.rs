//! Cart API module (customers)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_customer;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_cart))
        .route("/items", post(handler::add_item))
        .route(
            "/items/{item_id}",
            put(handler::update_item).delete(handler::remove_item),
        )
        .route("/place", post(handler::place))
        .layer(middleware::from_fn(require_customer))
}
