//! Feedback API module
//!
//! Public contact form and review board, customer reviews, staff moderation.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/feedback", routes())
}

fn routes() -> Router<ServerState> {
    let board_routes = Router::new()
        .route("/contact", post(handler::contact))
        .route("/reviews", get(handler::review_board).post(handler::post_review));

    let moderation_routes = Router::new()
        .route("/", get(handler::list))
        .route("/stats", get(handler::stats))
        .route("/{id}", axum::routing::delete(handler::delete))
        .route("/{id}/reply", post(handler::reply))
        .route("/{id}/visibility", put(handler::set_visibility))
        .layer(middleware::from_fn(require_staff));

    board_routes.merge(moderation_routes)
}
