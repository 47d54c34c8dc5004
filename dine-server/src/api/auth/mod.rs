//! Authentication API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/auth/customers/register | POST | public |
//! | /api/auth/customers/login | POST | public |
//! | /api/auth/staff/login | POST | public |
//! | /api/auth/staff/password-reset/{request,verify,confirm} | POST | public |
//! | /api/auth/me | GET | any |
//! | /api/auth/staff | POST | staff |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/customers/register", post(handler::register_customer))
        .route("/customers/login", post(handler::login_customer))
        .route("/staff/login", post(handler::login_staff))
        .route("/staff/password-reset/request", post(handler::request_password_reset))
        .route("/staff/password-reset/verify", post(handler::verify_password_reset))
        .route("/staff/password-reset/confirm", post(handler::confirm_password_reset));

    let session_routes = Router::new().route("/me", get(handler::me));

    let staff_routes = Router::new()
        .route("/staff", post(handler::create_staff))
        .layer(middleware::from_fn(require_staff));

    public_routes.merge(session_routes).merge(staff_routes)
}
