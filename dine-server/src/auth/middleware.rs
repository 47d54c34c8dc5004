//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role checks

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::AppError;

use crate::auth::Principal;
use crate::auth::extractor::principal_from_headers;
use crate::core::ServerState;
use crate::security_log;

/// Routes reachable without a token
///
/// | Method | Path |
/// |--------|------|
/// | POST | `/api/auth/customers/register`, `/api/auth/customers/login` |
/// | POST | `/api/auth/staff/login`, `/api/auth/staff/password-reset/*` |
/// | GET | `/api/products`, `/api/products/*` |
/// | GET | `/api/feedback/reviews` |
/// | POST | `/api/feedback/contact` |
pub fn is_public_route(method: &Method, path: &str) -> bool {
    match *method {
        Method::GET => {
            path == "/api/products"
                || path.starts_with("/api/products/")
                || path == "/api/feedback/reviews"
        }
        Method::POST => {
            matches!(
                path,
                "/api/auth/customers/register"
                    | "/api/auth/customers/login"
                    | "/api/auth/staff/login"
                    | "/api/feedback/contact"
            ) || path.starts_with("/api/auth/staff/password-reset/")
        }
        _ => false,
    }
}

/// Authentication middleware: requires a valid access token
///
/// Decodes `Authorization: Bearer <token>` and stores the [`Principal`] in the
/// request extensions.
///
/// # Skipped
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (health checks, unknown routes return 404)
/// - the public routes listed in [`is_public_route`]
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == Method::OPTIONS || !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }
    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let principal = principal_from_headers(req.headers(), &state.jwt, req.uri())?;
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

fn principal_of(req: &Request) -> Result<&Principal, AppError> {
    req.extensions()
        .get::<Principal>()
        .ok_or_else(AppError::not_authenticated)
}

/// Staff-only routes
///
/// Must run after [`require_auth`].
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    let principal = principal_of(&req)?;
    if let Err(e) = principal.staff() {
        security_log!(
            "WARN",
            "staff_required",
            account_id = principal.id(),
            uri = format!("{:?}", req.uri())
        );
        return Err(e);
    }
    Ok(next.run(req).await)
}

/// Customer-only routes
///
/// Must run after [`require_auth`].
pub async fn require_customer(req: Request, next: Next) -> Result<Response, AppError> {
    let principal = principal_of(&req)?;
    if let Err(e) = principal.customer() {
        security_log!(
            "WARN",
            "customer_required",
            account_id = principal.id(),
            uri = format!("{:?}", req.uri())
        );
        return Err(e);
    }
    Ok(next.run(req).await)
}
