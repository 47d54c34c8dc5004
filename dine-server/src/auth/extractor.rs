//! Principal extractor
//!
//! Handlers take a [`Principal`] argument to require authentication. The
//! principal decoded by [`require_auth`](super::require_auth) is reused when
//! present; otherwise the bearer token is validated here.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::AppError;

use crate::auth::{JwtError, JwtService, Principal};
use crate::core::ServerState;
use crate::security_log;

/// Decode the bearer token of a request into a principal
pub(crate) fn principal_from_headers(
    headers: &http::HeaderMap,
    jwt: &JwtService,
    uri: &http::Uri,
) -> Result<Principal, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", uri));
            return Err(AppError::not_authenticated());
        }
    };

    let claims = jwt.validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", uri)
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    claims
        .principal()
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))
}

impl FromRequestParts<ServerState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(principal.clone());
        }

        let principal = principal_from_headers(&parts.headers, &state.jwt, &parts.uri)?;
        parts.extensions.insert(principal.clone());
        Ok(principal)
    }
}
