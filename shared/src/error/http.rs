//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::PaymentNotFound
            | Self::ProductNotFound
            | Self::TableNotFound
            | Self::StaffNotFound
            | Self::FeedbackNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict: the request is valid but the current state forbids it
            Self::AlreadyExists
            | Self::OrderAlreadyPaid
            | Self::OrderAlreadyCancelled
            | Self::InvalidStatusTransition
            | Self::OrderNotEditable
            | Self::ProductNameExists
            | Self::TableOccupied
            | Self::TableNameExists
            | Self::TableHasOrders
            | Self::EmailAlreadyRegistered => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::StaffRequired
            | Self::CustomerRequired
            | Self::NotOrderOwner => StatusCode::FORBIDDEN,

            // 410 Gone
            Self::VerificationCodeExpired => StatusCode::GONE,

            // 429 Too Many Requests
            Self::TooManyRequests | Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,

            // 502 Bad Gateway (external delivery)
            Self::VerificationDeliveryFailed => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TableNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::FeedbackNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_state_conflicts_are_409() {
        assert_eq!(ErrorCode::OrderAlreadyPaid.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::TableOccupied.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InvalidStatusTransition.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::TableHasOrders.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_and_permission_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::StaffRequired.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NotOrderOwner.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::OrderEmpty.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::ProductInvalidPrice.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::VerificationDeliveryFailed.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::TooManyRequests.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
