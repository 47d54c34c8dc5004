//! Unified error codes for the dine service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Verification (one-time password) errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 7xxx: Table errors
//! - 8xxx: Account and feedback errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as its `u16` value so clients can switch on it without
/// depending on Rust naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    Success = 0,
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    InvalidFormat = 6,
    RequiredField = 7,
    ValueOutOfRange = 8,
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    NotAuthenticated = 1001,
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    PermissionDenied = 2001,
    StaffRequired = 2002,
    CustomerRequired = 2003,
    NotOrderOwner = 2004,

    // ==================== 3xxx: Verification ====================
    VerificationCodeExpired = 3013,
    VerificationCodeInvalid = 3014,
    TooManyAttempts = 3015,
    PasswordTooShort = 3018,
    VerificationDeliveryFailed = 3019,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderAlreadyPaid = 4002,
    OrderAlreadyCancelled = 4004,
    OrderItemNotFound = 4006,
    OrderEmpty = 4007,
    InvalidStatusTransition = 4008,
    OrderNotEditable = 4009,
    TableRequired = 4010,

    // ==================== 5xxx: Payment ====================
    PaymentCardInvalid = 5006,
    PaymentNotFound = 5007,

    // ==================== 6xxx: Product ====================
    ProductNotFound = 6001,
    ProductInvalidPrice = 6002,
    ProductUnavailable = 6003,
    ProductNameExists = 6005,

    // ==================== 7xxx: Table ====================
    TableNotFound = 7001,
    TableOccupied = 7002,
    TableNameExists = 7005,
    TableHasOrders = 7104,

    // ==================== 8xxx: Account / Feedback ====================
    StaffNotFound = 8002,
    EmailAlreadyRegistered = 8006,
    FeedbackNotFound = 8201,
    RatingOutOfRange = 8202,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, please retry later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::StaffRequired => "Staff account is required",
            ErrorCode::CustomerRequired => "Customer account is required",
            ErrorCode::NotOrderOwner => "Order belongs to another customer",

            // Verification
            ErrorCode::VerificationCodeExpired => "Verification code has expired",
            ErrorCode::VerificationCodeInvalid => "Invalid verification code",
            ErrorCode::TooManyAttempts => "Too many attempts",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",
            ErrorCode::VerificationDeliveryFailed => "Verification code could not be delivered",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::InvalidStatusTransition => "Order status transition is not allowed",
            ErrorCode::OrderNotEditable => "Order can no longer be edited",
            ErrorCode::TableRequired => "A table must be selected",

            // Payment
            ErrorCode::PaymentCardInvalid => "Card number is invalid",
            ErrorCode::PaymentNotFound => "Payment not found",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductUnavailable => "Product is not available",
            ErrorCode::ProductNameExists => "Product name already exists",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::TableNameExists => "Table name already exists",
            ErrorCode::TableHasOrders => "Table has active orders",

            // Account / Feedback
            ErrorCode::StaffNotFound => "Staff account not found",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::FeedbackNotFound => "Feedback not found",
            ErrorCode::RatingOutOfRange => "Rating must be between 1 and 5",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::StaffRequired),
            2003 => Ok(ErrorCode::CustomerRequired),
            2004 => Ok(ErrorCode::NotOrderOwner),

            // Verification
            3013 => Ok(ErrorCode::VerificationCodeExpired),
            3014 => Ok(ErrorCode::VerificationCodeInvalid),
            3015 => Ok(ErrorCode::TooManyAttempts),
            3018 => Ok(ErrorCode::PasswordTooShort),
            3019 => Ok(ErrorCode::VerificationDeliveryFailed),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidStatusTransition),
            4009 => Ok(ErrorCode::OrderNotEditable),
            4010 => Ok(ErrorCode::TableRequired),

            // Payment
            5006 => Ok(ErrorCode::PaymentCardInvalid),
            5007 => Ok(ErrorCode::PaymentNotFound),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductUnavailable),
            6005 => Ok(ErrorCode::ProductNameExists),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7005 => Ok(ErrorCode::TableNameExists),
            7104 => Ok(ErrorCode::TableHasOrders),

            // Account / Feedback
            8002 => Ok(ErrorCode::StaffNotFound),
            8006 => Ok(ErrorCode::EmailAlreadyRegistered),
            8201 => Ok(ErrorCode::FeedbackNotFound),
            8202 => Ok(ErrorCode::RatingOutOfRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::OrderAlreadyPaid.code(), 4002);
        assert_eq!(ErrorCode::TableOccupied.code(), 7002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_known_and_unknown() {
        assert_eq!(ErrorCode::try_from(4008), Ok(ErrorCode::InvalidStatusTransition));
        assert_eq!(ErrorCode::try_from(8202), Ok(ErrorCode::RatingOutOfRange));
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableHasOrders).unwrap();
        assert_eq!(json, "7104");
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::PaymentNotFound.to_string(), "E5007");
    }
}
