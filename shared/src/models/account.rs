//! Customer and staff account models

use serde::{Deserialize, Serialize};

/// Role discriminant carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
        }
    }
}

/// Customer account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Customer self-registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRegister {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
}

/// Customer login: email plus display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerLogin {
    pub email: String,
    pub name: String,
}

/// Staff account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffAccount {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create a staff account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Staff login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffLogin {
    pub email: String,
    pub password: String,
}

/// Public view of an authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub principal: PrincipalInfo,
}

/// Ask for a password reset code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Exchange a reset code for a short-lived reset token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetVerify {
    pub email: String,
    pub code: String,
}

/// Reset token issued after a successful code verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetGrant {
    pub reset_token: String,
    pub expires_in: i64,
}

/// Set a new password with a reset token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfirm {
    pub reset_token: String,
    pub new_password: String,
}
