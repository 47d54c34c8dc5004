//! Authentication Handlers
//!
//! Customer registration/login, staff login, staff accounts and the
//! password reset flow.

use std::time::Duration;

use axum::{Json, extract::State};
use shared::models::{
    CustomerLogin, CustomerRegister, LoginResponse, PasswordResetConfirm, PasswordResetGrant,
    PasswordResetRequest, PasswordResetVerify, PrincipalInfo, StaffAccount, StaffCreate,
    StaffLogin,
};

use crate::auth::password::{check_password_strength, hash_password, verify_password};
use crate::auth::{CustomerPrincipal, Principal, StaffPrincipal};
use crate::core::ServerState;
use crate::db::repository::{RepoError, customer, staff};
use crate::security_log;
use crate::utils::validation::{
    MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, normalize_email, validate_email, validate_name,
    validate_optional_text, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Fixed delay applied to every login attempt to blunt timing probes
const AUTH_FIXED_DELAY_MS: u64 = 150;

fn issue(state: &ServerState, principal: Principal) -> Result<LoginResponse, AppError> {
    let token = state
        .jwt
        .generate_token(&principal)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    Ok(LoginResponse {
        token,
        expires_in: state.jwt.access_lifetime_seconds(),
        principal: principal.info(),
    })
}

fn email_taken(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::EmailAlreadyRegistered, msg),
        other => other.into(),
    }
}

/// POST /api/auth/customers/register
pub async fn register_customer(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerRegister>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    validate_email(payload.email.trim())?;
    validate_name(&payload.name, "name")?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let data = CustomerRegister {
        email: normalize_email(&payload.email),
        name: payload.name.trim().to_string(),
        phone: payload
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
    };
    let created = customer::create(&state.db.pool, &data)
        .await
        .map_err(email_taken)?;
    tracing::info!(customer_id = created.id, "Customer registered");

    let response = issue(&state, Principal::Customer(created.into()))?;
    Ok(Json(ApiResponse::success_with_message("Registered", response)))
}

/// POST /api/auth/customers/login
///
/// Customers identify with email plus the name they registered with.
pub async fn login_customer(
    State(state): State<ServerState>,
    Json(req): Json<CustomerLogin>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let email = normalize_email(&req.email);
    state.rate_limiter.check(&format!("login:customer:{email}"))?;

    let found = customer::find_by_email(&state.db.pool, &email).await?;
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match found {
        Some(c) if c.name.trim().eq_ignore_ascii_case(req.name.trim()) => c,
        _ => {
            security_log!("WARN", "login_failed", role = "customer", email = email.as_str());
            return Err(AppError::invalid_credentials());
        }
    };
    if !account.is_active {
        security_log!("WARN", "login_disabled", role = "customer", account_id = account.id);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    state.rate_limiter.reset(&format!("login:customer:{email}"));
    tracing::info!(customer_id = account.id, "Customer logged in");
    let response = issue(&state, Principal::Customer(CustomerPrincipal::from(account)))?;
    Ok(Json(ApiResponse::success(response)))
}

/// POST /api/auth/staff/login
pub async fn login_staff(
    State(state): State<ServerState>,
    Json(req): Json<StaffLogin>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let email = normalize_email(&req.email);
    state.rate_limiter.check(&format!("login:staff:{email}"))?;

    let found = staff::find_by_email(&state.db.pool, &email).await?;
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let account = match found {
        Some(a) if verify_password(&req.password, &a.password_hash) => a,
        _ => {
            security_log!("WARN", "login_failed", role = "staff", email = email.as_str());
            return Err(AppError::invalid_credentials());
        }
    };
    if !account.is_active {
        security_log!("WARN", "login_disabled", role = "staff", account_id = account.id);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    state.rate_limiter.reset(&format!("login:staff:{email}"));
    tracing::info!(staff_id = account.id, "Staff logged in");
    let response = issue(&state, Principal::Staff(StaffPrincipal::from(account)))?;
    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/auth/me
pub async fn me(principal: Principal) -> AppResult<Json<ApiResponse<PrincipalInfo>>> {
    Ok(Json(ApiResponse::success(principal.info())))
}

/// POST /api/auth/staff - create another staff account
pub async fn create_staff(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<ApiResponse<StaffAccount>>> {
    let creator = principal.staff()?;
    validate_email(payload.email.trim())?;
    validate_name(&payload.name, "name")?;
    check_password_strength(&payload.password)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;

    let hash = hash_password(&payload.password)?;
    let account = staff::create(
        &state.db.pool,
        &normalize_email(&payload.email),
        payload.name.trim(),
        &hash,
    )
    .await
    .map_err(email_taken)?;

    security_log!("INFO", "staff_created", staff_id = account.id, created_by = creator.id);
    Ok(Json(ApiResponse::success(account)))
}

/// POST /api/auth/staff/password-reset/request
pub async fn request_password_reset(
    State(state): State<ServerState>,
    Json(req): Json<PasswordResetRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let email = normalize_email(&req.email);
    state.rate_limiter.check(&format!("reset:{email}"))?;
    state.otp.request(&email).await?;
    Ok(Json(ApiResponse::success_with_message(
        "If the account exists, a reset code has been sent",
        (),
    )))
}

/// POST /api/auth/staff/password-reset/verify
pub async fn verify_password_reset(
    State(state): State<ServerState>,
    Json(req): Json<PasswordResetVerify>,
) -> AppResult<Json<ApiResponse<PasswordResetGrant>>> {
    let grant = state.otp.verify(&req.email, &req.code).await?;
    Ok(Json(ApiResponse::success(grant)))
}

/// POST /api/auth/staff/password-reset/confirm
pub async fn confirm_password_reset(
    State(state): State<ServerState>,
    Json(req): Json<PasswordResetConfirm>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.otp.confirm(&req.reset_token, &req.new_password).await?;
    Ok(Json(ApiResponse::success_with_message("Password updated", ())))
}
