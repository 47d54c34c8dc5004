//! Staff password reset with one-time codes
//!
//! request → a 6-digit code is emailed and stored argon2-hashed.
//! verify → the code is exchanged for a short-lived `password_reset` token.
//! confirm → the token sets a new password.

use std::sync::Arc;

use shared::models::PasswordResetGrant;
use shared::util::now_millis;
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

use crate::auth::password::{check_password_strength, generate_code, hash_password, verify_password};
use crate::auth::{JwtService, StaffPrincipal};
use crate::core::Config;
use crate::db::repository::{RepoError, otp, staff};
use crate::security_log;
use crate::services::notifier::{Notification, SharedNotifier};
use crate::utils::validation::{MAX_PASSWORD_LEN, normalize_email};

/// Lifetimes and limits for reset codes
#[derive(Debug, Clone, Copy)]
pub struct OtpSettings {
    pub ttl_seconds: i64,
    pub resend_interval_seconds: i64,
    pub max_attempts: i32,
}

impl OtpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ttl_seconds: config.otp_ttl_seconds,
            resend_interval_seconds: config.otp_resend_interval_seconds,
            max_attempts: config.otp_max_attempts,
        }
    }
}

#[derive(Clone)]
pub struct OtpService {
    pool: SqlitePool,
    jwt: Arc<JwtService>,
    notifier: SharedNotifier,
    settings: OtpSettings,
    restaurant_name: String,
}

impl OtpService {
    pub fn new(
        pool: SqlitePool,
        jwt: Arc<JwtService>,
        notifier: SharedNotifier,
        settings: OtpSettings,
        restaurant_name: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            jwt,
            notifier,
            settings,
            restaurant_name: restaurant_name.into(),
        }
    }

    /// Issue a reset code for a staff email
    ///
    /// Unknown or disabled accounts get the same `Ok(())` as known ones.
    pub async fn request(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        let now = now_millis();

        let purged = otp::purge(&self.pool, now).await?;
        if purged > 0 {
            tracing::debug!(purged, "Purged stale reset codes");
        }

        if let Some(last) = otp::last_issued_at(&self.pool, &email).await? {
            let wait_ms = last + self.settings.resend_interval_seconds * 1000 - now;
            if wait_ms > 0 {
                return Err(AppError::with_message(
                    ErrorCode::TooManyRequests,
                    "A code was sent recently, try again later",
                )
                .with_detail("retry_after_secs", (wait_ms + 999) / 1000));
            }
        }

        let account = staff::find_by_email(&self.pool, &email).await?;
        let Some(account) = account.filter(|a| a.is_active) else {
            security_log!("INFO", "password_reset_unknown_email", email = email.as_str());
            return Ok(());
        };

        let code = generate_code();
        let code_hash = hash_password(&code)?;
        let expires_at = now + self.settings.ttl_seconds * 1000;
        let code_id = otp::insert(&self.pool, &email, &code_hash, expires_at, now).await?;

        let minutes = (self.settings.ttl_seconds + 59) / 60;
        let notification = Notification::email(
            &account.email,
            format!("{} password reset code", self.restaurant_name),
            format!(
                "Hello {},\n\nYour password reset code is {code}.\nIt expires in {minutes} minutes.\n\nIf you did not ask for a reset, ignore this message.\n",
                account.name
            ),
        );

        if let Err(e) = self.notifier.send(&notification).await {
            tracing::warn!(staff_id = account.id, error = %e, "Reset code delivery failed");
            otp::delete(&self.pool, code_id).await?;
            return Err(AppError::with_message(
                ErrorCode::VerificationDeliveryFailed,
                format!("Could not deliver the reset code: {e}"),
            ));
        }

        security_log!("INFO", "password_reset_requested", staff_id = account.id);
        Ok(())
    }

    /// Check a code; success burns it and grants a reset token
    pub async fn verify(&self, email: &str, code: &str) -> Result<PasswordResetGrant, AppError> {
        let email = normalize_email(email);
        let now = now_millis();

        let Some(entry) = otp::find_active(&self.pool, &email, now).await? else {
            return Err(AppError::new(ErrorCode::VerificationCodeExpired));
        };

        if entry.attempts >= self.settings.max_attempts {
            otp::mark_used(&self.pool, entry.id).await?;
            return Err(AppError::new(ErrorCode::TooManyAttempts));
        }

        if !verify_password(code.trim(), &entry.code_hash) {
            otp::increment_attempts(&self.pool, entry.id).await?;
            let used = entry.attempts + 1;
            security_log!("WARN", "password_reset_wrong_code", attempts = used);
            if used >= self.settings.max_attempts {
                otp::mark_used(&self.pool, entry.id).await?;
                return Err(AppError::new(ErrorCode::TooManyAttempts));
            }
            return Err(AppError::new(ErrorCode::VerificationCodeInvalid)
                .with_detail("remaining_attempts", self.settings.max_attempts - used));
        }

        if !otp::mark_used(&self.pool, entry.id).await? {
            // consumed by a concurrent verify
            return Err(AppError::new(ErrorCode::VerificationCodeExpired));
        }

        let account = staff::find_by_email(&self.pool, &email)
            .await?
            .filter(|a| a.is_active)
            .ok_or_else(|| AppError::new(ErrorCode::VerificationCodeInvalid))?;

        let principal = StaffPrincipal {
            id: account.id,
            name: account.name,
            email: account.email,
        };
        let reset_token = self
            .jwt
            .generate_reset_token(&principal)
            .map_err(|e| AppError::internal(format!("Failed to issue reset token: {e}")))?;

        Ok(PasswordResetGrant {
            reset_token,
            expires_in: self.jwt.reset_lifetime_seconds(),
        })
    }

    /// Set a new password using a reset token
    pub async fn confirm(&self, reset_token: &str, new_password: &str) -> Result<(), AppError> {
        let staff_id = self.jwt.validate_reset_token(reset_token).map_err(|e| {
            security_log!("WARN", "password_reset_bad_token", error = format!("{}", e));
            AppError::invalid_token("Invalid or expired reset token")
        })?;

        check_password_strength(new_password)?;
        if new_password.chars().count() > MAX_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at most {MAX_PASSWORD_LEN} characters"
            )));
        }

        let hash = hash_password(new_password)?;
        staff::update_password(&self.pool, staff_id, &hash)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => AppError::new(ErrorCode::StaffNotFound),
                other => other.into(),
            })?;

        security_log!("INFO", "password_reset_completed", staff_id = staff_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::db::DbService;
    use crate::services::notifier::{LogNotifier, Notifier, NotifyError};
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Notifier for Unreachable {
        async fn send(&self, _: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Delivery("smtp down".into()))
        }
    }

    const SETTINGS: OtpSettings = OtpSettings {
        ttl_seconds: 600,
        resend_interval_seconds: 60,
        max_attempts: 3,
    };

    async fn setup(notifier: SharedNotifier) -> (DbService, OtpService) {
        let db = DbService::open_in_memory().await.unwrap();
        let hash = hash_password("old-password").unwrap();
        staff::create(&db.pool, "chef@example.com", "Chef", &hash)
            .await
            .unwrap();
        let jwt = Arc::new(JwtService::with_config(JwtConfig::new(
            "0123456789abcdef0123456789abcdef",
            60,
        )));
        let service = OtpService::new(db.pool.clone(), jwt, notifier, SETTINGS, "Test Bistro");
        (db, service)
    }

    fn code_in(notification: &Notification) -> String {
        let Notification::Email { body, .. } = notification else {
            panic!("expected an email");
        };
        body.split_whitespace()
            .map(|w| w.trim_end_matches('.'))
            .find(|w| w.len() == 6 && w.chars().all(|c| c.is_ascii_digit()))
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_full_reset_flow() {
        let outbox = Arc::new(LogNotifier::new());
        let (db, service) = setup(outbox.clone()).await;

        service.request("Chef@Example.com").await.unwrap();
        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        let code = code_in(&sent[0]);

        let grant = service.verify("chef@example.com", &code).await.unwrap();
        assert!(grant.expires_in > 0);

        // codes are single use
        let err = service.verify("chef@example.com", &code).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeExpired);

        service.confirm(&grant.reset_token, "new-password").await.unwrap();
        let account = staff::find_by_email(&db.pool, "chef@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("new-password", &account.password_hash));
    }

    #[tokio::test]
    async fn test_unknown_email_looks_like_success() {
        let outbox = Arc::new(LogNotifier::new());
        let (_db, service) = setup(outbox.clone()).await;

        service.request("nobody@example.com").await.unwrap();
        assert!(outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn test_resend_interval() {
        let outbox = Arc::new(LogNotifier::new());
        let (_db, service) = setup(outbox.clone()).await;

        service.request("chef@example.com").await.unwrap();
        let err = service.request("chef@example.com").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TooManyRequests);
        assert_eq!(outbox.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_code_burns_after_max_attempts() {
        let outbox = Arc::new(LogNotifier::new());
        let (_db, service) = setup(outbox.clone()).await;

        service.request("chef@example.com").await.unwrap();
        let code = code_in(&outbox.sent()[0]);
        let wrong = if code == "000000" { "111111" } else { "000000" };

        let err = service.verify("chef@example.com", wrong).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
        let err = service.verify("chef@example.com", wrong).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
        let err = service.verify("chef@example.com", wrong).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TooManyAttempts);

        // the right code no longer works either
        let err = service.verify("chef@example.com", &code).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeExpired);
    }

    #[tokio::test]
    async fn test_delivery_failure_discards_code() {
        let (db, service) = setup(Arc::new(Unreachable)).await;

        let err = service.request("chef@example.com").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationDeliveryFailed);
        assert!(otp::last_issued_at(&db.pool, "chef@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_confirm_rejects_access_tokens_and_short_passwords() {
        let outbox = Arc::new(LogNotifier::new());
        let (_db, service) = setup(outbox.clone()).await;

        let err = service.confirm("not-a-token", "new-password").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);

        service.request("chef@example.com").await.unwrap();
        let code = code_in(&outbox.sent()[0]);
        let grant = service.verify("chef@example.com", &code).await.unwrap();
        let err = service.confirm(&grant.reset_token, "short").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordTooShort);
    }
}
