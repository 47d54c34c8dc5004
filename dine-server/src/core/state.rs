use std::sync::Arc;

use crate::auth::password::hash_password;
use crate::auth::{JwtService, RateLimiter};
use crate::core::config::NotifyBackend;
use crate::core::{Config, ServerError};
use crate::db::DbService;
use crate::db::repository::staff;
use crate::orders::OrdersManager;
use crate::services::notifier::{
    CompositeNotifier, LogNotifier, SesNotifier, SharedNotifier, SmsGateway,
};
use crate::services::{FeedbackService, OtpService, OtpSettings};
use crate::utils::validation::normalize_email;

/// Server state - shared handles to every service
///
/// Cloned into each request; every field is a cheap handle.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | immutable configuration |
/// | db | DbService | SQLite pool |
/// | orders | OrdersManager | order/table coordinator |
/// | jwt | Arc<JwtService> | token issuing and validation |
/// | notifier | SharedNotifier | email/SMS delivery |
/// | otp | OtpService | staff password reset codes |
/// | feedback | FeedbackService | contact form and review board |
/// | rate_limiter | Arc<RateLimiter> | login and reset throttling |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub orders: OrdersManager,
    pub jwt: Arc<JwtService>,
    pub notifier: SharedNotifier,
    pub otp: OtpService,
    pub feedback: FeedbackService,
    pub rate_limiter: Arc<RateLimiter>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("environment", &self.config.environment)
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Assemble the state from already-opened parts
    pub fn new(config: Config, db: DbService, notifier: SharedNotifier) -> Self {
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
        let otp = OtpService::new(
            db.pool.clone(),
            jwt.clone(),
            notifier.clone(),
            OtpSettings::from_config(&config),
            config.restaurant_name.clone(),
        );
        let feedback = FeedbackService::new(
            db.pool.clone(),
            notifier.clone(),
            config.restaurant_name.clone(),
            config.staff_notify_email.clone(),
        );
        Self {
            orders: OrdersManager::new(db.pool.clone()),
            jwt,
            notifier,
            otp,
            feedback,
            rate_limiter: Arc::new(RateLimiter::default()),
            db,
            config,
        }
    }

    /// Open the database, build the notifier and create the bootstrap account
    ///
    /// Order:
    /// 1. database (`DATABASE_PATH`, migrations applied)
    /// 2. notification backends
    /// 3. services
    /// 4. first staff account when configured and none exists
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        let db = DbService::new(&config.database_path)
            .await
            .map_err(|e| ServerError::Database(e.message))?;

        let notifier = build_notifier(config).await;
        let state = Self::new(config.clone(), db, notifier);
        state.bootstrap_staff().await?;
        Ok(state)
    }

    /// In-memory database and a log-only notifier
    pub async fn for_tests() -> Result<Self, ServerError> {
        Self::with_notifier(Config::for_tests(), Arc::new(LogNotifier::new())).await
    }

    /// In-memory database with the given notifier
    pub async fn with_notifier(config: Config, notifier: SharedNotifier) -> Result<Self, ServerError> {
        let db = DbService::open_in_memory()
            .await
            .map_err(|e| ServerError::Database(e.message))?;
        Ok(Self::new(config, db, notifier))
    }

    /// Create the configured staff account when the staff table is empty
    pub async fn bootstrap_staff(&self) -> Result<(), ServerError> {
        let (Some(email), Some(password)) = (
            self.config.bootstrap_staff_email.as_deref(),
            self.config.bootstrap_staff_password.as_deref(),
        ) else {
            return Ok(());
        };

        let existing = staff::count(&self.db.pool)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        if existing > 0 {
            return Ok(());
        }

        let email = normalize_email(email);
        let hash = hash_password(password)?;
        let name = email.split('@').next().unwrap_or("staff").to_string();
        let account = staff::create(&self.db.pool, &email, &name, &hash)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        tracing::info!(staff_id = account.id, email = %account.email, "Bootstrap staff account created");
        Ok(())
    }
}

/// Email goes through SES or the log; SMS through the HTTP gateway when configured
async fn build_notifier(config: &Config) -> SharedNotifier {
    let email: SharedNotifier = match (config.notify_backend, &config.ses_from_email) {
        (NotifyBackend::Ses, Some(from)) => {
            tracing::info!(from = %from, "Email delivery via AWS SES");
            Arc::new(SesNotifier::connect(from.clone(), config.ses_region.clone()).await)
        }
        _ => {
            tracing::info!("Email delivery simulated (log only)");
            Arc::new(LogNotifier::new())
        }
    };

    let sms: Option<SharedNotifier> = config.sms_api_url.as_ref().map(|url| {
        tracing::info!(url = %url, "SMS delivery via HTTP gateway");
        Arc::new(SmsGateway::new(url.clone(), config.sms_api_key.clone())) as SharedNotifier
    });

    Arc::new(CompositeNotifier::new(Some(email), sms))
}
