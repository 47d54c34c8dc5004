use crate::auth::JwtConfig;
use crate::auth::jwt::{MIN_SECRET_LEN, generate_dev_secret};
use crate::core::ServerError;

/// Which notification backend delivers email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyBackend {
    /// Log only (simulated delivery)
    Log,
    /// AWS SES v2
    Ses,
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ENVIRONMENT | development | development / staging / production |
/// | HTTP_PORT | 8080 | HTTP listen port |
/// | DATABASE_PATH | dine.db | SQLite file |
/// | JWT_SECRET | (random in development) | HS256 secret, ≥ 32 chars |
/// | JWT_EXPIRATION_MINUTES | 1440 | access token lifetime |
/// | LOG_DIR | (unset) | daily rolling log files |
/// | LOG_JSON | false | JSON log lines |
/// | CORS_ALLOWED_ORIGINS | (any) | comma-separated origins |
/// | RESTAURANT_NAME | Dine | shown on invoices and reports |
/// | STAFF_NOTIFY_EMAIL | (unset) | receives contact-form messages |
/// | NOTIFY_BACKEND | log | `log` or `ses` |
/// | SES_FROM_EMAIL | (unset) | sender address for SES |
/// | SES_REGION | (AWS default) | SES region override |
/// | SMS_API_URL / SMS_API_KEY | (unset) | HTTP SMS gateway |
/// | OTP_TTL_SECONDS | 600 | reset code lifetime |
/// | OTP_RESEND_INTERVAL_SECONDS | 60 | minimum gap between codes |
/// | OTP_MAX_ATTEMPTS | 5 | wrong guesses before a code is burned |
/// | BOOTSTRAP_STAFF_EMAIL / BOOTSTRAP_STAFF_PASSWORD | (unset) | first staff account |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=9000 DATABASE_PATH=/data/dine.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub http_port: u16,
    pub database_path: String,
    pub jwt: JwtConfig,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
    pub restaurant_name: String,
    pub staff_notify_email: Option<String>,
    pub notify_backend: NotifyBackend,
    pub ses_from_email: Option<String>,
    pub ses_region: Option<String>,
    pub sms_api_url: Option<String>,
    pub sms_api_key: Option<String>,
    pub otp_ttl_seconds: i64,
    pub otp_resend_interval_seconds: i64,
    pub otp_max_attempts: i32,
    pub bootstrap_staff_email: Option<String>,
    pub bootstrap_staff_password: Option<String>,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read a secret; mandatory outside development
fn require_secret(key: &str, environment: &str) -> Result<Option<String>, ServerError> {
    match env_opt(key) {
        Some(value) => Ok(Some(value)),
        None if environment == "development" => Ok(None),
        None => Err(ServerError::Config(format!(
            "{key} must be set when ENVIRONMENT={environment}"
        ))),
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults, except secrets outside
    /// development.
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = env_opt("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let secret = match require_secret("JWT_SECRET", &environment)? {
            Some(secret) => {
                if secret.len() < MIN_SECRET_LEN && environment != "development" {
                    return Err(ServerError::Config(format!(
                        "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                    )));
                }
                secret
            }
            None => {
                tracing::warn!("JWT_SECRET not set, generating a temporary development key");
                generate_dev_secret()
            }
        };
        let jwt = JwtConfig::new(secret, env_parse("JWT_EXPIRATION_MINUTES", 1440));

        let notify_backend = match env_opt("NOTIFY_BACKEND").as_deref() {
            Some("ses") => NotifyBackend::Ses,
            Some("log") | None => NotifyBackend::Log,
            Some(other) => {
                return Err(ServerError::Config(format!(
                    "NOTIFY_BACKEND must be 'log' or 'ses', got '{other}'"
                )));
            }
        };
        let ses_from_email = env_opt("SES_FROM_EMAIL");
        if notify_backend == NotifyBackend::Ses && ses_from_email.is_none() {
            return Err(ServerError::Config(
                "SES_FROM_EMAIL is required when NOTIFY_BACKEND=ses".into(),
            ));
        }

        Ok(Self {
            http_port: env_parse("HTTP_PORT", 8080),
            database_path: env_opt("DATABASE_PATH").unwrap_or_else(|| "dine.db".into()),
            jwt,
            log_dir: env_opt("LOG_DIR"),
            log_json: env_parse("LOG_JSON", false),
            cors_allowed_origins: env_opt("CORS_ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            restaurant_name: env_opt("RESTAURANT_NAME").unwrap_or_else(|| "Dine".into()),
            staff_notify_email: env_opt("STAFF_NOTIFY_EMAIL"),
            notify_backend,
            ses_from_email,
            ses_region: env_opt("SES_REGION"),
            sms_api_url: env_opt("SMS_API_URL"),
            sms_api_key: require_secret_if("SMS_API_KEY", env_opt("SMS_API_URL").is_some(), &environment)?,
            otp_ttl_seconds: env_parse("OTP_TTL_SECONDS", 600),
            otp_resend_interval_seconds: env_parse("OTP_RESEND_INTERVAL_SECONDS", 60),
            otp_max_attempts: env_parse("OTP_MAX_ATTEMPTS", 5),
            bootstrap_staff_email: env_opt("BOOTSTRAP_STAFF_EMAIL"),
            bootstrap_staff_password: env_opt("BOOTSTRAP_STAFF_PASSWORD"),
            environment,
        })
    }

    /// Defaults suitable for tests: in-memory friendly, log-only notifications
    pub fn for_tests() -> Self {
        Self {
            environment: "test".into(),
            http_port: 0,
            database_path: ":memory:".into(),
            jwt: JwtConfig::new(generate_dev_secret(), 60),
            log_dir: None,
            log_json: false,
            cors_allowed_origins: Vec::new(),
            restaurant_name: "Test Bistro".into(),
            staff_notify_email: Some("owner@example.com".into()),
            notify_backend: NotifyBackend::Log,
            ses_from_email: None,
            ses_region: None,
            sms_api_url: None,
            sms_api_key: None,
            otp_ttl_seconds: 600,
            otp_resend_interval_seconds: 60,
            otp_max_attempts: 5,
            bootstrap_staff_email: None,
            bootstrap_staff_password: None,
        }
    }
}

/// A secret that is only required when the feature using it is enabled
fn require_secret_if(
    key: &str,
    enabled: bool,
    environment: &str,
) -> Result<Option<String>, ServerError> {
    if enabled {
        require_secret(key, environment)
    } else {
        Ok(env_opt(key))
    }
}
