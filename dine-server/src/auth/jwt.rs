//! JWT token service
//!
//! Issues and validates HS256 tokens. Access tokens carry the principal's
//! role so a request can be decoded into a [`Principal`] without a lookup;
//! password-reset tokens are short-lived and accepted by the reset endpoint
//! only.

use super::principal::{CustomerPrincipal, Principal, StaffPrincipal};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use shared::models::Role;
use thiserror::Error;

/// Minimum secret length accepted outside development
pub const MIN_SECRET_LEN: usize = 32;

const DEFAULT_ISSUER: &str = "dine-server";

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes in production)
    pub secret: String,
    /// Access token lifetime (minutes)
    pub expiration_minutes: i64,
    /// Password-reset token lifetime (minutes)
    pub reset_expiration_minutes: i64,
    pub issuer: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes,
            reset_expiration_minutes: 15,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    PasswordReset,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id (subject)
    pub sub: String,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    pub fn account_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("invalid subject '{}'", self.sub)))
    }

    /// The principal of an access token
    pub fn principal(&self) -> Result<Principal, JwtError> {
        if self.token_type != TokenType::Access {
            return Err(JwtError::WrongTokenType);
        }
        let id = self.account_id()?;
        let (name, email) = (self.name.clone(), self.email.clone());
        Ok(match self.role {
            Role::Customer => Principal::Customer(CustomerPrincipal { id, name, email }),
            Role::Staff => Principal::Staff(StaffPrincipal { id, name, email }),
        })
    }
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token cannot be used here")]
    WrongTokenType,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// Random printable secret for development runs
pub fn generate_dev_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn issue(
        &self,
        sub: i64,
        role: Role,
        name: &str,
        email: &str,
        token_type: TokenType,
        lifetime_minutes: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(lifetime_minutes);

        let claims = Claims {
            sub: sub.to_string(),
            role,
            name: name.to_string(),
            email: email.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Access token for a logged-in principal
    pub fn generate_token(&self, principal: &Principal) -> Result<String, JwtError> {
        let info = principal.info();
        self.issue(
            info.id,
            info.role,
            &info.name,
            &info.email,
            TokenType::Access,
            self.config.expiration_minutes,
        )
    }

    /// Short-lived token allowing one staff password reset
    pub fn generate_reset_token(&self, staff: &StaffPrincipal) -> Result<String, JwtError> {
        self.issue(
            staff.id,
            Role::Staff,
            &staff.name,
            &staff.email,
            TokenType::PasswordReset,
            self.config.reset_expiration_minutes,
        )
    }

    /// Verify signature, issuer and expiry
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate a password-reset token and return the staff id it grants
    pub fn validate_reset_token(&self, token: &str) -> Result<i64, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::PasswordReset || claims.role != Role::Staff {
            return Err(JwtError::WrongTokenType);
        }
        claims.account_id()
    }

    /// Token from an `Authorization: Bearer …` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// Seconds until the token expires
    pub fn get_expiration_seconds(&self, claims: &Claims) -> i64 {
        let now = Utc::now().timestamp();
        (claims.exp - now).max(0)
    }

    pub fn access_lifetime_seconds(&self) -> i64 {
        self.config.expiration_minutes * 60
    }

    pub fn reset_lifetime_seconds(&self) -> i64 {
        self.config.reset_expiration_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::new(generate_dev_secret(), 60))
    }

    fn staff() -> StaffPrincipal {
        StaffPrincipal {
            id: 7,
            name: "Chef".into(),
            email: "chef@example.com".into(),
        }
    }

    #[test]
    fn test_access_token_round_trips_principal() {
        let service = service();
        let principal = Principal::Customer(CustomerPrincipal {
            id: 12,
            name: "Ada".into(),
            email: "ada@example.com".into(),
        });

        let token = service.generate_token(&principal).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "12");
        assert_eq!(claims.role, Role::Customer);
        assert_eq!(claims.principal().unwrap(), principal);
        assert!(service.get_expiration_seconds(&claims) > 3500);
    }

    #[test]
    fn test_reset_token_is_not_an_access_token() {
        let service = service();
        let token = service.generate_reset_token(&staff()).unwrap();

        assert_eq!(service.validate_reset_token(&token).unwrap(), 7);
        let claims = service.validate_token(&token).unwrap();
        assert!(matches!(claims.principal(), Err(JwtError::WrongTokenType)));

        let access = service
            .generate_token(&Principal::Staff(staff()))
            .unwrap();
        assert!(matches!(
            service.validate_reset_token(&access),
            Err(JwtError::WrongTokenType)
        ));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = service()
            .generate_token(&Principal::Staff(staff()))
            .unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::with_config(JwtConfig::new(generate_dev_secret(), -5));
        let token = service
            .generate_token(&Principal::Staff(staff()))
            .unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
