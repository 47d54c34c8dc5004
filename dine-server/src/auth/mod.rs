//! Authentication and authorization
//!
//! - [`JwtService`] - JWT token service
//! - [`Principal`] - the authenticated customer or staff member
//! - [`require_auth`] - authentication middleware
//! - [`require_staff`] / [`require_customer`] - role checks
//! - [`password`] - argon2 hashing and one-time codes
//! - [`RateLimiter`] - login / OTP throttling

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod principal;
pub mod rate_limit;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService, TokenType};
pub use middleware::{is_public_route, require_auth, require_customer, require_staff};
pub use principal::{CustomerPrincipal, Principal, StaffPrincipal};
pub use rate_limit::RateLimiter;
