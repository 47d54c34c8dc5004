//! Password and one-time-code hashing (argon2)

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;
use shared::{AppError, ErrorCode};

/// Minimum staff password length
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// `false` for a mismatch or an unparsable hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub fn check_password_strength(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// Six-digit numeric code
pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret-pass", &hash));
        assert!(!verify_password("wrong-pass", &hash));
        assert!(!verify_password("secret-pass", "not-a-hash"));
    }

    #[test]
    fn test_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_password_strength() {
        assert!(check_password_strength("12345").is_err());
        assert!(check_password_strength("123456").is_ok());
    }
}
