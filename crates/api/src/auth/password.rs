//! Password hashing and the account password policy.
//!
//! Hashes are Argon2id in PHC string format, so the algorithm parameters
//! and salt travel inside the stored value and can be tightened later
//! without a migration. The policy itself lives here so registration and
//! admin user creation enforce the same rules.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum accepted password length, in bytes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; `Err` is reserved for malformed hashes.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check a candidate password against the account policy.
///
/// The password must be at least [`MIN_PASSWORD_LENGTH`] bytes and must not
/// repeat the account's username. Returns a client-facing explanation on
/// rejection.
pub fn validate_password_strength(password: &str, username: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if password.eq_ignore_ascii_case(username) {
        return Err("Password must not be the same as the username".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips_and_uses_argon2id() {
        let hash = hash_password("senha-segura-123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("senha-segura-123", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("senha-segura-123").unwrap();
        assert!(!verify_password("senha-errada-456", &hash).unwrap());
    }

    #[test]
    fn policy_rejects_short_passwords() {
        let err = validate_password_strength("curta", "maria").unwrap_err();
        assert!(err.contains("at least 8 characters"));
    }

    #[test]
    fn policy_rejects_password_equal_to_username() {
        assert!(validate_password_strength("Almoxarife", "almoxarife").is_err());
    }

    #[test]
    fn policy_accepts_boundary_length() {
        assert!(validate_password_strength("12345678", "maria").is_ok());
        assert!(validate_password_strength("senha-bem-longa-o-bastante", "maria").is_ok());
    }
}
