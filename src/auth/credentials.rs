//! One-way password hashing.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use super::error::AuthError;

/// Hash `secret` into an `argon2` PHC string with a fresh random salt.
///
/// Two calls with the same secret never return the same record.
///
/// # Errors
/// Returns `AuthError::Hashing` if the hashing library rejects its parameters.
pub fn hash(secret: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|err| AuthError::Hashing(err.to_string()))
}

/// Check `secret` against a stored record; malformed records never match.
#[must_use]
pub fn verify(hash_record: &str, secret: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash_record) else {
        return false;
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}
