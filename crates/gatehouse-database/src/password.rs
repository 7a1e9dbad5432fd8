//! Argon2id password hashing and verification.
//!
//! Shared by both [`crate::repository::UserDirectory`] backings. Password
//! policy (length, complexity, rotation) belongs to the external account
//! system; this module only hashes and verifies.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use gatehouse_core::error::AppError;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored Argon2id hash.
///
/// `Ok(false)` is a wrong password; a malformed stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Stored password hash is malformed: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::internal(format!(
            "Password verification error: {e}"
        ))),
    }
}
