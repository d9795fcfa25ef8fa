//! Password hashing and verification, Argon2id.
//!
//! [`hash`] generates a random salt via [`OsRng`] and hashes with the
//! default Argon2id parameters, returning a PHC-format string
//! (`$argon2id$v=19$...`) - the value stored in the `password_hash` column.
//! [`verify`] parses a stored PHC string and checks a candidate password
//! against it. A plaintext password is never stored or compared directly.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(argon2::password_hash::Error),
}

/// Hash a password with a freshly generated salt. Returns a PHC string.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?;
    Ok(hash.to_string())
}

/// Check a candidate password against a stored PHC string.
pub fn verify(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(PasswordError::MalformedHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
