//! Password hashing with Argon2id.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AuthServiceError;

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns the PHC string (algorithm, parameters, salt and digest). Both
/// services reject empty passwords before calling in here.
pub fn hash_password(password: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthServiceError::internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored PHC string.
///
/// `Ok(false)` means the password does not match; an unparseable digest is
/// an internal fault, not a mismatch.
pub fn verify_password(digest: &str, password: &str) -> Result<bool, AuthServiceError> {
    let parsed = PasswordHash::new(digest)
        .map_err(|e| AuthServiceError::internal(format!("malformed password digest: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthServiceError::internal(format!(
            "password verification failed: {e}"
        ))),
    }
}
