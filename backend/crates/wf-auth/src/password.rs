//! Credential hashing with Argon2id.
//!
//! Hashes are PHC strings with a fresh random salt per call, so the same
//! password hashed twice never produces equal strings. Verification is
//! the library's constant-time comparison.

use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use error_location::ErrorLocation;
use password_hash::{PasswordHash, SaltString};

/// Hash a plaintext password into an Argon2id PHC string
#[track_caller]
pub fn hash_password(password: &str) -> AuthErrorResult<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| AuthError::PasswordHash {
        message: format!("salt generation failed: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::PasswordHash {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?
        .to_string();

    Ok(phc)
}

/// Verify a plaintext password against a stored PHC string.
///
/// Unparseable hashes verify as false rather than erroring; a corrupt
/// stored hash must not authenticate anyone.
pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
