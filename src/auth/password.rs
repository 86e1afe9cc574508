use crate::error::AppError;
use bcrypt::{hash, verify};

/// Hashes `password` with bcrypt at the given work factor.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash.
///
/// A hash that bcrypt cannot parse never matches; it is logged rather than surfaced, so a
/// corrupt record reads as a failed login instead of a server error.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("password verification failed on stored hash: {}", e);
            false
        }
    }
}
