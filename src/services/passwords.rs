use actix_web::web;

use crate::errors::AppError;

/// bcrypt work factor for newly stored hashes.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost).map_err(|e| {
        log::error!("Failed to hash password: {}", e);
        AppError::Internal
    })
}

/// Checks a password against a stored bcrypt hash on the blocking pool.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let outcome = web::block(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| {
            log::error!("Password verification task failed: {}", e);
            AppError::Internal
        })?;

    Ok(outcome.unwrap_or_else(|e| {
        log::warn!("Stored password hash is unusable: {}", e);
        false
    }))
}
