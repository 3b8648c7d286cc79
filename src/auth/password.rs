/// Password Hashing and Verification
///
/// bcrypt hashes are self-describing (`$2b$<cost>$<salt><hash>`), so the salt
/// and cost never need to be stored separately. Both operations are slow on
/// purpose; request handlers go through the async wrappers, which move the
/// work onto the blocking thread pool.

use actix_web::web;
use bcrypt::{hash, verify};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::AppError;

lazy_static! {
    // One decoy per cost, hashed from a random string nobody knows
    static ref DECOY_HASHES: Mutex<HashMap<u32, String>> = Mutex::new(HashMap::new());
}

/// Hash a password using bcrypt with the given work factor
///
/// # Errors
/// Returns error if bcrypt rejects the cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored hash
///
/// A malformed hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            false
        }
    }
}

/// A bcrypt hash at `cost` that no password matches
///
/// Logins for unknown usernames verify against this so they take as long as
/// a wrong password for a real account.
pub fn decoy_hash(cost: u32) -> Result<String, AppError> {
    let mut decoys = DECOY_HASHES
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(decoy) = decoys.get(&cost) {
        return Ok(decoy.clone());
    }
    let decoy = hash_password(&uuid::Uuid::new_v4().to_string(), cost)?;
    decoys.insert(cost, decoy.clone());
    Ok(decoy)
}

/// Run a full verify against the decoy hash and discard the result
pub async fn verify_against_decoy(password: String, cost: u32) -> Result<(), AppError> {
    web::block(move || {
        let decoy = decoy_hash(cost)?;
        verify_password(&password, &decoy);
        Ok::<(), AppError>(())
    })
    .await?
}

/// `hash_password` on the blocking pool
pub async fn compute_password_hash(password: String, cost: u32) -> Result<String, AppError> {
    web::block(move || hash_password(&password, cost)).await?
}

/// `verify_password` on the blocking pool
pub async fn check_password(password: String, hash: String) -> Result<bool, AppError> {
    Ok(web::block(move || verify_password(&password, &hash)).await?)
}
