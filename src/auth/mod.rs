//! Password hashing and administrator seeding.
//!
//! Hashes are Argon2id PHC strings; verification is constant-time inside `argon2`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::config::AdminSeed;
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::ADMIN_ROLE;

/// Hash a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a password against a stored PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Create the configured administrator if it does not exist yet.
///
/// Returns `true` when a new account was inserted.
pub async fn seed_admin(repo: &Repository, seed: &AdminSeed) -> Result<bool, AppError> {
    if repo.user_exists(&seed.username, &seed.email).await? {
        tracing::debug!("Admin user {} already present", seed.username);
        return Ok(false);
    }

    let hash = hash_password(&seed.password)?;
    repo.create_user(&seed.username, &seed.email, &hash, ADMIN_ROLE)
        .await?;
    tracing::info!("Seeded admin user {}", seed.username);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "plaintext-not-a-hash"));
        assert!(!verify_password("", ""));
    }
}
