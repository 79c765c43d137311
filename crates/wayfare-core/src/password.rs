//! Password hashing backed by bcrypt.
//!
//! Hashes are salted and self-describing (cost and salt are embedded), so
//! [`verify_password`] needs nothing but the stored hash.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub use bcrypt::DEFAULT_COST as DEFAULT_BCRYPT_COST;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash.
///
/// A malformed hash is treated as a mismatch rather than an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            false
        }
    }
}

/// Spends the same bcrypt work as a real [`verify_password`] call when there
/// is no stored hash to check against. Always returns `false`.
pub fn verify_password_missing(password: &str, cost: u32) -> bool {
    if let Err(e) = hash(password, cost) {
        tracing::warn!(error = %e, "Placeholder password hash failed");
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_password_success() {
        let hash = hash_password_with_cost("testpassword123", TEST_COST).unwrap();

        assert!(!hash.is_empty());
        assert_ne!(hash, "testpassword123");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password_with_cost("correctpassword", TEST_COST).unwrap();
        assert!(verify_password("correctpassword", &hash));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password_with_cost("correctpassword", TEST_COST).unwrap();
        assert!(!verify_password("wrongpassword", &hash));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(!verify_password("testpassword", "not_a_valid_bcrypt_hash"));
    }

    #[test]
    fn test_hash_generates_unique_hashes() {
        let hash1 = hash_password_with_cost("samepassword", TEST_COST).unwrap();
        let hash2 = hash_password_with_cost("samepassword", TEST_COST).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("samepassword", &hash1));
        assert!(verify_password("samepassword", &hash2));
    }

    #[test]
    fn test_verify_password_missing_never_matches() {
        assert!(!verify_password_missing("testpassword", TEST_COST));
        assert!(!verify_password_missing("", TEST_COST));
    }
}
