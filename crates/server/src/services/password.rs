//! Password hashing behind an injectable strategy.
//!
//! The verification contract is `verify(password, stored) -> bool`, so a
//! stronger (or legacy) primitive is a drop-in replacement. The default
//! is argon2 with a per-password random salt.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use thiserror::Error;

/// Errors that can occur while hashing a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The hashing primitive failed.
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// A one-way password hashing and verification strategy.
pub trait PasswordScheme: Send + Sync {
    /// Hash a plaintext password into a storable string.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError` if the primitive fails.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// Unparseable stored hashes verify as `false` rather than erroring;
    /// a corrupt credential must never let a login through.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Argon2id with default parameters and a random per-password salt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Scheme;

impl PasswordScheme for Argon2Scheme {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let scheme = Argon2Scheme;
        let hash = scheme.hash("hunter2").unwrap();
        assert!(scheme.verify("hunter2", &hash));
        assert!(!scheme.verify("hunter3", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let scheme = Argon2Scheme;
        let a = scheme.hash("hunter2").unwrap();
        let b = scheme.hash("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_hash_never_verifies() {
        let scheme = Argon2Scheme;
        assert!(!scheme.verify("hunter2", "not-a-phc-string"));
        assert!(!scheme.verify("hunter2", ""));
    }
}
