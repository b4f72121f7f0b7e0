//! Argon2id hashing and verification for share-link passwords.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use filetrail_core::error::AppError;

/// Hashes and verifies link passwords using Argon2id.
///
/// Verification goes through the Argon2 verifier, which compares digests
/// in constant time.
#[derive(Debug, Clone, Default)]
pub struct LinkPasswordHasher;

impl LinkPasswordHasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password with a random salt.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; an unreadable hash is an internal error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = LinkPasswordHasher::new();
        let hash = hasher.hash("open sesame").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("open sesame", &hash).unwrap());
        assert!(!hasher.verify("open sesame!", &hash).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_internal_error() {
        let err = LinkPasswordHasher::new()
            .verify("pw", "not-a-hash")
            .unwrap_err();
        assert_eq!(err.kind, filetrail_core::ErrorKind::Internal);
    }
}
