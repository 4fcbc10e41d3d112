//! Password hashing and verification using Argon2id.

use argon2::password_hash::{rand_core::OsRng, Error as ArgonError, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version};

/// Target identifier for password hashing logs.
const TRACING_TARGET_AUTH_HASHER: &str = "jobly_api::auth::password";

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("invalid hash parameters: {0}")]
    Params(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Argon2id hasher whose iteration count is the configured work factor.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        let params = Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash with a fresh random salt; the PHC string carries salt and params.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self.argon2.hash_password(password.as_bytes(), &salt).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTH_HASHER,
                error = %e,
                "password hashing operation failed"
            );
            PasswordError::Hash(e.to_string())
        })?;

        Ok(password_hash.to_string())
    }

    /// `true` when `password` matches `stored_hash`. A malformed stored hash
    /// counts as a mismatch.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET_AUTH_HASHER,
                    error = %e,
                    "invalid password hash format in store"
                );
                return false;
            }
        };

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => true,
            Err(ArgonError::Password) => false,
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_AUTH_HASHER,
                    error = %e,
                    "password verification failed"
                );
                false
            }
        }
    }
}
