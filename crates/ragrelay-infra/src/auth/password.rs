//! Argon2id password hashing.
//!
//! Implements `CredentialHasher` from `ragrelay-core` using the argon2
//! crate's PHC string format: the salt and parameters travel inside the
//! stored hash, so verification needs no extra state.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use ragrelay_core::identity::service::CredentialHasher;
use ragrelay_types::error::AuthError;

/// Argon2id-backed implementation of `CredentialHasher`.
///
/// Uses the crate's default parameters (Argon2id v19, 19 MiB memory,
/// 2 iterations), which match current OWASP guidance.
#[derive(Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
