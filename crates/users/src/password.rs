//! One-way password storage.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use lodgebase_core::{DomainError, DomainResult};

/// Argon2id hash of a password, in PHC string form.
///
/// The plaintext is consumed at construction and never retained. `Debug` is
/// redacted so the hash does not leak into logs either.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    pub fn new(plaintext: &str) -> DomainResult<Self> {
        if plaintext.is_empty() {
            return Err(DomainError::validation("password", "must not be empty"));
        }

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|e| DomainError::validation("password", e.to_string()))
    }

    /// Check a candidate plaintext against this hash.
    pub fn verify(&self, candidate: &str) -> bool {
        match argon2::password_hash::PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
