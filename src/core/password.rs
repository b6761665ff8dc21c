//! Password hashing and verification.
//!
//! New hashes are argon2 PHC strings. Accounts seeded by the previous system
//! still carry an unsalted SHA-256 hex digest; those verify through
//! [`Verification::Legacy`] so the caller can upgrade them.

use crate::errors::{Error, Result};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};

/// Outcome of checking a plaintext password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Matched an argon2 hash
    Strong,
    /// Matched a legacy SHA-256 digest; the stored hash should be replaced
    Legacy,
    /// Did not match
    Mismatch,
}

impl Verification {
    /// True for either matching scheme.
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Strong | Self::Legacy)
    }
}

/// Hashes `plain` with argon2 and a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

/// Lowercase hex SHA-256 of `plain`, the format of legacy hashes.
#[must_use]
pub fn legacy_digest(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}

/// Checks `plain` against `stored`, trying argon2 first.
#[must_use]
pub fn verify_password(plain: &str, stored: &str) -> Verification {
    if let Ok(parsed) = PasswordHash::new(stored) {
        return if Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
        {
            Verification::Strong
        } else {
            Verification::Mismatch
        };
    }

    if stored.eq_ignore_ascii_case(&legacy_digest(plain)) {
        Verification::Legacy
    } else {
        Verification::Mismatch
    }
}
