// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification (Argon2id).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, Params, PasswordHasher as _, PasswordVerifier as _,
};

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

/// Argon2id hasher with a configurable time cost.
///
/// Stateless apart from the cost parameters fixed at construction; each
/// `hash` call draws a fresh random salt.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher with the given time cost (iterations). Memory and
    /// parallelism use the Argon2 defaults.
    pub fn new(time_cost: u32) -> Result<Self, PasswordError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            time_cost.max(1),
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| PasswordError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        })
    }

    /// Hash a plaintext password into a PHC-format digest.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError(e.to_string()))
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// Returns `false` for mismatches and for malformed digests; never
    /// errors, so callers stay on a single failure path.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        // Minimum cost keeps the test suite fast.
        PasswordHasher::new(1).unwrap()
    }

    #[test]
    fn hash_then_verify_succeeds() {
        let hasher = hasher();
        let digest = hasher.hash("hunter2").unwrap();
        assert!(hasher.verify("hunter2", &digest));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = hasher();
        let digest = hasher.hash("hunter2").unwrap();
        assert!(!hasher.verify("hunter3", &digest));
    }

    #[test]
    fn verify_rejects_malformed_digest() {
        assert!(!hasher().verify("hunter2", "not-a-phc-string"));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = hasher();
        let a = hasher.hash("hunter2").unwrap();
        let b = hasher.hash("hunter2").unwrap();
        assert_ne!(a, b);
    }
}
