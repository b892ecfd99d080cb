// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing.
//!
//! Hashes are PHC strings, so parameters and salt travel with the hash and
//! verification works across parameter changes. Both operations run on the
//! blocking pool.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chatscreen_config::model::AuthConfig;
use chatscreen_core::ChatscreenError;
use zeroize::Zeroizing;

/// Argon2id hasher configured from [`AuthConfig`].
#[derive(Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(config: &AuthConfig) -> Result<Self, ChatscreenError> {
        let params = Params::new(
            config.hash_memory_cost,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| ChatscreenError::Config(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt.
    pub async fn hash(&self, password: &str) -> Result<String, ChatscreenError> {
        let password = Zeroizing::new(password.to_owned());
        let argon2 = self.argon2();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(rand::thread_rng());
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| ChatscreenError::Internal(format!("password hashing failed: {e}")))
        })
        .await
        .map_err(|e| ChatscreenError::Internal(format!("hashing task failed: {e}")))?
    }

    /// Check `password` against a stored PHC hash in constant time.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, ChatscreenError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        let argon2 = self.argon2();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|e| ChatscreenError::Internal(format!("malformed password hash: {e}")))?;
            Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
        })
        .await
        .map_err(|e| ChatscreenError::Internal(format!("verification task failed: {e}")))?
    }
}
