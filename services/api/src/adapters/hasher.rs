//! services/api/src/adapters/hasher.rs
//!
//! Argon2 implementation of the `CredentialHasher` port. Hashing is CPU bound,
//! so both operations run on the blocking thread pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use doubtnlearn_core::ports::{CredentialHasher, PortError, PortResult};
use tracing::error;

#[derive(Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(plaintext: &str) -> PortResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            PortError::Unexpected("Failed to hash password".to_string())
        })
}

fn verify_blocking(plaintext: &str, hashed: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hashed) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Failed to parse password hash: {:?}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok()
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> PortResult<String> {
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || hash_blocking(&plaintext))
            .await
            .map_err(|e| PortError::Unexpected(format!("Hashing task failed: {e}")))?
    }

    async fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let hashed = hashed.to_owned();
        match tokio::task::spawn_blocking(move || verify_blocking(&plaintext, &hashed)).await {
            Ok(valid) => valid,
            Err(e) => {
                error!("Password verification task failed: {:?}", e);
                false
            }
        }
    }
}
