//! Cryptographic logics.

use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Argon2, Params, Version};
use rand::RngCore;
use rand::rngs::OsRng;
use validator::{ValidationError, ValidationErrors};

use crate::config::Argon2 as ArgonConfig;

const TOKEN_BYTES: usize = 32;

type Result<T> = std::result::Result<T, CryptoError>;

#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    #[error("argon2 error: {0}")]
    Argon2(String),
}

/// Password manager that uses Argon2id and PHC string format for hashing and
/// verification.
pub struct PasswordManager {
    params: Params,
    /// Hash of a random secret, verified in place of unknown accounts.
    decoy: String,
    #[cfg(test)]
    verifications: std::sync::atomic::AtomicUsize,
}

impl PasswordManager {
    /// Create a new [`PasswordManager`].
    pub fn new(config: Option<ArgonConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let params = Params::new(
            config.memory_cost,
            config.iterations,
            config.parallelism,
            Some(config.hash_length),
        )
        .map_err(|err| CryptoError::Argon2(err.to_string()))?;

        let mut manager = Self {
            params,
            decoy: String::new(),
            #[cfg(test)]
            verifications: Default::default(),
        };
        manager.decoy = manager.hash_password(session_token())?;
        Ok(manager)
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(
            argon2::Algorithm::Argon2id,
            Version::V0x13,
            self.params.clone(),
        )
    }

    /// Hash password using Argon2id.
    pub fn hash_password(&self, password: impl AsRef<[u8]>) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_ref(), &salt)
            .map_err(|e| CryptoError::Argon2(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn invalid_credentials() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.add(
            "password",
            ValidationError::new("invalid_credentials")
                .with_message("Invalid email or password.".into()),
        );
        errors
    }

    /// Verify password against a PHC.
    pub fn verify_password(
        &self,
        password: impl AsRef<[u8]>,
        phc_hash: &str,
    ) -> std::result::Result<(), ValidationErrors> {
        #[cfg(test)]
        self.verifications
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        let parsed = PasswordHash::new(phc_hash)
            .map_err(|_| Self::invalid_credentials())?;

        self.argon2()
            .verify_password(password.as_ref(), &parsed)
            .map_err(|_| Self::invalid_credentials())
    }

    /// PHC hash with the configured cost that no password matches.
    ///
    /// Unknown accounts are verified against it so that they take as long
    /// to reject as a wrong password.
    pub fn decoy_hash(&self) -> &str {
        &self.decoy
    }

    /// Errors shaped like a failed verification, for unknown accounts.
    pub fn rejection(&self) -> ValidationErrors {
        Self::invalid_credentials()
    }

    #[cfg(test)]
    pub fn verifications(&self) -> usize {
        self.verifications
            .load(std::sync::atomic::Ordering::Relaxed)
    }
}

/// Generate an opaque session token: 32 random bytes, hex-encoded.
pub fn session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
