//! Password hashing connector (argon2id)

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::ConnectorError;

/// Salted one-way hashing of secrets
pub trait SecretHasher: Send + Sync {
    /// Algorithm label for diagnostics
    fn algorithm(&self) -> &str;

    /// Hash `plaintext` with a fresh random salt, returning a PHC string
    fn hash(&self, plaintext: &str) -> Result<String, ConnectorError>;

    /// Compare `plaintext` against a PHC string produced by `hash`
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, ConnectorError>;
}

/// argon2id with configurable cost
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Library default cost (19 MiB, 2 iterations, 1 lane)
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Custom cost; mostly useful to keep tests fast
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, ConnectorError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| ConnectorError::hash(format!("invalid argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretHasher for Argon2Hasher {
    fn algorithm(&self) -> &str {
        "argon2id"
    }

    fn hash(&self, plaintext: &str) -> Result<String, ConnectorError> {
        let salt = SaltString::generate(&mut OsRng);
        self.engine()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| ConnectorError::hash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, ConnectorError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| ConnectorError::hash(format!("malformed hash: {}", e)))?;

        match self.engine().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(ConnectorError::hash(e.to_string())),
        }
    }
}
