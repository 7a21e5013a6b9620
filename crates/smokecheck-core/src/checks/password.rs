//! Password hash round-trip check

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::check::{Check, CheckFuture, CheckKind, Observation};
use crate::connectors::hashing::SecretHasher;
use crate::error::ConnectorError;

/// Hashes a secret, verifies the secret against its own hash, and verifies
/// that a different secret is rejected.
pub struct PasswordHashCheck {
    secret: SecretString,
    hasher: Arc<dyn SecretHasher>,
}

impl PasswordHashCheck {
    pub fn new(secret: SecretString, hasher: Arc<dyn SecretHasher>) -> Self {
        Self { secret, hasher }
    }
}

impl Check for PasswordHashCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::PasswordHash
    }

    fn observe(&self) -> CheckFuture<'_> {
        Box::pin(async move {
            let hasher = Arc::clone(&self.hasher);
            let secret = self.secret.clone();
            let algorithm = self.hasher.algorithm().to_string();

            // argon2 is CPU-bound; run it on the blocking pool.
            let (accepts_own, accepts_other) = tokio::task::spawn_blocking(move || {
                let plaintext = secret.expose_secret();
                let hash = hasher.hash(plaintext)?;
                let accepts_own = hasher.verify(plaintext, &hash)?;
                let accepts_other = hasher.verify(&format!("{}#", plaintext), &hash)?;
                Ok::<_, ConnectorError>((accepts_own, accepts_other))
            })
            .await
            .map_err(|e| ConnectorError::Other(e.to_string()))??;

            let observation = if !accepts_own {
                Observation::fail(format!(
                    "{} hash did not verify against its own secret",
                    algorithm
                ))
            } else if accepts_other {
                Observation::fail(format!("{} hash accepted a different secret", algorithm))
            } else {
                Observation::pass(format!("{} round-trip verified", algorithm))
            };

            Ok(observation.with_diagnostic("algorithm", algorithm))
        })
    }
}
