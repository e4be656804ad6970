//! Credential verification for the single privileged admin identity.

use thiserror::Error;

use crate::config::AuthConfig;

/// Errors specific to credential verification.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credential provider error: {0}")]
    Provider(String),
}

/// Pluggable credential check. Route logic only sees this trait, so the
/// static admin pair can be swapped for a real identity provider.
#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> Result<bool, AuthError>;
}

/// Plaintext comparison against the configured admin credential pair.
/// Single-tenant, single-role: there is exactly one privileged identity.
#[derive(Debug, Clone)]
pub struct StaticAdminCredentials {
    email: String,
    password: String,
}

impl StaticAdminCredentials {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            email: config.admin_email.clone(),
            password: config.admin_password.clone(),
        }
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for StaticAdminCredentials {
    async fn verify(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        Ok(email == self.email && password == self.password)
    }
}
