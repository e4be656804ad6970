pub mod auth;
pub use auth::{AuthError, CredentialVerifier, StaticAdminCredentials};
