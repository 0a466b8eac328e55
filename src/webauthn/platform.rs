use async_trait::async_trait;

use super::credential::{AssertionCredential, RegistrationCredential};
use super::options::{AuthenticationOptions, RegistrationOptions};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("user cancelled or denied the request")]
    NotAllowed,
    #[error("no supported authenticator")]
    NotSupported,
    #[error("credential is excluded for this account")]
    InvalidState,
    #[error("timed out")]
    Timeout,
    #[error("aborted")]
    Aborted,
    #[error("{0}")]
    Other(String),
}

/// The browser's credential container (`navigator.credentials`).
#[async_trait(?Send)]
pub trait CredentialPlatform {
    async fn create(&self, options: &RegistrationOptions) -> Result<RegistrationCredential, PlatformError>;

    async fn get(&self, options: &AuthenticationOptions) -> Result<AssertionCredential, PlatformError>;

    /// Whether passkey autofill is offered. Platforms without the capability check
    /// report `false`.
    async fn conditional_mediation_available(&self) -> bool {
        false
    }
}
