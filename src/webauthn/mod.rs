//! Passkey registration and authentication ceremonies.
//!
//! A ceremony reads options embedded in the page, decodes their challenge
//! material, hands them to the platform authenticator, re-encodes the
//! resulting credential for JSON transport and submits it to the server.

pub mod authenticate;
pub mod credential;
pub mod options;
pub mod platform;
pub mod register;

pub use authenticate::{LoginResponse, LoginVerifier, ReturnUrlRedirect, initialize_credential_autofill};
pub use credential::{AssertionCredential, RegistrationCredential};
pub use options::{AuthenticationOptions, RegistrationOptions};
pub use platform::{CredentialPlatform, PlatformError};

use crate::codec::DecodeError;
use crate::config::Endpoints;
use crate::http::{Transport, TransportError};
use crate::page::{Display, PageContext};

/// Element that receives a visible ceremony failure message.
pub const ERROR_SELECTOR: &str = "[data-credential-error]";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("No ceremony options embedded in the page")]
    OptionsUnavailable,
    #[error("Invalid ceremony options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
    #[error("Decode: {0}")]
    Decode(#[from] DecodeError),
    #[error("Platform rejected the ceremony: {0}")]
    PlatformRejected(#[from] PlatformError),
    #[error("Server rejected the credential (HTTP {status}){}", message_suffix(.message))]
    ServerRejected { status: u16, message: Option<String> },
    #[error("Transport: {0}")]
    Transport(#[from] TransportError),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl CredentialError {
    /// Errors meaning the page does not offer this ceremony at all.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::OptionsUnavailable | Self::InvalidOptions(_) | Self::Decode(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyKind {
    Registration,
    Authentication,
    Autofill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyState {
    Idle,
    OptionsLoaded,
    AwaitingPlatform,
    ResponseEncoded,
    Submitted,
    Succeeded,
    Failed,
}

/// Drives one ceremony at a time against the page, the HTTP transport and
/// the platform authenticator.
pub struct CredentialFlow<'a, P, T, C> {
    pub(crate) page: &'a mut P,
    pub(crate) transport: &'a T,
    pub(crate) platform: &'a C,
    pub(crate) endpoints: Endpoints,
    kind: Option<CeremonyKind>,
    state: CeremonyState,
}

impl<'a, P, T, C> CredentialFlow<'a, P, T, C>
where
    P: PageContext,
    T: Transport,
    C: CredentialPlatform,
{
    pub fn new(page: &'a mut P, transport: &'a T, platform: &'a C) -> Self {
        let endpoints = Endpoints::from_page(&*page);
        Self {
            page,
            transport,
            platform,
            endpoints,
            kind: None,
            state: CeremonyState::Idle,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn state(&self) -> CeremonyState {
        self.state
    }

    pub fn kind(&self) -> Option<CeremonyKind> {
        self.kind
    }

    pub(crate) fn begin(&mut self, kind: CeremonyKind) {
        self.kind = Some(kind);
        self.state = CeremonyState::Idle;
        tracing::debug!(ceremony = ?kind, "Ceremony started");
    }

    pub(crate) fn transition(&mut self, next: CeremonyState) {
        tracing::debug!(ceremony = ?self.kind, from = ?self.state, to = ?next, "Ceremony transition");
        self.state = next;
    }

    /// Marks the ceremony failed and passes `err` through.
    pub(crate) fn fail(&mut self, err: CredentialError) -> CredentialError {
        self.transition(CeremonyState::Failed);
        if err.is_silent() {
            tracing::debug!(ceremony = ?self.kind, error = %err, "Ceremony not available on this page");
        } else {
            tracing::error!(ceremony = ?self.kind, error = %err, "Ceremony failed");
        }
        err
    }

    /// Writes `message` into the page's credential error element, if any.
    pub(crate) fn show_error(&mut self, message: &str) {
        if let Some(node) = self.page.query(ERROR_SELECTOR) {
            self.page.set_inner_html(node, message);
            self.page.set_display(node, Display::Block);
        }
    }
}

/// Reads a `{"error": ...}` body when the server sent one.
pub(crate) fn server_error_message(response: &crate::http::Response) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }
    response.json::<ErrorBody>().ok().and_then(|b| b.error)
}
