use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::credential::AssertionCredentialJson;
use super::options::{Mediation, UserVerification, authentication_url, load_authentication_options};
use super::platform::CredentialPlatform;
use super::{CeremonyKind, CeremonyState, CredentialError, CredentialFlow, server_error_message};
use crate::http::{RequestBuilder, Transport, TransportError};
use crate::page::PageContext;

const USERNAME_INPUT: &str = r#"input[name="username"]"#;

/// Successful verification answer from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub return_url: String,
}

#[derive(Debug, Serialize)]
struct AssertionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(rename = "publicKeyCredential")]
    public_key_credential: String,
}

/// Completes a login once the server accepted an autofilled assertion.
#[async_trait(?Send)]
pub trait LoginVerifier<P: PageContext> {
    async fn verify(&self, page: &mut P, response: &LoginResponse) -> Result<(), CredentialError>;
}

/// Follows the server's `returnUrl`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnUrlRedirect;

#[async_trait(?Send)]
impl<P: PageContext> LoginVerifier<P> for ReturnUrlRedirect {
    async fn verify(&self, page: &mut P, response: &LoginResponse) -> Result<(), CredentialError> {
        page.navigate(&response.return_url);
        Ok(())
    }
}

impl<'a, P, T, C> CredentialFlow<'a, P, T, C>
where
    P: PageContext,
    T: Transport,
    C: CredentialPlatform,
{
    /// Signs in with a passkey after the user asked for it.
    pub async fn authenticate(&mut self) -> Result<LoginResponse, CredentialError> {
        self.begin(CeremonyKind::Authentication);

        let options = match load_authentication_options(&*self.page) {
            Ok(options) => options,
            Err(e) => return Err(self.fail(e)),
        };
        let Some(url) = authentication_url(&*self.page) else {
            return Err(self.fail(CredentialError::OptionsUnavailable));
        };
        self.transition(CeremonyState::OptionsLoaded);

        self.transition(CeremonyState::AwaitingPlatform);
        let assertion = match self.platform.get(&options).await {
            Ok(assertion) => assertion,
            Err(e) => {
                tracing::error!(error = %e, "No authenticator found");
                self.show_error(&e.to_string());
                return Err(self.fail(e.into()));
            }
        };
        let credential = assertion.to_json();
        self.transition(CeremonyState::ResponseEncoded);

        let username = self
            .page
            .query(USERNAME_INPUT)
            .map(|input| self.page.value(input))
            .unwrap_or_default();
        tracing::debug!(%username, "Submitting assertion");

        match self.submit_assertion(url, &credential, Some(&username)).await {
            Ok(login) => {
                self.transition(CeremonyState::Succeeded);
                self.page.navigate(&login.return_url);
                Ok(login)
            }
            Err(err) => {
                let message = match &err {
                    CredentialError::ServerRejected { message: Some(m), .. } => m.clone(),
                    other => other.to_string(),
                };
                if !err.is_silent() {
                    self.show_error(&message);
                }
                Err(self.fail(err))
            }
        }
    }

    /// Offers passkeys through the browser's autofill UI.
    ///
    /// Returns `Ok(None)` when the platform has no conditional mediation.
    pub async fn autofill<V>(&mut self, verifier: &V) -> Result<Option<LoginResponse>, CredentialError>
    where
        V: LoginVerifier<P>,
    {
        if !self.platform.conditional_mediation_available().await {
            tracing::debug!("Conditional mediation unavailable");
            return Ok(None);
        }
        self.begin(CeremonyKind::Autofill);

        let mut options = match load_authentication_options(&*self.page) {
            Ok(options) => options,
            Err(e) => return Err(self.fail(e)),
        };
        let Some(url) = authentication_url(&*self.page) else {
            return Err(self.fail(CredentialError::OptionsUnavailable));
        };
        options.mediation = Some(Mediation::Conditional);
        options.public_key.user_verification = Some(UserVerification::Preferred);
        self.transition(CeremonyState::OptionsLoaded);

        // Resolves only once the user picks a passkey from the autofill list.
        self.transition(CeremonyState::AwaitingPlatform);
        let assertion = match self.platform.get(&options).await {
            Ok(assertion) => assertion,
            Err(e) => return Err(self.fail(e.into())),
        };
        let credential = assertion.to_json();
        self.transition(CeremonyState::ResponseEncoded);

        let login = match self.submit_assertion(url, &credential, None).await {
            Ok(login) => login,
            Err(e) => return Err(self.fail(e)),
        };
        if let Err(e) = verifier.verify(&mut *self.page, &login).await {
            return Err(self.fail(e));
        }
        self.transition(CeremonyState::Succeeded);
        Ok(Some(login))
    }

    async fn submit_assertion(
        &mut self,
        url: String,
        credential: &AssertionCredentialJson,
        username: Option<&str>,
    ) -> Result<LoginResponse, CredentialError> {
        let body = AssertionBody {
            username,
            public_key_credential: serde_json::to_string(credential).map_err(TransportError::from)?,
        };
        let request = RequestBuilder::for_page(&*self.page, url).with_body(&body)?.build();

        self.transition(CeremonyState::Submitted);
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            let message = server_error_message(&response);
            if let Some(message) = &message {
                tracing::error!(status = response.status, error = %message, "Assertion rejected");
            }
            return Err(CredentialError::ServerRejected {
                status: response.status,
                message,
            });
        }
        response.json::<LoginResponse>().map_err(|e| CredentialError::ServerRejected {
            status: response.status,
            message: Some(format!("malformed response: {e}")),
        })
    }
}

/// Starts the autofill ceremony and logs its failures. Never surfaces an
/// error to the page.
pub async fn initialize_credential_autofill<P, T, C, V>(page: &mut P, transport: &T, platform: &C, verifier: &V)
where
    P: PageContext,
    T: Transport,
    C: CredentialPlatform,
    V: LoginVerifier<P>,
{
    tracing::debug!("Initializing credential autofill");
    let mut flow = CredentialFlow::new(page, transport, platform);
    // the flow has already logged the failure
    if flow.autofill(verifier).await.is_err() {
        tracing::debug!(state = ?flow.state(), "Credential autofill ended without login");
    }
}
