use serde::Serialize;

use super::credential::RegistrationCredentialJson;
use super::options::{REGISTRATION_OPTIONS_ATTR, load_registration_options};
use super::platform::CredentialPlatform;
use super::{CeremonyKind, CeremonyState, CredentialError, CredentialFlow, server_error_message};
use crate::http::{RequestBuilder, Transport, TransportError};
use crate::page::PageContext;
use crate::ui::forms;

const DESCRIPTION_INPUT: &str = r#"input[name="description"]"#;

#[derive(Debug, Serialize)]
struct SaveCredentialBody<'a> {
    description: &'a str,
    #[serde(rename = "publicKey")]
    public_key: String,
}

impl<'a, P, T, C> CredentialFlow<'a, P, T, C>
where
    P: PageContext,
    T: Transport,
    C: CredentialPlatform,
{
    /// Registers a new passkey for the signed-in user.
    ///
    /// A platform rejection sends the user back to the registration page. A
    /// failed submission stays on the page: the submit button is restored and
    /// the error shown.
    pub async fn register(&mut self) -> Result<RegistrationCredentialJson, CredentialError> {
        self.begin(CeremonyKind::Registration);

        let options = match load_registration_options(&*self.page) {
            Ok(options) => options,
            Err(e) => return Err(self.fail(e)),
        };
        self.transition(CeremonyState::OptionsLoaded);
        tracing::debug!(
            user = %options.public_key.user.name,
            excluded = options.public_key.exclude_credentials.as_ref().map_or(0, Vec::len),
            "Registration options loaded"
        );

        self.transition(CeremonyState::AwaitingPlatform);
        let credential = match self.platform.create(&options).await {
            Ok(credential) => credential,
            Err(e) => {
                let err = self.fail(e.into());
                let retry = self.endpoints.credential_create.clone();
                self.page.navigate(&retry);
                return Err(err);
            }
        };

        let public_key = credential.to_json();
        let public_key_text = serde_json::to_string(&public_key).map_err(TransportError::from)?;
        self.transition(CeremonyState::ResponseEncoded);

        let description = self
            .page
            .query(DESCRIPTION_INPUT)
            .map(|input| self.page.value(input))
            .unwrap_or_default();
        let body = SaveCredentialBody {
            description: &description,
            public_key: public_key_text,
        };
        let request = RequestBuilder::for_page(&*self.page, self.endpoints.credential_save.as_str())
            .with_body(&body)?
            .build();

        self.transition(CeremonyState::Submitted);
        let outcome = match self.transport.execute(request).await {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => {
                let message = server_error_message(&response);
                if let Some(message) = &message {
                    tracing::error!(status = response.status, error = %message, "Credential save rejected");
                }
                Err(CredentialError::ServerRejected {
                    status: response.status,
                    message,
                })
            }
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(()) => {
                self.transition(CeremonyState::Succeeded);
                tracing::info!(id = %public_key.id, "Passkey registered");
                let list = self.endpoints.credential_list.clone();
                self.page.navigate(&list);
                Ok(public_key)
            }
            Err(err) => {
                if let Some(form) = self.page.query(&format!("form[{REGISTRATION_OPTIONS_ATTR}]")) {
                    forms::restore_submit_button(&mut *self.page, form);
                }
                let message = match &err {
                    CredentialError::ServerRejected { message: Some(m), .. } => m.clone(),
                    other => other.to_string(),
                };
                self.show_error(&message);
                Err(self.fail(err))
            }
        }
    }
}
