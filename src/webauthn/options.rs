//! Ceremony options as embedded in the page.
//!
//! The option types are generic over how binary fields are held: `String`
//! as they arrive in JSON, [`ChallengeMaterial`] once decoded for the
//! platform. Members the client does not interpret (`authenticatorSelection`,
//! `attestation`, `extensions`, ...) ride along in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::CredentialError;
use crate::codec::{ChallengeMaterial, DecodeError};
use crate::page::PageContext;

pub const REGISTRATION_OPTIONS_ATTR: &str = "data-credential-registration-options";
pub const AUTHENTICATION_OPTIONS_ATTR: &str = "data-credential-authentication-options";
pub const AUTHENTICATION_URL_ATTR: &str = "data-credential-authentication-url";

pub type RegistrationOptions = CreationOptions<ChallengeMaterial>;
pub type AuthenticationOptions = RequestOptions<ChallengeMaterial>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelyingParty {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity<B> {
    pub id: B,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDescriptor<B> {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: B,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PubKeyCredParam {
    #[serde(rename = "type")]
    pub kind: String,
    pub alg: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCreationOptions<B> {
    pub rp: RelyingParty,
    pub user: UserEntity<B>,
    pub challenge: B,
    #[serde(default)]
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_credentials: Option<Vec<CredentialDescriptor<B>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVerification {
    Required,
    Preferred,
    Discouraged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mediation {
    Silent,
    Optional,
    Conditional,
    Required,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyRequestOptions<B> {
    pub challenge: B,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<Vec<CredentialDescriptor<B>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<UserVerification>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationOptions<B> {
    #[serde(rename = "publicKey")]
    pub public_key: PublicKeyCreationOptions<B>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions<B> {
    #[serde(rename = "publicKey")]
    pub public_key: PublicKeyRequestOptions<B>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mediation: Option<Mediation>,
}

impl<B> CredentialDescriptor<B> {
    pub fn try_map<C, E>(self, f: &mut impl FnMut(B) -> Result<C, E>) -> Result<CredentialDescriptor<C>, E> {
        Ok(CredentialDescriptor {
            kind: self.kind,
            id: f(self.id)?,
            transports: self.transports,
        })
    }
}

fn try_map_list<B, C, E>(
    list: Option<Vec<CredentialDescriptor<B>>>,
    f: &mut impl FnMut(B) -> Result<C, E>,
) -> Result<Option<Vec<CredentialDescriptor<C>>>, E> {
    list.map(|l| l.into_iter().map(|d| d.try_map(&mut *f)).collect())
        .transpose()
}

impl<B> CreationOptions<B> {
    pub fn try_map<C, E>(self, mut f: impl FnMut(B) -> Result<C, E>) -> Result<CreationOptions<C>, E> {
        let pk = self.public_key;
        Ok(CreationOptions {
            public_key: PublicKeyCreationOptions {
                rp: pk.rp,
                user: UserEntity {
                    id: f(pk.user.id)?,
                    name: pk.user.name,
                    display_name: pk.user.display_name,
                    extra: pk.user.extra,
                },
                challenge: f(pk.challenge)?,
                pub_key_cred_params: pk.pub_key_cred_params,
                timeout: pk.timeout,
                exclude_credentials: try_map_list(pk.exclude_credentials, &mut f)?,
                extra: pk.extra,
            },
        })
    }
}

impl<B> RequestOptions<B> {
    pub fn try_map<C, E>(self, mut f: impl FnMut(B) -> Result<C, E>) -> Result<RequestOptions<C>, E> {
        let pk = self.public_key;
        Ok(RequestOptions {
            public_key: PublicKeyRequestOptions {
                challenge: f(pk.challenge)?,
                timeout: pk.timeout,
                rp_id: pk.rp_id,
                allow_credentials: try_map_list(pk.allow_credentials, &mut f)?,
                user_verification: pk.user_verification,
                extra: pk.extra,
            },
            mediation: self.mediation,
        })
    }
}

impl CreationOptions<String> {
    /// Decodes `user.id`, `challenge` and every excluded credential id.
    pub fn decode(self) -> Result<RegistrationOptions, DecodeError> {
        self.try_map(|text| text.parse::<ChallengeMaterial>())
    }
}

impl RequestOptions<String> {
    /// Decodes `challenge` and every allowed credential id.
    pub fn decode(self) -> Result<AuthenticationOptions, DecodeError> {
        self.try_map(|text| text.parse::<ChallengeMaterial>())
    }
}

/// Undoes the `&quot;` escaping applied when the JSON was written into an
/// attribute.
pub fn unescape_attribute(raw: &str) -> String {
    raw.replace("&quot;", "\"")
}

pub fn parse_registration_options(raw: &str) -> Result<RegistrationOptions, CredentialError> {
    let wire: CreationOptions<String> = serde_json::from_str(&unescape_attribute(raw))?;
    Ok(wire.decode()?)
}

pub fn parse_authentication_options(raw: &str) -> Result<AuthenticationOptions, CredentialError> {
    let wire: RequestOptions<String> = serde_json::from_str(&unescape_attribute(raw))?;
    Ok(wire.decode()?)
}

fn embedded_attribute(page: &impl PageContext, attribute: &str) -> Option<String> {
    let form = page.query(&format!("form[{attribute}]"))?;
    page.attribute(form, attribute).filter(|raw| !raw.is_empty())
}

pub fn load_registration_options(page: &impl PageContext) -> Result<RegistrationOptions, CredentialError> {
    let raw = embedded_attribute(page, REGISTRATION_OPTIONS_ATTR).ok_or(CredentialError::OptionsUnavailable)?;
    parse_registration_options(&raw)
}

pub fn load_authentication_options(page: &impl PageContext) -> Result<AuthenticationOptions, CredentialError> {
    let raw = embedded_attribute(page, AUTHENTICATION_OPTIONS_ATTR).ok_or(CredentialError::OptionsUnavailable)?;
    let options = parse_authentication_options(&raw)?;
    tracing::debug!(
        challenge_len = options.public_key.challenge.len(),
        allowed = options.public_key.allow_credentials.as_ref().map_or(0, Vec::len),
        "Authentication options loaded"
    );
    Ok(options)
}

/// Submission URL for assertions, from the authentication form.
pub fn authentication_url(page: &impl PageContext) -> Option<String> {
    embedded_attribute(page, AUTHENTICATION_URL_ATTR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;

    const REGISTRATION: &str = r#"{"publicKey":{"rp":{"name":"Reader","id":"reader.example"},"user":{"name":"alice","displayName":"alice","id":"AQID"},"challenge":"__--","pubKeyCredParams":[{"type":"public-key","alg":-7}],"timeout":60000,"excludeCredentials":[{"type":"public-key","id":"AP8Q"}],"authenticatorSelection":{"userVerification":"preferred"},"attestation":"none"}}"#;

    #[test]
    fn test_registration_options_decode_user_id() {
        let options = parse_registration_options(REGISTRATION).unwrap();
        let pk = &options.public_key;
        assert_eq!(pk.user.id.as_bytes(), &[1, 2, 3]);
        assert_eq!(pk.challenge.as_bytes(), &[255, 255, 190]);
        assert_eq!(pk.exclude_credentials.as_ref().unwrap()[0].id.as_bytes(), &[0, 255, 16]);
        assert_eq!(pk.pub_key_cred_params[0].alg, -7);
        assert_eq!(pk.timeout, Some(60000));
        assert_eq!(pk.extra["attestation"], "none");
        assert!(pk.extra.contains_key("authenticatorSelection"));
    }

    #[test]
    fn test_registration_options_unescape() {
        let escaped = REGISTRATION.replace('"', "&quot;");
        let options = parse_registration_options(&escaped).unwrap();
        assert_eq!(options.public_key.rp.id.as_deref(), Some("reader.example"));
    }

    #[test]
    fn test_null_exclude_list_is_absent() {
        let raw = r#"{"publicKey":{"rp":{"name":"R"},"user":{"name":"a","id":"AQ"},"challenge":"AQ","excludeCredentials":null}}"#;
        let options = parse_registration_options(raw).unwrap();
        assert!(options.public_key.exclude_credentials.is_none());
    }

    #[test]
    fn test_decoded_options_deserialize_without_lists() {
        let options: AuthenticationOptions = serde_json::from_str(r#"{"publicKey":{"challenge":"AQID"}}"#).unwrap();
        assert_eq!(options.public_key.challenge.as_bytes(), &[1, 2, 3]);
        assert!(options.public_key.allow_credentials.is_none());
        assert!(options.mediation.is_none());

        let raw = r#"{"publicKey":{"rp":{"name":"R"},"user":{"name":"a","id":"AQ"},"challenge":"AP8Q"}}"#;
        let options: RegistrationOptions = serde_json::from_str(raw).unwrap();
        assert_eq!(options.public_key.user.id.as_bytes(), &[1]);
        assert!(options.public_key.exclude_credentials.is_none());
        assert!(options.public_key.pub_key_cred_params.is_empty());
    }

    #[test]
    fn test_bad_challenge_is_decode_error() {
        let raw = r#"{"publicKey":{"challenge":"A","allowCredentials":[]}}"#;
        assert!(matches!(
            parse_authentication_options(raw),
            Err(CredentialError::Decode(DecodeError::InvalidLength(1)))
        ));
    }

    #[test]
    fn test_authentication_options_decode_allow_list() {
        let raw = r#"{"publicKey":{"challenge":"AQID","rpId":"reader.example","allowCredentials":[{"type":"public-key","id":"__--","transports":["usb"]}],"userVerification":"required"},"mediation":"optional"}"#;
        let options = parse_authentication_options(raw).unwrap();
        let allowed = options.public_key.allow_credentials.unwrap();
        assert_eq!(allowed[0].id.as_bytes(), &[255, 255, 190]);
        assert_eq!(allowed[0].transports.as_deref(), Some(&["usb".to_string()][..]));
        assert_eq!(options.public_key.user_verification, Some(UserVerification::Required));
        assert_eq!(options.mediation, Some(Mediation::Optional));
    }

    #[test]
    fn test_load_from_page() {
        let mut page = MemoryPage::default();
        let root = page.root();
        assert!(matches!(
            load_registration_options(&page),
            Err(CredentialError::OptionsUnavailable)
        ));

        let escaped = REGISTRATION.replace('"', "&quot;");
        page.append_element(root, "form", &[(REGISTRATION_OPTIONS_ATTR, escaped.as_str())]);
        let options = load_registration_options(&page).unwrap();
        assert_eq!(options.public_key.user.name, "alice");
    }

    #[test]
    fn test_empty_attribute_is_unavailable() {
        let mut page = MemoryPage::default();
        let root = page.root();
        page.append_element(root, "form", &[(AUTHENTICATION_OPTIONS_ATTR, "")]);
        assert!(matches!(
            load_authentication_options(&page),
            Err(CredentialError::OptionsUnavailable)
        ));
    }
}
