//! Credentials returned by the platform and their JSON transport form.

use serde::{Deserialize, Serialize};

use crate::codec::bytes_to_text;

pub const PUBLIC_KEY_TYPE: &str = "public-key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationResponse {
    pub client_data_json: Vec<u8>,
    pub attestation_object: Vec<u8>,
    pub transports: Vec<String>,
}

/// Result of `navigator.credentials.create()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCredential {
    pub id: String,
    pub raw_id: Vec<u8>,
    pub kind: String,
    pub authenticator_attachment: Option<String>,
    pub response: Option<AttestationResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResponse {
    pub client_data_json: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}

/// Result of `navigator.credentials.get()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionCredential {
    pub id: String,
    pub raw_id: Vec<u8>,
    pub kind: String,
    pub authenticator_attachment: Option<String>,
    pub response: Option<AssertionResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationResponseJson {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "attestationObject")]
    pub attestation_object: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCredentialJson {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AttestationResponseJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResponseJson {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub authenticator_data: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionCredentialJson {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AssertionResponseJson>,
}

impl RegistrationCredential {
    pub fn to_json(&self) -> RegistrationCredentialJson {
        RegistrationCredentialJson {
            id: self.id.clone(),
            raw_id: bytes_to_text(&self.raw_id),
            kind: self.kind.clone(),
            response: self.response.as_ref().map(|r| AttestationResponseJson {
                client_data_json: bytes_to_text(&r.client_data_json),
                attestation_object: bytes_to_text(&r.attestation_object),
                transports: r.transports.clone(),
            }),
        }
    }
}

impl AssertionCredential {
    pub fn to_json(&self) -> AssertionCredentialJson {
        AssertionCredentialJson {
            id: self.id.clone(),
            raw_id: bytes_to_text(&self.raw_id),
            kind: self.kind.clone(),
            authenticator_attachment: self.authenticator_attachment.clone(),
            response: self.response.as_ref().map(|r| AssertionResponseJson {
                client_data_json: bytes_to_text(&r.client_data_json),
                authenticator_data: bytes_to_text(&r.authenticator_data),
                signature: bytes_to_text(&r.signature),
                user_handle: r.user_handle.as_deref().map(bytes_to_text),
            }),
        }
    }
}
