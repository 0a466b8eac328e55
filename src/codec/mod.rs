//! URL-safe, padding-free text encoding for binary challenge material.
//!
//! Credential ids, challenges and user handles travel through JSON as
//! base64url text. Encoding goes through standard base64 and then swaps the
//! two URL-unsafe characters and drops the padding; decoding reverses those
//! steps and restores the padding before handing the text to the standard
//! decoder.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid character {ch:?} at offset {offset}")]
    InvalidCharacter { ch: char, offset: usize },
    #[error("invalid length: {0} characters cannot encode whole bytes")]
    InvalidLength(usize),
    #[error("base64: {0}")]
    Base64(String),
}

/// Encodes `bytes` as unpadded base64url text.
pub fn bytes_to_text(bytes: &[u8]) -> String {
    STANDARD
        .encode(bytes)
        .chars()
        .filter_map(|c| match c {
            '+' => Some('-'),
            '/' => Some('_'),
            '=' => None,
            c => Some(c),
        })
        .collect()
}

/// Decodes base64url text, padded or not, back into bytes.
pub fn text_to_bytes(text: &str) -> Result<Vec<u8>, DecodeError> {
    let body = text.trim_end_matches('=');
    let mut base64 = String::with_capacity(body.len() + 3);
    for (offset, ch) in body.char_indices() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' => base64.push(ch),
            '-' => base64.push('+'),
            '_' => base64.push('/'),
            ch => return Err(DecodeError::InvalidCharacter { ch, offset }),
        }
    }

    if base64.len() % 4 == 1 {
        return Err(DecodeError::InvalidLength(base64.len()));
    }
    let pad_len = (4 - base64.len() % 4) % 4;
    base64.extend(std::iter::repeat_n('=', pad_len));

    STANDARD
        .decode(base64.as_bytes())
        .map_err(|e| DecodeError::Base64(e.to_string()))
}

/// Opaque bytes that cross the JSON boundary as base64url text.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ChallengeMaterial(Vec<u8>);

impl ChallengeMaterial {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_text(&self) -> String {
        bytes_to_text(&self.0)
    }
}

impl fmt::Debug for ChallengeMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChallengeMaterial({})", self.to_text())
    }
}

impl fmt::Display for ChallengeMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for ChallengeMaterial {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        text_to_bytes(s).map(Self)
    }
}

impl AsRef<[u8]> for ChallengeMaterial {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ChallengeMaterial {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ChallengeMaterial {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Serialize for ChallengeMaterial {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for ChallengeMaterial {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_substitutes_url_unsafe_characters() {
        assert_eq!(bytes_to_text(&[255, 255, 190]), "__--");
        assert_eq!(bytes_to_text(&[0, 255, 16]), "AP8Q");
        assert_eq!(bytes_to_text(&[]), "");
    }

    #[test]
    fn test_encode_strips_padding() {
        assert_eq!(bytes_to_text(&[1]), "AQ");
        assert_eq!(bytes_to_text(&[1, 2]), "AQI");
        assert_eq!(bytes_to_text(&[1, 2, 3]), "AQID");
    }

    #[test]
    fn test_decode_restores_padding() {
        assert_eq!(text_to_bytes("AQ").unwrap(), vec![1]);
        assert_eq!(text_to_bytes("AQI").unwrap(), vec![1, 2]);
        assert_eq!(text_to_bytes("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(text_to_bytes("__--").unwrap(), vec![255, 255, 190]);
    }

    #[test]
    fn test_decode_accepts_explicit_padding() {
        assert_eq!(text_to_bytes("AQ==").unwrap(), text_to_bytes("AQ").unwrap());
        assert_eq!(text_to_bytes("AQ=").unwrap(), vec![1]);
        assert_eq!(text_to_bytes("AQI=").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_decode_rejects_one_trailing_character() {
        assert_eq!(text_to_bytes("A"), Err(DecodeError::InvalidLength(1)));
        assert_eq!(text_to_bytes("AQIDB"), Err(DecodeError::InvalidLength(5)));
    }

    #[test]
    fn test_decode_rejects_standard_alphabet_extras() {
        assert!(matches!(
            text_to_bytes("ab+c"),
            Err(DecodeError::InvalidCharacter { ch: '+', offset: 2 })
        ));
        assert!(matches!(
            text_to_bytes("ab/c"),
            Err(DecodeError::InvalidCharacter { ch: '/', .. })
        ));
        assert!(matches!(
            text_to_bytes("ab c"),
            Err(DecodeError::InvalidCharacter { ch: ' ', .. })
        ));
    }

    #[test]
    fn test_decode_rejects_interior_padding() {
        assert!(text_to_bytes("A=QI").is_err());
    }

    #[test]
    fn test_challenge_material_serde() {
        let material = ChallengeMaterial::new(vec![255, 255, 190]);
        let json = serde_json::to_string(&material).unwrap();
        assert_eq!(json, "\"__--\"");

        let back: ChallengeMaterial = serde_json::from_str(&json).unwrap();
        assert_eq!(back, material);

        assert!(serde_json::from_str::<ChallengeMaterial>("\"A\"").is_err());
    }
}
