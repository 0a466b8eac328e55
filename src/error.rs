#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Codec: {0}")]
    Decode(#[from] crate::codec::DecodeError),
    #[error("Page: {0}")]
    Page(#[from] crate::page::PageError),
    #[error("HTTP: {0}")]
    Transport(#[from] crate::http::TransportError),
    #[error("Credential: {0}")]
    Credential(#[from] crate::webauthn::CredentialError),
    #[error("Entry: {0}")]
    Entry(#[from] crate::entries::EntryError),
    #[error("Hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
