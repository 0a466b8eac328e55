//! Request/response contract for the page's HTTP collaborator.
//!
//! A [`Transport`] executes one [`Request`] and yields the [`Response`]; it
//! never retries. Browser hosts back it with `fetch`, tests with
//! [`MemoryTransport`].

pub mod builder;
pub mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

pub use builder::{CSRF_HEADER, RequestBuilder};
pub use memory::MemoryTransport;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network: {0}")]
    Network(String),
    #[error("Body encoding: {0}")]
    Body(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// 2xx, like `Response.ok`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait(?Send)]
pub trait Transport {
    async fn execute(&self, request: Request) -> Result<Response, TransportError>;
}
