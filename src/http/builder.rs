use serde::Serialize;

use super::{Method, Request, TransportError};
use crate::page::PageContext;

pub const CSRF_HEADER: &str = "X-Csrf-Token";

/// Fluent construction of a page request. POST with an empty body unless
/// told otherwise.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    url: String,
    method: Method,
    body: Option<serde_json::Value>,
    csrf_token: Option<String>,
}

impl RequestBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Post,
            body: None,
            csrf_token: None,
        }
    }

    /// Like [`RequestBuilder::new`], carrying the page's CSRF token from
    /// `<body data-csrf-token>` when there is one.
    pub fn for_page(page: &impl PageContext, url: impl Into<String>) -> Self {
        let mut builder = Self::new(url);
        builder.csrf_token = page.body_data("csrf-token");
        builder
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body<T: Serialize>(mut self, body: &T) -> Result<Self, TransportError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn build(self) -> Request {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = self.csrf_token {
            headers.push((CSRF_HEADER.to_string(), token));
        }
        Request {
            method: self.method,
            url: self.url,
            headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;

    #[test]
    fn test_defaults_to_post() {
        let req = RequestBuilder::new("/entries/status").build();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body, None);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header(CSRF_HEADER), None);
    }

    #[test]
    fn test_for_page_attaches_csrf_token() {
        let mut page = MemoryPage::default();
        let body = page.root();
        page.set_attribute(body, "data-csrf-token", "tok123");

        let req = RequestBuilder::for_page(&page, "/feeds/refresh")
            .with_method(Method::Get)
            .build();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.header(CSRF_HEADER), Some("tok123"));
    }

    #[test]
    fn test_with_body_serializes_json() {
        #[derive(Serialize)]
        struct Body {
            entry_ids: Vec<i64>,
            status: &'static str,
        }
        let req = RequestBuilder::new("/x")
            .with_body(&Body { entry_ids: vec![4], status: "read" })
            .unwrap()
            .build();
        assert_eq!(
            req.body,
            Some(serde_json::json!({"entry_ids": [4], "status": "read"}))
        );
    }
}
