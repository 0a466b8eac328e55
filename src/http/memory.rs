use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;

use super::{Request, Response, Transport, TransportError};

type Responder = Box<dyn Fn(&Request) -> Result<Response, TransportError>>;

/// Scripted [`Transport`]: replies from a queue, falling back to a responder
/// closure, and records every request it sees.
#[derive(Default)]
pub struct MemoryTransport {
    queued: RefCell<VecDeque<Result<Response, TransportError>>>,
    responder: Option<Responder>,
    requests: RefCell<Vec<Request>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every unqueued request with `f`.
    pub fn with_responder(
        f: impl Fn(&Request) -> Result<Response, TransportError> + 'static,
    ) -> Self {
        Self {
            responder: Some(Box::new(f)),
            ..Self::default()
        }
    }

    pub fn push_response(&self, response: Response) {
        self.queued.borrow_mut().push_back(Ok(response));
    }

    pub fn push_error(&self, error: TransportError) {
        self.queued.borrow_mut().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl Transport for MemoryTransport {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "request");
        self.requests.borrow_mut().push(request.clone());
        if let Some(next) = self.queued.borrow_mut().pop_front() {
            return next;
        }
        match &self.responder {
            Some(f) => f(&request),
            None => Err(TransportError::Network(format!(
                "no scripted response for {} {}",
                request.method.as_str(),
                request.url
            ))),
        }
    }
}
