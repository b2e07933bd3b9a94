//! Per-request context handed to route handlers and middleware.

use crate::Request;

/// The request a handler is serving.
#[derive(Debug)]
pub struct Context {
    request: Request,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Shorthand for [`Request::query_param`].
    pub fn query(&self, key: &str) -> Option<&str> {
        self.request.query_param(key)
    }
}
