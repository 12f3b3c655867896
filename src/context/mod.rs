//! Per-request context handed to middleware and route handlers.

use std::time::Instant;

use crate::Request;

/// A request travelling through the middleware chain towards its handler.
#[derive(Debug)]
pub struct Context {
    request: Request,
    received_at: Instant,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            received_at: Instant::now(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// When the request entered the router.
    pub fn received_at(&self) -> Instant {
        self.received_at
    }
}
