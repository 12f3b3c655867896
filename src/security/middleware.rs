use crate::context::Context;
use crate::http::response::Response;
use crate::middleware::{BoxFuture, Middleware, Next};

/// Middleware that stamps hardening headers onto every response.
///
/// The defaults are:
///
/// | Header                   | Value      |
/// |--------------------------|------------|
/// | `X-Content-Type-Options` | `nosniff`  |
/// | `X-Frame-Options`        | `DENY`     |
/// | `Cache-Control`          | `no-store` |
/// | `Referrer-Policy`        | `no-referrer` |
///
/// Values already set by the handler are overwritten.
///
/// # Examples
///
/// ```rust
/// use stackcheck::security::SecurityHeaders;
///
/// let headers = SecurityHeaders::new().with("Content-Security-Policy", "default-src 'none'");
/// assert_eq!(headers.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    headers: Vec<(String, String)>,
}

impl Default for SecurityHeaders {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityHeaders {
    pub fn new() -> Self {
        Self {
            headers: vec![
                ("X-Content-Type-Options".to_owned(), "nosniff".to_owned()),
                ("X-Frame-Options".to_owned(), "DENY".to_owned()),
                ("Cache-Control".to_owned(), "no-store".to_owned()),
                ("Referrer-Policy".to_owned(), "no-referrer".to_owned()),
            ],
        }
    }

    /// Adds (or replaces) one header in the set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Stamps the set onto `response`, replacing any value already there.
    pub fn apply(&self, response: &mut Response) {
        for (name, value) in &self.headers {
            response.set_header(name.as_str(), value.as_str());
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl Middleware for SecurityHeaders {
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture {
        let headers = self.clone();

        Box::pin(async move {
            let mut response = next.run(ctx).await;
            headers.apply(&mut response);
            response
        })
    }
}
