//! Middleware pipeline: composable request/response processing.
//!
//! A middleware receives the request [`Context`] and a [`Next`] cursor. It can
//! pass the request through, short-circuit with its own [`Response`], or
//! decorate the downstream response. The router appends the matched endpoint
//! as the last link of the chain, so every response (404 and 405 included)
//! flows back through every middleware.

use std::pin::Pin;
use std::sync::Arc;

use crate::{Response, StatusCode, context::Context};

/// Boxed future returned by middleware and handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A type-erased, reference-counted middleware function.
pub type MiddlewareHandler = Arc<dyn Fn(Context, Next) -> BoxFuture + Send + Sync + 'static>;

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |ctx: Context, next: Next| middleware.handle(ctx, next))
}

/// A cursor into the remaining middleware chain for a single request.
///
/// Consumed by [`Next::run`], so each middleware can forward at most once.
pub struct Next {
    middlewares: Vec<MiddlewareHandler>,
    index: usize,
}

impl Next {
    pub fn new(middlewares: Vec<MiddlewareHandler>) -> Self {
        Self {
            middlewares,
            index: 0,
        }
    }

    /// Invokes the next middleware in the chain and returns its response.
    ///
    /// An exhausted chain yields `500 Internal Server Error`.
    pub async fn run(mut self, ctx: Context) -> Response {
        if self.index < self.middlewares.len() {
            let handler = Arc::clone(&self.middlewares[self.index]);
            self.index += 1;
            handler(ctx, self).await
        } else {
            Response::new(StatusCode::InternalServerError)
                .body("No response generated by middleware pipeline")
        }
    }
}

/// The core middleware trait.
///
/// Implementations are shared across Tokio tasks and must return a `Send`
/// future.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture;
}

/// Logs method, path, status and elapsed time of every request.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture {
        Box::pin(async move {
            let started = ctx.received_at();
            let method = ctx.request().method().to_string();
            let path = ctx.request().path().to_owned();

            let response = next.run(ctx).await;

            tracing::info!(
                %method,
                %path,
                status = response.status().as_u16(),
                elapsed = ?started.elapsed(),
                "request served"
            );

            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Request;

    fn ctx(path: &str) -> Context {
        let raw = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let (req, _) = Request::parse(raw.as_bytes()).unwrap();
        Context::new(req)
    }

    struct Tag(&'static str);

    impl Middleware for Tag {
        fn handle(&self, ctx: Context, next: Next) -> BoxFuture {
            let tag = self.0;
            Box::pin(async move {
                let mut response = next.run(ctx).await;
                let seen = response
                    .headers()
                    .get("x-order")
                    .map(|v| format!("{v},{tag}"))
                    .unwrap_or_else(|| tag.to_owned());
                response.set_header("X-Order", seen);
                response
            })
        }
    }

    fn endpoint(status: StatusCode) -> MiddlewareHandler {
        Arc::new(move |_ctx: Context, _next: Next| -> BoxFuture {
            Box::pin(async move { Response::new(status) })
        })
    }

    #[tokio::test]
    async fn empty_chain_is_a_server_error() {
        let response = Next::new(vec![]).run(ctx("/")).await;
        assert_eq!(response.status(), StatusCode::InternalServerError);
    }

    #[tokio::test]
    async fn responses_unwind_in_reverse_order() {
        let chain = vec![
            from_middleware(Arc::new(Tag("outer"))),
            from_middleware(Arc::new(Tag("inner"))),
            endpoint(StatusCode::Ok),
        ];
        let response = Next::new(chain).run(ctx("/")).await;
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.headers().get("x-order"), Some("inner,outer"));
    }

    #[tokio::test]
    async fn logger_passes_response_through() {
        let chain = vec![
            from_middleware(Arc::new(LoggerMiddleware)),
            endpoint(StatusCode::NotFound),
        ];
        let response = Next::new(chain).run(ctx("/missing")).await;
        assert_eq!(response.status(), StatusCode::NotFound);
    }
}
