//! Request routing: map paths and methods to handler functions.
//!
//! Paths are matched exactly after trailing-slash normalization, so
//! `/status.json/` and `/status.json` are the same route. Routes are matched
//! in registration order. A path that is known under a different method
//! answers `405 Method Not Allowed` with an `Allow` header; an unknown path
//! answers `404 Not Found`.
//!
//! Middleware registered with [`Router::layer`] wraps every dispatch,
//! fallbacks included, in registration order (first layer is outermost).

use std::sync::Arc;

use crate::context::Context;
use crate::middleware::{BoxFuture, Middleware, MiddlewareHandler, Next, from_middleware};
use crate::{Method, Request, Response, StatusCode};

/// Type-erased async handler.
pub type Handler = Arc<dyn Fn(Context) -> BoxFuture + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Implemented for every `Fn(Context) -> impl Future<Output = Response>` that
/// is `Send + Sync + 'static`.
pub trait IntoHandler: Send + Sync + 'static {
    fn call(&self, ctx: Context) -> BoxFuture;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture {
        Box::pin((self)(ctx))
    }
}

// Strips one trailing slash, leaving the root path alone.
fn normalize(path: &str) -> &str {
    if path != "/" {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Outcome of looking a request up in the route table.
enum Dispatch {
    Found(Handler),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// HTTP request router.
///
/// # Examples
///
/// ```rust,no_run
/// use stackcheck::context::Context;
/// use stackcheck::{Router, Response, StatusCode};
///
/// let mut router = Router::new();
/// router.get("/ping", |_ctx: Context| async { Response::new(StatusCode::Ok).body("pong") });
/// ```
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
    layers: Vec<MiddlewareHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `GET` requests to `path`.
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Get, path, handler);
    }

    /// Register a handler for an arbitrary method.
    pub fn add_route(&mut self, method: Method, path: &str, handler: impl IntoHandler) {
        let handler: Handler = Arc::new(move |ctx| handler.call(ctx));
        self.routes.push(Route {
            method,
            path: normalize(path).to_owned(),
            handler,
        });
    }

    /// Wrap every dispatch in `middleware`.
    pub fn layer<M: Middleware + 'static>(&mut self, middleware: M) {
        self.layers.push(from_middleware(Arc::new(middleware)));
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn lookup(&self, method: &Method, path: &str) -> Dispatch {
        let path = normalize(path);
        let mut allowed = Vec::new();

        for route in self.routes.iter().filter(|r| r.path == path) {
            if &route.method == method {
                return Dispatch::Found(Arc::clone(&route.handler));
            }
            if !allowed.contains(&route.method) {
                allowed.push(route.method.clone());
            }
        }

        if allowed.is_empty() {
            Dispatch::NotFound
        } else {
            Dispatch::MethodNotAllowed(allowed)
        }
    }

    /// Dispatch `request` through the middleware layers to the matching route.
    pub async fn route(&self, request: Request) -> Response {
        let endpoint: MiddlewareHandler = match self.lookup(request.method(), request.path()) {
            Dispatch::Found(handler) => {
                Arc::new(move |ctx: Context, _next: Next| -> BoxFuture { handler(ctx) })
            }
            Dispatch::MethodNotAllowed(allowed) => {
                let allow = allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                Arc::new(move |_ctx: Context, _next: Next| -> BoxFuture {
                    let allow = allow.clone();
                    Box::pin(async move {
                        Response::new(StatusCode::MethodNotAllowed)
                            .header("Allow", allow)
                            .body("Method Not Allowed")
                    })
                })
            }
            Dispatch::NotFound => Arc::new(|_ctx: Context, _next: Next| -> BoxFuture {
                Box::pin(async { Response::new(StatusCode::NotFound).body("Not Found") })
            }),
        };

        let mut chain = self.layers.clone();
        chain.push(endpoint);

        Next::new(chain).run(Context::new(request)).await
    }
}
