//! Application wiring: routes, middleware and the checks behind them.
//!
//! | Route               | Handler                |
//! |---------------------|------------------------|
//! | `GET /`             | HTML status page       |
//! | `GET /index.php`    | HTML status page       |
//! | `GET /status.json`  | JSON status            |
//!
//! Both handlers always answer `200`; check failures are part of the body.

use std::sync::Arc;
use std::time::Instant;

use crate::cache::ValkeyCheck;
use crate::config::Settings;
use crate::context::Context;
use crate::database::MysqlCheck;
use crate::middleware::LoggerMiddleware;
use crate::page;
use crate::report::EnvironmentReport;
use crate::router::Router;
use crate::security::SecurityHeaders;
use crate::status::{Checks, StatusSummary};
use crate::{Request, Response};

/// Shared, read-only state of the running service.
pub struct AppState {
    pub settings: Settings,
    pub checks: Checks,
    pub started: Instant,
}

impl AppState {
    /// State backed by the real MySQL and Valkey clients.
    pub fn new(settings: Settings) -> Self {
        let timeout = settings.check_timeout;
        let checks = Checks::new(
            Arc::new(MysqlCheck::new(settings.database.clone(), timeout)),
            Arc::new(ValkeyCheck::new(settings.cache.clone(), timeout)),
        );
        Self::with_checks(settings, checks)
    }

    pub fn with_checks(settings: Settings, checks: Checks) -> Self {
        Self {
            settings,
            checks,
            started: Instant::now(),
        }
    }
}

/// The served application: a router bound to its state.
#[derive(Clone)]
pub struct App {
    router: Arc<Router>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let state = Arc::new(state);
        let mut router = Router::new();

        router.layer(LoggerMiddleware);
        router.layer(SecurityHeaders::new());

        for path in ["/", "/index.php"] {
            let state = Arc::clone(&state);
            router.get(path, move |ctx: Context| status_page(Arc::clone(&state), ctx));
        }

        let json_state = Arc::clone(&state);
        router.get("/status.json", move |ctx: Context| status_json(Arc::clone(&json_state), ctx));

        Self {
            router: Arc::new(router),
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        self.router.route(request).await
    }
}

async fn status_page(state: Arc<AppState>, _ctx: Context) -> Response {
    let environment = EnvironmentReport::collect(&state.settings, state.started);
    let status = state.checks.run().await;
    Response::html(page::render(&environment, &status))
}

async fn status_json(state: Arc<AppState>, _ctx: Context) -> Response {
    let status = state.checks.run().await;
    Response::json(&StatusSummary::from(&status))
}
