//! # stackcheck
//!
//! A smoke-test page for containerised stacks. Every request to `/` renders
//! an HTML page with a banner, a bounded environment report, and the outcome
//! of two connectivity checks: MySQL (connect) and Valkey (SET then GET).
//! Failures are reported inline; the page itself always answers `200 OK`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stackcheck::app::{App, AppState};
//! use stackcheck::config::Settings;
//! use stackcheck::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::default();
//!     let server = Server::bind(&settings.bind).await?;
//!     let app = App::new(AppState::new(settings));
//!     server
//!         .run(move |req| {
//!             let app = app.clone();
//!             async move { app.handle(req).await }
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

// ── HTTP plumbing ─────────────────────────────────────────────────────────────
pub mod context;
pub mod http;
pub mod middleware;
pub mod router;
pub mod security;
pub mod server;

// ── Service ───────────────────────────────────────────────────────────────────
pub mod app;
pub mod cache;
pub mod config;
pub mod database;
pub mod logging;
pub mod page;
pub mod report;
pub mod status;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
