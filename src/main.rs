//! Status page binary.
//!
//! ```text
//! stackcheck --bind 0.0.0.0:8080 --db-host db --cache-host valkey
//! STACKCHECK_DB_PASSWORD=secret stackcheck
//! ```
use anyhow::{Context, Result};
use stackcheck::app::{App, AppState};
use stackcheck::config::Settings;
use stackcheck::server::Server;
use stackcheck::{Request, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env();

    logging::setup(&settings);

    info!(
        database = %format!("{}:{}", settings.database.host, settings.database.port),
        cache = %format!("{}:{}", settings.cache.host, settings.cache.port),
        "starting status page"
    );

    let server = Server::bind(&settings.bind)
        .await
        .with_context(|| format!("can't listen on {}", settings.bind))?;

    let app = App::new(AppState::new(settings));

    server
        .run_until(
            move |req: Request| {
                let app = app.clone();
                async move { app.handle(req).await }
            },
            shutdown_signal(),
        )
        .await?;

    info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Ctrl-C received"),
        () = terminate => info!("SIGTERM received"),
    }
}
