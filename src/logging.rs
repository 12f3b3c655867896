//! Setup for the application logging.
//!
//! Log records go to standard output with the level and style picked in the
//! [`Settings`](crate::config::Settings). `off` disables the subscriber
//! entirely. Otherwise `RUST_LOG` directives, when present, refine the
//! configured level per target (e.g. `RUST_LOG=stackcheck::status=trace`).
use std::sync::Once;

use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{LogLevel, LogStyle, Settings};

static INIT: Once = Once::new();

/// Installs the global subscriber. Calling it again is a no-op.
pub fn setup(settings: &Settings) {
    let level = map_to_level_filter(settings.log_level);

    if level == LevelFilter::OFF {
        return;
    }

    INIT.call_once(|| {
        let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        stdout_init(level, directives.as_deref(), settings.log_style);
    });
}

fn map_to_level_filter(log_level: LogLevel) -> LevelFilter {
    match log_level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// The configured level, unless `directives` name something more specific.
fn build_filter(level: LevelFilter, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn stdout_init(filter: LevelFilter, directives: Option<&str>, style: LogStyle) {
    let builder = tracing_subscriber::fmt().with_env_filter(build_filter(filter, directives));

    let () = match style {
        LogStyle::Default => builder.with_ansi(true).init(),
        LogStyle::Pretty => builder.pretty().with_file(true).init(),
        LogStyle::Compact => builder.compact().init(),
        LogStyle::Json => builder.json().init(),
    };

    info!(level = %filter, ?style, "logging initialized");
}
