//! The two connectivity checks, run in a fixed order.
//!
//! Database first, then cache. Each check runs to completion on Tokio's
//! blocking pool before the next one starts. A failure is logged and turned
//! into a [`CheckResult`]; it never skips the other check and never escapes
//! as an error.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, warn};

use crate::cache::{CacheCheck, CacheError};
use crate::database::{DatabaseCheck, DatabaseError};

/// Key written to the cache on every request.
pub const CACHE_TEST_KEY: &str = "test_key";

/// Value written under [`CACHE_TEST_KEY`] and expected back.
pub const CACHE_TEST_VALUE: &str = "Hello from Valkey!";

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("check aborted: {0}")]
    Aborted(#[from] JoinError),
}

/// Which dependency a result is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Database,
    Cache,
}

impl Dependency {
    /// Product name used in the status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Database => "MySQL",
            Self::Cache => "Valkey",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `retrieved` holds the value read back, for checks that read one.
    Passed { retrieved: Option<String> },
    /// `reason` is never empty.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub dependency: Dependency,
    pub outcome: Outcome,
}

impl CheckResult {
    pub fn passed(dependency: Dependency, retrieved: Option<String>) -> Self {
        Self {
            dependency,
            outcome: Outcome::Passed { retrieved },
        }
    }

    pub fn failed(dependency: Dependency, error: &CheckError) -> Self {
        let mut reason = error.to_string();
        if reason.trim().is_empty() {
            reason = format!("{error:?}");
        }
        Self {
            dependency,
            outcome: Outcome::Failed { reason },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Passed { .. })
    }

    /// The human readable line, e.g. `MySQL connection successful!`.
    pub fn summary(&self) -> String {
        let label = self.dependency.label();
        match &self.outcome {
            Outcome::Passed { retrieved: None } => format!("{label} connection successful!"),
            Outcome::Passed {
                retrieved: Some(value),
            } => format!("{label} connection successful! Retrieved value: {value}"),
            Outcome::Failed { reason } => format!("{label} connection failed: {reason}"),
        }
    }
}

/// JSON shape of one check.
#[derive(Debug, Serialize)]
pub struct CheckSummary {
    pub ok: bool,
    pub message: String,
}

impl From<&CheckResult> for CheckSummary {
    fn from(result: &CheckResult) -> Self {
        Self {
            ok: result.is_ok(),
            message: result.summary(),
        }
    }
}

/// Outcome of one pass over both dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub database: CheckResult,
    pub cache: CheckResult,
}

impl StatusReport {
    pub fn all_ok(&self) -> bool {
        self.database.is_ok() && self.cache.is_ok()
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub database: CheckSummary,
    pub cache: CheckSummary,
}

impl From<&StatusReport> for StatusSummary {
    fn from(report: &StatusReport) -> Self {
        Self {
            database: (&report.database).into(),
            cache: (&report.cache).into(),
        }
    }
}

/// Runs the configured checks.
#[derive(Clone)]
pub struct Checks {
    database: Arc<dyn DatabaseCheck>,
    cache: Arc<dyn CacheCheck>,
}

impl Checks {
    pub fn new(database: Arc<dyn DatabaseCheck>, cache: Arc<dyn CacheCheck>) -> Self {
        Self { database, cache }
    }

    /// Database, then cache. Never fails.
    pub async fn run(&self) -> StatusReport {
        let database = self.check_database().await;
        let cache = self.check_cache().await;
        let report = StatusReport { database, cache };
        if report.all_ok() {
            debug!("all dependencies reachable");
        } else {
            warn!("at least one dependency is unreachable");
        }
        report
    }

    async fn check_database(&self) -> CheckResult {
        let check = Arc::clone(&self.database);
        let result = blocking(move || check.check()).await;

        match result {
            Ok(()) => {
                debug!("database check passed");
                CheckResult::passed(Dependency::Database, None)
            }
            Err(e) => {
                warn!(error = %e, "database check failed");
                CheckResult::failed(Dependency::Database, &e)
            }
        }
    }

    async fn check_cache(&self) -> CheckResult {
        let check = Arc::clone(&self.cache);
        let result = blocking(move || check.round_trip(CACHE_TEST_KEY, CACHE_TEST_VALUE)).await;

        match result {
            Ok(value) => {
                debug!(%value, "cache check passed");
                CheckResult::passed(Dependency::Cache, Some(value))
            }
            Err(e) => {
                warn!(error = %e, "cache check failed");
                CheckResult::failed(Dependency::Cache, &e)
            }
        }
    }
}

async fn blocking<T, E, F>(f: F) -> Result<T, CheckError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<CheckError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await?.map_err(Into::into)
}
