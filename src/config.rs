//! Service configuration.
//!
//! Every option is a command-line flag with an environment-variable fallback,
//! so a container can be configured purely through its environment:
//!
//! ```text
//! stackcheck --db-host mysql --cache-port 6380
//! STACKCHECK_DB_HOST=mysql STACKCHECK_CACHE_PORT=6380 stackcheck
//! ```
//!
//! Defaults match the stock compose setup: MySQL at `db` (database and user
//! `statamic`, password `secret`) and Valkey at `valkey:6379`.
use std::fmt;
use std::time::Duration;

use clap::{Parser, ValueEnum};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_HOST: &str = "db";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_NAME: &str = "statamic";
pub const DEFAULT_DB_USER: &str = "statamic";
pub const DEFAULT_DB_PASSWORD: &str = "secret";
pub const DEFAULT_CACHE_HOST: &str = "valkey";
pub const DEFAULT_CACHE_PORT: u16 = 6379;

const REDACTED: &str = "********";

#[derive(Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Address the status page listens on.
    #[clap(long, env = "STACKCHECK_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// MySQL host.
    #[clap(long, env = "STACKCHECK_DB_HOST", default_value = DEFAULT_DB_HOST)]
    pub db_host: String,

    /// MySQL port.
    #[clap(long, env = "STACKCHECK_DB_PORT", default_value_t = DEFAULT_DB_PORT)]
    pub db_port: u16,

    /// MySQL database name.
    #[clap(long, env = "STACKCHECK_DB_NAME", default_value = DEFAULT_DB_NAME)]
    pub db_name: String,

    /// MySQL user.
    #[clap(long, env = "STACKCHECK_DB_USER", default_value = DEFAULT_DB_USER)]
    pub db_user: String,

    /// MySQL password.
    #[clap(
        long,
        env = "STACKCHECK_DB_PASSWORD",
        default_value = DEFAULT_DB_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub db_password: String,

    /// Run `SELECT 1` after connecting instead of stopping at the handshake.
    #[clap(long, env = "STACKCHECK_DB_ROUND_TRIP")]
    pub db_round_trip: bool,

    /// Valkey host.
    #[clap(long, env = "STACKCHECK_CACHE_HOST", default_value = DEFAULT_CACHE_HOST)]
    pub cache_host: String,

    /// Valkey port.
    #[clap(long, env = "STACKCHECK_CACHE_PORT", default_value_t = DEFAULT_CACHE_PORT)]
    pub cache_port: u16,

    /// Connect/read timeout for both checks, in seconds. Unset means wait forever.
    #[clap(long, env = "STACKCHECK_CHECK_TIMEOUT")]
    pub check_timeout: Option<u64>,

    #[clap(long, env = "STACKCHECK_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[clap(long, env = "STACKCHECK_LOG_STYLE", value_enum, default_value_t = LogStyle::Default)]
    pub log_style: LogStyle,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    Default,
    Pretty,
    Compact,
    Json,
}

/// Where and how to reach MySQL.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub round_trip: bool,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("round_trip", &self.round_trip)
            .finish()
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_owned(),
            port: DEFAULT_DB_PORT,
            name: DEFAULT_DB_NAME.to_owned(),
            user: DEFAULT_DB_USER.to_owned(),
            password: DEFAULT_DB_PASSWORD.to_owned(),
            round_trip: false,
        }
    }
}

/// Where to reach Valkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub host: String,
    pub port: u16,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_CACHE_HOST.to_owned(),
            port: DEFAULT_CACHE_PORT,
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind: String,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub check_timeout: Option<Duration>,
    pub log_level: LogLevel,
    pub log_style: LogStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_owned(),
            database: DatabaseSettings::default(),
            cache: CacheSettings::default(),
            check_timeout: None,
            log_level: LogLevel::Info,
            log_style: LogStyle::Default,
        }
    }
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Self {
            bind: args.bind,
            database: DatabaseSettings {
                host: args.db_host,
                port: args.db_port,
                name: args.db_name,
                user: args.db_user,
                password: args.db_password,
                round_trip: args.db_round_trip,
            },
            cache: CacheSettings {
                host: args.cache_host,
                port: args.cache_port,
            },
            // A zero timeout would make every check fail instantly.
            check_timeout: args
                .check_timeout
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            log_level: args.log_level,
            log_style: args.log_style,
        }
    }
}

impl Settings {
    /// Parses flags and environment of the current process.
    pub fn from_env() -> Self {
        Args::parse().into()
    }

    /// Label/value pairs describing the configuration, password redacted.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Listen address", self.bind.clone()),
            ("Database host", format!("{}:{}", self.database.host, self.database.port)),
            ("Database name", self.database.name.clone()),
            ("Database user", self.database.user.clone()),
            ("Database password", REDACTED.to_owned()),
            (
                "Database check",
                if self.database.round_trip {
                    "connect + SELECT 1".to_owned()
                } else {
                    "connect only".to_owned()
                },
            ),
            ("Cache host", format!("{}:{}", self.cache.host, self.cache.port)),
            (
                "Check timeout",
                self.check_timeout
                    .map_or_else(|| "none".to_owned(), |t| format!("{}s", t.as_secs())),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Settings {
        let mut full = vec!["stackcheck"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap().into()
    }

    #[test]
    fn defaults_match_the_compose_setup() {
        // Only holds while no STACKCHECK_* variable is set in the test environment.
        let settings = parse(&[]);
        assert_eq!(settings.database, DatabaseSettings::default());
        assert_eq!(settings.cache, CacheSettings::default());
        assert_eq!(settings.database.host, "db");
        assert_eq!(settings.database.name, "statamic");
        assert_eq!(settings.cache.port, 6379);
        assert_eq!(settings.check_timeout, None);
    }

    #[test]
    fn flags_override_defaults() {
        let settings = parse(&[
            "--db-host",
            "mysql.internal",
            "--db-port",
            "3307",
            "--cache-host",
            "redis",
            "--check-timeout",
            "3",
            "--db-round-trip",
            "--log-level",
            "debug",
            "--log-style",
            "json",
        ]);
        assert_eq!(settings.database.host, "mysql.internal");
        assert_eq!(settings.database.port, 3307);
        assert!(settings.database.round_trip);
        assert_eq!(settings.cache.host, "redis");
        assert_eq!(settings.check_timeout, Some(Duration::from_secs(3)));
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.log_style, LogStyle::Json);
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        assert_eq!(parse(&["--check-timeout", "0"]).check_timeout, None);
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Args::try_parse_from(["stackcheck", "--cache-port", "70000"]).is_err());
    }

    #[test]
    fn password_never_leaks() {
        let mut settings = Settings::default();
        settings.database.password = "hunter2".to_owned();

        assert!(!format!("{settings:?}").contains("hunter2"));
        assert!(
            settings
                .describe()
                .iter()
                .all(|(_, value)| !value.contains("hunter2"))
        );
    }
}
