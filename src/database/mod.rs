//! MySQL connectivity check.
//!
//! Opening the connection is the check: the handshake authenticates the user
//! and selects the database, so a wrong password, an unknown database or an
//! unreachable host all surface here. With
//! [`round_trip`](crate::config::DatabaseSettings::round_trip) enabled a
//! `SELECT 1` is issued as well.
//!
//! The client is blocking; callers run it on a blocking thread.
use std::time::Duration;

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder};
use thiserror::Error;
use tracing::debug;

use crate::config::DatabaseSettings;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("{source}")]
    Connect {
        #[source]
        source: mysql::Error,
    },

    #[error("{source}")]
    Query {
        #[source]
        source: mysql::Error,
    },
}

/// Something that can prove the database is reachable.
pub trait DatabaseCheck: Send + Sync {
    /// Blocks until the database answered or failed.
    ///
    /// # Errors
    ///
    /// Will return a [`DatabaseError`] describing why the database could not be used.
    fn check(&self) -> Result<(), DatabaseError>;
}

/// Connects to MySQL with the configured credentials and drops the connection.
#[derive(Debug, Clone)]
pub struct MysqlCheck {
    settings: DatabaseSettings,
    timeout: Option<Duration>,
}

impl MysqlCheck {
    pub fn new(settings: DatabaseSettings, timeout: Option<Duration>) -> Self {
        Self { settings, timeout }
    }

    fn opts(&self) -> OptsBuilder {
        OptsBuilder::new()
            .ip_or_hostname(Some(self.settings.host.as_str()))
            .tcp_port(self.settings.port)
            .db_name(Some(self.settings.name.as_str()))
            .user(Some(self.settings.user.as_str()))
            .pass(Some(self.settings.password.as_str()))
            .tcp_connect_timeout(self.timeout)
            .read_timeout(self.timeout)
            .write_timeout(self.timeout)
    }
}

impl DatabaseCheck for MysqlCheck {
    fn check(&self) -> Result<(), DatabaseError> {
        debug!(
            host = %self.settings.host,
            port = self.settings.port,
            database = %self.settings.name,
            "connecting to MySQL"
        );

        let mut conn = Conn::new(self.opts()).map_err(|source| DatabaseError::Connect { source })?;

        verify(&mut conn, self.settings.round_trip)
    }
}

/// The part of an open connection the check uses after the handshake.
trait Session {
    fn select_one(&mut self) -> mysql::Result<()>;
}

impl Session for Conn {
    fn select_one(&mut self) -> mysql::Result<()> {
        self.query_drop("SELECT 1")
    }
}

fn verify(session: &mut impl Session, round_trip: bool) -> Result<(), DatabaseError> {
    if round_trip {
        session
            .select_one()
            .map_err(|source| DatabaseError::Query { source })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    // A port that was free a moment ago; nothing listens on it.
    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn unreachable_server_is_a_connect_error_with_text() {
        let settings = DatabaseSettings {
            host: "127.0.0.1".to_owned(),
            port: closed_port(),
            ..DatabaseSettings::default()
        };
        let check = MysqlCheck::new(settings, Some(Duration::from_secs(2)));

        let err = check.check().unwrap_err();
        assert!(matches!(err, DatabaseError::Connect { .. }));
        assert!(!err.to_string().is_empty());
    }

    #[derive(Default)]
    struct Recorded {
        queries: usize,
        fail: bool,
    }

    impl Session for Recorded {
        fn select_one(&mut self) -> mysql::Result<()> {
            self.queries += 1;
            if self.fail {
                return Err(mysql::Error::IoError(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "server went away",
                )));
            }
            Ok(())
        }
    }

    #[test]
    fn handshake_alone_is_enough_by_default() {
        let mut session = Recorded::default();
        verify(&mut session, false).unwrap();
        assert_eq!(session.queries, 0);
    }

    #[test]
    fn round_trip_issues_one_query() {
        let mut session = Recorded::default();
        verify(&mut session, true).unwrap();
        assert_eq!(session.queries, 1);
    }

    #[test]
    fn failed_round_trip_is_a_query_error() {
        let mut session = Recorded {
            fail: true,
            ..Recorded::default()
        };
        let err = verify(&mut session, true).unwrap_err();
        assert!(matches!(err, DatabaseError::Query { .. }));
        assert!(err.to_string().contains("server went away"));
    }

    #[test]
    fn options_carry_the_configured_target() {
        let check = MysqlCheck::new(DatabaseSettings::default(), None);
        let opts: mysql::Opts = check.opts().into();
        assert_eq!(opts.get_ip_or_hostname(), "db");
        assert_eq!(opts.get_tcp_port(), 3306);
        assert_eq!(opts.get_db_name().as_deref(), Some("statamic"));
        assert_eq!(opts.get_user().as_deref(), Some("statamic"));
    }
}
