//! Valkey connectivity check.
//!
//! Writes one key, reads it back and hands the value to the caller. Valkey
//! speaks the Redis protocol, so the `redis` client is used as is.
//!
//! The client is blocking; callers run it on a blocking thread.
use std::time::Duration;

use redis::{Client, Commands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use thiserror::Error;
use tracing::debug;

use crate::config::CacheSettings;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{source}")]
    Connect {
        #[source]
        source: redis::RedisError,
    },

    #[error("{source}")]
    Set {
        #[source]
        source: redis::RedisError,
    },

    #[error("{source}")]
    Get {
        #[source]
        source: redis::RedisError,
    },
}

/// Something that can store a value and give it back.
pub trait CacheCheck: Send + Sync {
    /// Writes `key = value`, then reads `key` and returns what the store holds.
    /// A key that is gone by the time it is read comes back as an empty string.
    ///
    /// # Errors
    ///
    /// Will return a [`CacheError`] for the step that failed.
    fn round_trip(&self, key: &str, value: &str) -> Result<String, CacheError>;
}

/// Talks to a Valkey (or Redis) server over plain TCP.
#[derive(Debug, Clone)]
pub struct ValkeyCheck {
    settings: CacheSettings,
    timeout: Option<Duration>,
}

impl ValkeyCheck {
    pub fn new(settings: CacheSettings, timeout: Option<Duration>) -> Self {
        Self { settings, timeout }
    }

    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.settings.host.clone(), self.settings.port),
            redis: RedisConnectionInfo::default(),
        }
    }

    fn connect(&self) -> redis::RedisResult<redis::Connection> {
        let client = Client::open(self.connection_info())?;
        match self.timeout {
            Some(timeout) => {
                let conn = client.get_connection_with_timeout(timeout)?;
                conn.set_read_timeout(Some(timeout))?;
                conn.set_write_timeout(Some(timeout))?;
                Ok(conn)
            }
            None => client.get_connection(),
        }
    }
}

impl CacheCheck for ValkeyCheck {
    fn round_trip(&self, key: &str, value: &str) -> Result<String, CacheError> {
        debug!(host = %self.settings.host, port = self.settings.port, "connecting to Valkey");

        let mut conn = self.connect().map_err(|source| CacheError::Connect { source })?;

        let () = conn
            .set(key, value)
            .map_err(|source| CacheError::Set { source })?;

        let value: Option<String> = conn.get(key).map_err(|source| CacheError::Get { source })?;
        Ok(value.unwrap_or_default())
    }
}
