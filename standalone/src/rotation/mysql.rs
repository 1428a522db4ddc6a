//! MySQL implementation of [`CredentialBackend`].
//!
//! sqlx is async, but rotation runs inside a synchronous start-up sequence.
//! Each call builds a current-thread runtime, drives the whole exchange on
//! it, and drops it before returning.

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;

use super::backend::{CredentialBackend, PasswordChange, ServerState};
use crate::error::{Error, Result};

/// Statement that installs a new password for a user.
///
/// Targets the pre-8.0 grant tables used by the bundled server; the change
/// only takes effect after a privilege reload or a restart.
const CHANGE_PASSWORD_SQL: &str = "UPDATE mysql.user SET password = PASSWORD(?) WHERE User = ?";

/// Default bound on establishing the connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Changes passwords on a MySQL server over a regular client connection.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use standalone::rotation::MySqlBackend;
///
/// let backend = MySqlBackend::new(Duration::from_secs(5)).with_shutdown(false);
/// assert_eq!(backend.connect_timeout(), Duration::from_secs(5));
/// assert!(!backend.shuts_down());
/// ```
#[derive(Debug, Clone)]
pub struct MySqlBackend {
    connect_timeout: Duration,
    shutdown: bool,
}

impl Default for MySqlBackend {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl MySqlBackend {
    /// Create a backend that gives up connecting after `connect_timeout` and
    /// shuts the server down after a successful change.
    #[must_use]
    pub const fn new(connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            shutdown: true,
        }
    }

    /// Choose whether to shut the server down after a change. When disabled,
    /// privileges are reloaded instead.
    #[must_use]
    pub const fn with_shutdown(mut self, shutdown: bool) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// The connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Whether a successful change is followed by a server shutdown.
    #[must_use]
    pub const fn shuts_down(&self) -> bool {
        self.shutdown
    }

    async fn run(&self, change: &PasswordChange<'_>) -> Result<ServerState> {
        let target = change.target;
        let mut options = MySqlConnectOptions::new()
            .host(&target.host)
            .port(target.port)
            .username(change.username)
            .password(change.old_password);
        if let Some(db) = &target.database {
            options = options.database(db);
        }

        let mut conn =
            match tokio::time::timeout(self.connect_timeout, MySqlConnection::connect_with(&options))
                .await
            {
                Ok(Ok(conn)) => conn,
                Ok(Err(e)) => return Err(rotation_error(format!("cannot connect to {target}: {e}"))),
                Err(_) => {
                    return Err(rotation_error(format!(
                        "timed out after {:?} connecting to {target}",
                        self.connect_timeout
                    )))
                }
            };

        let changed = sqlx::query(CHANGE_PASSWORD_SQL)
            .bind(change.new_password)
            .bind(change.username)
            .execute(&mut conn)
            .await;

        let outcome = match changed {
            Ok(done) => {
                log::debug!(
                    "password statement for '{}' touched {} row(s)",
                    change.username,
                    done.rows_affected()
                );
                Ok(self.after_change(&mut conn).await)
            }
            Err(e) => Err(rotation_error(format!(
                "password change for '{}' failed: {e}",
                change.username
            ))),
        };

        // A server that just shut down drops the socket, so a failed close is
        // expected there.
        if let Err(e) = conn.close().await {
            log::debug!("closing connection to {target}: {e}");
        }

        outcome
    }

    async fn after_change(&self, conn: &mut MySqlConnection) -> ServerState {
        if !self.shutdown {
            if let Err(e) = sqlx::raw_sql("FLUSH PRIVILEGES").execute(&mut *conn).await {
                log::warn!("cannot reload privileges after password change: {e}");
            }
            return ServerState::Running;
        }

        match sqlx::raw_sql("SHUTDOWN").execute(&mut *conn).await {
            Ok(_) => ServerState::Stopped,
            Err(e) => {
                log::warn!("cannot stop MySQL after password change: {e}");
                ServerState::ShutdownFailed
            }
        }
    }
}

impl CredentialBackend for MySqlBackend {
    fn change_password(&self, change: &PasswordChange<'_>) -> Result<ServerState> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run(change))
    }
}

fn rotation_error(reason: String) -> Error {
    Error::CredentialRotation { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection_url::DatabaseTarget;
    use std::net::TcpListener;

    #[test]
    fn test_defaults() {
        let backend = MySqlBackend::default();
        assert_eq!(backend.connect_timeout(), DEFAULT_CONNECT_TIMEOUT);
        assert!(backend.shuts_down());
    }

    #[test]
    fn test_connection_refused_is_rotation_error() {
        // Bind then drop to get a port nobody is listening on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let target = DatabaseTarget {
            host: "127.0.0.1".to_string(),
            port,
            database: Some("openmrs".to_string()),
        };
        let change = PasswordChange {
            target: &target,
            username: "openmrs",
            old_password: "test",
            new_password: "aaaaaaaaaaaa",
        };

        let backend = MySqlBackend::new(Duration::from_secs(5));
        let err = backend.change_password(&change).unwrap_err();
        assert!(matches!(err, Error::CredentialRotation { .. }));
    }

    #[test]
    fn test_silent_server_times_out() {
        // Accepts the TCP connection but never sends the MySQL handshake.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let target = DatabaseTarget {
            host: "127.0.0.1".to_string(),
            port: listener.local_addr().unwrap().port(),
            database: None,
        };
        let change = PasswordChange {
            target: &target,
            username: "openmrs",
            old_password: "test",
            new_password: "aaaaaaaaaaaa",
        };

        let backend = MySqlBackend::new(Duration::from_millis(200));
        let err = backend.change_password(&change).unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
