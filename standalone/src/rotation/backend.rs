//! Database access used by credential rotation.

use std::sync::{Mutex, PoisonError};

use crate::connection_url::DatabaseTarget;
use crate::error::{Error, Result};

/// One password change request.
#[derive(Debug, Clone, Copy)]
pub struct PasswordChange<'a> {
    /// Server to connect to.
    pub target: &'a DatabaseTarget,
    /// Account to connect as and whose password changes.
    pub username: &'a str,
    /// Credential currently accepted by the server.
    pub old_password: &'a str,
    /// Credential to install.
    pub new_password: &'a str,
}

/// What happened to the database server after a successful change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// The server accepted the shutdown signal. It must be restarted before
    /// anything connects again.
    Stopped,
    /// Shutdown was not requested; privileges were reloaded instead.
    Running,
    /// The change was made but the shutdown signal failed. The server may
    /// keep accepting the old password until it restarts.
    ShutdownFailed,
}

/// Something that can change a database user's password.
///
/// Implementations must close their connection on every path and must only
/// return `Ok` once the change statement itself has succeeded.
pub trait CredentialBackend: Send + Sync {
    /// Connect with `change.old_password` and install `change.new_password`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialRotation`] if connecting, authenticating,
    /// or running the change fails.
    fn change_password(&self, change: &PasswordChange<'_>) -> Result<ServerState>;
}

/// A password change seen by [`MockCredentialBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedChange {
    /// Server that would have been contacted.
    pub target: DatabaseTarget,
    /// Account name.
    pub username: String,
    /// Credential used to connect.
    pub old_password: String,
    /// Credential that would have been installed.
    pub new_password: String,
}

/// In-memory backend that records requests and succeeds or fails on demand.
///
/// # Examples
///
/// ```
/// use standalone::rotation::{CredentialRotator, MockCredentialBackend};
///
/// let rotator = CredentialRotator::new(MockCredentialBackend::failing("connection refused"));
/// let url = "jdbc:mysql:mxj://localhost:3306/openmrs";
///
/// assert!(!rotator.rotate(url, "openmrs", "test", "n3wPassw0rd.."));
/// assert_eq!(rotator.backend().calls().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockCredentialBackend {
    failure: Option<String>,
    calls: Mutex<Vec<RecordedChange>>,
}

impl MockCredentialBackend {
    /// A backend where every change succeeds and stops the server.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// A backend where every change fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            calls: Mutex::default(),
        }
    }

    /// Every change requested so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedChange> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialBackend for MockCredentialBackend {
    fn change_password(&self, change: &PasswordChange<'_>) -> Result<ServerState> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedChange {
                target: change.target.clone(),
                username: change.username.to_string(),
                old_password: change.old_password.to_string(),
                new_password: change.new_password.to_string(),
            });

        match &self.failure {
            Some(reason) => Err(Error::CredentialRotation {
                reason: reason.clone(),
            }),
            None => Ok(ServerState::Stopped),
        }
    }
}
