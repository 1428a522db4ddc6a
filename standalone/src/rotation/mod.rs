//! One-time rotation of the default database password.
//!
//! The bundled database ships with the password `test`. On first start the
//! launcher replaces it with a generated one. The flow is:
//!
//! 1. connect with the old password
//! 2. run the password change
//! 3. signal the server to shut down so the change takes effect
//!
//! A successful rotation therefore leaves the database server stopped; the
//! surrounding launcher has to start it again before anything connects.
//! Only `test` is ever rotated. Any other stored password is treated as
//! already chosen by an administrator.

mod backend;
mod mysql;
mod password;

pub use backend::{
    CredentialBackend, MockCredentialBackend, PasswordChange, RecordedChange, ServerState,
};
pub use mysql::{MySqlBackend, DEFAULT_CONNECT_TIMEOUT};
pub use password::{
    generate_password, generate_password_with, PASSWORD_ALPHABET, PASSWORD_LENGTH,
};

use crate::connection_url::DatabaseTarget;
use crate::error::{Error, Result};

/// The insecure password the bundled database ships with.
pub const DEFAULT_PASSWORD: &str = "test";

/// Rotates the default password through a [`CredentialBackend`].
#[derive(Debug, Default)]
pub struct CredentialRotator<B = MySqlBackend> {
    backend: B,
}

impl<B: CredentialBackend> CredentialRotator<B> {
    /// Create a rotator over `backend`.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The backend this rotator talks to.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace `old_password` with `new_password` for `username`.
    ///
    /// Returns `true` only if the server accepted the change. Failures are
    /// logged; the caller must keep the old password in that case.
    pub fn rotate(
        &self,
        connection_url: &str,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> bool {
        match self.try_rotate(connection_url, username, old_password, new_password) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    /// Like [`rotate`](Self::rotate), reporting why a rotation did not happen
    /// and what state the server was left in.
    ///
    /// # Errors
    ///
    /// - [`Error::CredentialRotation`] if `old_password` is not
    ///   [`DEFAULT_PASSWORD`] (the backend is not contacted) or the backend
    ///   fails.
    /// - [`Error::InvalidConnectionUrl`] if `connection_url` cannot be parsed.
    pub fn try_rotate(
        &self,
        connection_url: &str,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<ServerState> {
        if old_password != DEFAULT_PASSWORD {
            return Err(Error::CredentialRotation {
                reason: "only the default password is rotated".to_string(),
            });
        }

        let target = DatabaseTarget::parse(connection_url)?;
        log::info!("rotating default database password for '{username}' on {target}");

        let state = self.backend.change_password(&PasswordChange {
            target: &target,
            username,
            old_password,
            new_password,
        })?;

        if state == ServerState::Stopped {
            log::info!("database server stopped so the new password takes effect");
        }
        Ok(state)
    }
}
