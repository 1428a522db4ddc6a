//! Error types for the standalone library.
//!
//! Only [`Error::ConfigLoad`] is meant to stop a reconciliation. The other
//! variants exist so each component can report what went wrong; the
//! orchestrator decides which of them to tolerate.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a standalone error.
///
/// # Examples
///
/// ```
/// use standalone::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(3306)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the standalone library.
#[derive(Debug, Error)]
pub enum Error {
    /// The runtime properties file could not be read.
    #[error("cannot load configuration from {}: {source}", path.display())]
    ConfigLoad {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The runtime properties file could not be rewritten.
    #[error("cannot write configuration to {}: {source}", path.display())]
    ConfigWrite {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Changing the database password failed.
    #[error("credential rotation failed: {reason}")]
    CredentialRotation {
        /// What went wrong.
        reason: String,
    },

    /// A port could not be bound while probing it.
    #[error("probe of port {port} failed: {source}")]
    PortProbe {
        /// The probed port.
        port: u16,
        /// The bind error.
        #[source]
        source: std::io::Error,
    },

    /// An invalid port number was provided.
    #[error("invalid port {value}: {reason}")]
    InvalidPort {
        /// The invalid port value.
        value: u16,
        /// The reason the port is invalid.
        reason: String,
    },

    /// A connection string could not be understood.
    #[error("invalid connection url '{url}': {reason}")]
    InvalidConnectionUrl {
        /// The offending connection string.
        url: String,
        /// The reason it was rejected.
        reason: String,
    },

    /// The settings file could not be parsed.
    #[error("settings error: {0}")]
    Settings(#[from] serde_yaml::Error),

    /// A settings value was invalid.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::port::InvalidPortError> for Error {
    fn from(err: crate::port::InvalidPortError) -> Self {
        Self::InvalidPort {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl Error {
    /// Check if the error means the runtime properties file is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use standalone::Error;
    /// use std::io;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::ConfigLoad {
    ///     path: PathBuf::from("/nonexistent"),
    ///     source: io::Error::from(io::ErrorKind::NotFound),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ConfigLoad { source, .. } | Self::Io(source) => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
