#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # standalone
//!
//! Port and credential reconciliation for the standalone application
//! launcher.
//!
//! Before the launcher starts its bundled database and servlet container it
//! brings the runtime properties file in line with the ports it intends to
//! use, and replaces the database's shipped default password.
//!
//! ## Core Types
//!
//! - [`ReconciliationService`] and [`Reconciliation`]: one reconciliation pass
//! - [`ConfigStore`] and [`ConfigRecord`]: the runtime properties file
//! - [`CredentialRotator`]: default password rotation
//! - [`Port`] and [`PortProbe`]: port validation and availability
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use standalone::{MockPortProbe, Port, PortProbe};
//!
//! let port = Port::try_from(3306).unwrap();
//! assert_eq!(port.value(), 3306);
//! assert!(Port::try_from(49152).is_err());
//!
//! let probe = MockPortProbe::new([3306].into_iter().collect());
//! assert!(!probe.is_available(3306));
//! assert_eq!(probe.first_available(port).unwrap().value(), 3307);
//! ```

pub mod connection_url;
pub mod error;
pub mod logging;
pub mod port;
pub mod properties;
pub mod reconcile;
pub mod rotation;
pub mod settings;

// Re-export key types at crate root for convenience
pub use connection_url::DatabaseTarget;
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use port::{MockPortProbe, Port, PortProbe, SystemPortProbe};
pub use properties::{ConfigRecord, ConfigStore};
pub use reconcile::{Reconciliation, ReconciliationService};
pub use rotation::{CredentialBackend, CredentialRotator, MySqlBackend, ServerState};
pub use settings::{Settings, SettingsBuilder};
