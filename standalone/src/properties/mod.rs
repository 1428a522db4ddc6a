//! The runtime properties file shared with the web application.
//!
//! The file is a flat `key=value` list. This module reads it into an ordered
//! [`ConfigRecord`] and rewrites it through a [`ConfigStore`]:
//!
//! - unknown keys survive a rewrite untouched, in their original order
//! - a rewrite replaces the whole file or nothing
//! - the store never decides *whether* to write; callers track dirtiness
//!
//! # Examples
//!
//! ```no_run
//! use standalone::properties::{keys, ConfigStore};
//!
//! let store = ConfigStore::new("/opt/openmrs/openmrs-runtime.properties");
//! let mut record = store.load().unwrap();
//!
//! if record.set(keys::TOMCAT_PORT, "8081") {
//!     store.save(&record).unwrap();
//! }
//! ```

mod record;
mod store;

pub use record::ConfigRecord;
pub use store::{ConfigStore, HEADER_BANNER};

/// Property keys the launcher reads or rewrites.
pub mod keys {
    /// Database user name.
    pub const CONNECTION_USERNAME: &str = "connection.username";
    /// Database password.
    pub const CONNECTION_PASSWORD: &str = "connection.password";
    /// JDBC-style connection string with an embedded `:<port>/` segment.
    pub const CONNECTION_URL: &str = "connection.url";
    /// HTTP port of the embedded servlet container.
    pub const TOMCAT_PORT: &str = "tomcatport";
}
