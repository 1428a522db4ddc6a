//! Reading and rewriting the database connection string.
//!
//! The runtime properties store the database location as a JDBC-style URL,
//! for example `jdbc:mysql:mxj://localhost:3306/openmrs?autoReconnect=true`.
//! Everything here relies on one format assumption: the port appears exactly
//! once, as a `:<digits>/` segment between the host and the schema. No other
//! module looks inside the URL.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Port MySQL listens on when the URL does not say otherwise.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

static PORT_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([0-9]+)/").expect("PORT_SEGMENT is a valid regex pattern"));

/// Returns the port embedded in `url`, if it has a `:<digits>/` segment.
///
/// Digits that do not fit a port number count as no port at all.
///
/// # Examples
///
/// ```
/// use standalone::connection_url::extract_port;
///
/// let url = "jdbc:mysql:mxj://localhost:3306/openmrs?autoReconnect=true";
/// assert_eq!(extract_port(url), Some(3306));
/// assert_eq!(extract_port("jdbc:mysql://localhost/openmrs"), None);
/// ```
#[must_use]
pub fn extract_port(url: &str) -> Option<u16> {
    PORT_SEGMENT
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Returns `true` if `url` has a `:<digits>/` segment that can be rewritten.
#[must_use]
pub fn has_port_segment(url: &str) -> bool {
    PORT_SEGMENT.is_match(url)
}

/// Returns `url` with its `:<digits>/` segment replaced by `:<port>/`.
///
/// Nothing else in the string changes. A URL without a port segment comes
/// back unchanged.
///
/// # Examples
///
/// ```
/// use standalone::connection_url::with_port;
///
/// let url = "jdbc:mysql:mxj://localhost:3306/openmrs?autoReconnect=true";
/// assert_eq!(
///     with_port(url, 3307),
///     "jdbc:mysql:mxj://localhost:3307/openmrs?autoReconnect=true"
/// );
/// ```
#[must_use]
pub fn with_port(url: &str, port: u16) -> String {
    PORT_SEGMENT
        .replace_all(url, format!(":{port}/").as_str())
        .into_owned()
}

/// Where the database client should connect, as read from a connection URL.
///
/// # Examples
///
/// ```
/// use standalone::connection_url::DatabaseTarget;
///
/// let target =
///     DatabaseTarget::parse("jdbc:mysql:mxj://localhost:3316/openmrs?autoReconnect=true")
///         .unwrap();
/// assert_eq!(target.host, "localhost");
/// assert_eq!(target.port, 3316);
/// assert_eq!(target.database.as_deref(), Some("openmrs"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseTarget {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Default schema, if the URL names one.
    pub database: Option<String>,
}

impl DatabaseTarget {
    /// Parse the host, port and schema out of a JDBC-style URL.
    ///
    /// The scheme prefix (`jdbc:mysql:mxj:` and the like) is ignored. A
    /// missing port falls back to [`DEFAULT_MYSQL_PORT`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConnectionUrl`] if there is no `://`, the host
    /// is empty, or the port is not a number.
    pub fn parse(url: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidConnectionUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let (_, rest) = url
            .split_once("://")
            .ok_or_else(|| invalid("missing '://' separator"))?;

        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, Some(path)),
            None => (rest.split('?').next().unwrap_or_default(), None),
        };

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse()
                    .map_err(|_| invalid("port is not a number"))?;
                (host, port)
            }
            None => (authority, DEFAULT_MYSQL_PORT),
        };

        if host.is_empty() {
            return Err(invalid("missing host"));
        }

        let database = path
            .and_then(|p| p.split('?').next())
            .filter(|db| !db.is_empty())
            .map(str::to_string);

        Ok(Self {
            host: host.to_string(),
            port,
            database,
        })
    }
}

impl fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)?;
        if let Some(db) = &self.database {
            write!(f, "/{db}")?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "jdbc:mysql:mxj://localhost:3306/openmrs?autoReconnect=true";

    #[test]
    fn test_extract_port() {
        assert_eq!(extract_port(URL), Some(3306));
        assert_eq!(extract_port("mysql://db.internal:13306/x"), Some(13306));
    }

    #[test]
    fn test_extract_port_missing_segment() {
        assert_eq!(extract_port("jdbc:mysql:mxj://localhost/openmrs"), None);
        assert_eq!(extract_port("jdbc:mysql:mxj://localhost:3306"), None);
        assert_eq!(extract_port(""), None);
    }

    #[test]
    fn test_extract_port_overflow_is_none() {
        assert_eq!(extract_port("jdbc:mysql://localhost:99999/openmrs"), None);
        assert!(has_port_segment("jdbc:mysql://localhost:99999/openmrs"));
    }

    #[test]
    fn test_with_port_rewrites_segment_only() {
        assert_eq!(
            with_port(URL, 3307),
            "jdbc:mysql:mxj://localhost:3307/openmrs?autoReconnect=true"
        );
    }

    #[test]
    fn test_with_port_same_port_is_identity() {
        assert_eq!(with_port(URL, 3306), URL);
    }

    #[test]
    fn test_scheme_colons_are_not_port_segments() {
        assert!(!has_port_segment("jdbc:mysql:mxj://localhost/openmrs"));
    }

    #[test]
    fn test_database_target_parse() {
        let target = DatabaseTarget::parse(URL).unwrap();
        assert_eq!(target.host, "localhost");
        assert_eq!(target.port, 3306);
        assert_eq!(target.database.as_deref(), Some("openmrs"));
        assert_eq!(target.to_string(), "localhost:3306/openmrs");
    }

    #[test]
    fn test_database_target_defaults() {
        let target = DatabaseTarget::parse("jdbc:mysql://db").unwrap();
        assert_eq!(target.host, "db");
        assert_eq!(target.port, DEFAULT_MYSQL_PORT);
        assert_eq!(target.database, None);

        let target = DatabaseTarget::parse("jdbc:mysql://db/?useSSL=false").unwrap();
        assert_eq!(target.database, None);
    }

    #[test]
    fn test_database_target_rejects_garbage() {
        assert!(DatabaseTarget::parse("localhost:3306/openmrs").is_err());
        assert!(DatabaseTarget::parse("jdbc:mysql://:3306/openmrs").is_err());
        assert!(DatabaseTarget::parse("jdbc:mysql://localhost:abc/openmrs").is_err());
    }
}
