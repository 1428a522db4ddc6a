//! Port numbers the launcher is allowed to hand out, and availability probing.
//!
//! The launcher only ever assigns ports up to the top of the registered range
//! (49151). Anything above that is treated as invalid for this application,
//! not merely as ephemeral.

pub mod probe;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use probe::{MockPortProbe, PortProbe, SystemPortProbe};

/// A port number in the range the launcher may assign (1-49151).
///
/// # Examples
///
/// ```
/// use standalone::Port;
///
/// let port = Port::try_from(3306).unwrap();
/// assert_eq!(port.value(), 3306);
///
/// assert!(Port::try_from(0).is_err());
/// assert!(Port::try_from(49152).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// The lowest assignable port.
    pub const MIN: u16 = 1;

    /// The highest assignable port.
    pub const MAX: u16 = 49151;

    /// Returns the underlying port number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns the next port, or `None` past [`Port::MAX`].
    ///
    /// # Examples
    ///
    /// ```
    /// use standalone::Port;
    ///
    /// let port = Port::try_from(8080).unwrap();
    /// assert_eq!(port.next().unwrap().value(), 8081);
    /// assert!(Port::try_from(Port::MAX).unwrap().next().is_none());
    /// ```
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::try_from(self.0.checked_add(1)?).ok()
    }
}

impl TryFrom<u16> for Port {
    type Error = InvalidPortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value < Self::MIN {
            Err(InvalidPortError {
                value,
                reason: "port 0 is invalid".into(),
            })
        } else if value > Self::MAX {
            Err(InvalidPortError {
                value,
                reason: format!("ports above {} are not assignable", Self::MAX),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = InvalidPortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u16 = s.trim().parse().map_err(|_| InvalidPortError {
            value: 0,
            reason: format!("'{s}' is not a port number"),
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid port numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortError {
    /// The invalid port value.
    pub value: u16,
    /// The reason the port is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidPortError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        assert!(Port::try_from(0).is_err());
        assert!(Port::try_from(1).is_ok());
        assert!(Port::try_from(3306).is_ok());
        assert!(Port::try_from(8080).is_ok());
        assert!(Port::try_from(49151).is_ok());
        assert!(Port::try_from(49152).is_err());
        assert!(Port::try_from(65535).is_err());
    }

    #[test]
    fn test_port_invalid_error_message() {
        let err = Port::try_from(50000).unwrap_err();
        assert_eq!(err.value, 50000);
        assert!(err.reason.contains("49151"));
    }

    #[test]
    fn test_port_from_str() {
        assert_eq!("3307".parse::<Port>().unwrap().value(), 3307);
        assert_eq!(" 8081 ".parse::<Port>().unwrap().value(), 8081);
        assert!("abc".parse::<Port>().is_err());
        assert!("70000".parse::<Port>().is_err());
        assert!("0".parse::<Port>().is_err());
    }

    #[test]
    fn test_port_display() {
        let port = Port::try_from(8080).unwrap();
        assert_eq!(format!("{port}"), "8080");
    }

    #[test]
    fn test_port_next() {
        assert_eq!(Port::try_from(1).unwrap().next().unwrap().value(), 2);
        assert!(Port::try_from(49151).unwrap().next().is_none());
    }

    #[test]
    fn test_port_serde() {
        let port = Port::try_from(3306).unwrap();
        let json = serde_json::to_string(&port).unwrap();
        assert_eq!(json, "3306");

        let deserialized: Port = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, port);
        assert!(serde_json::from_str::<Port>("50000").is_err());
    }
}
