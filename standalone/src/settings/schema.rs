//! Settings schema.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rotation::DEFAULT_CONNECT_TIMEOUT;

/// Context name used when none is configured.
pub const DEFAULT_CONTEXT_NAME: &str = "openmrs";

/// Settings for the reconciliation step itself.
///
/// Every field is optional so that sources can be layered; the accessor
/// methods apply the defaults.
///
/// # Examples
///
/// ```
/// use standalone::settings::Settings;
///
/// let settings: Settings = serde_yaml::from_str("context_name: clinic\n").unwrap();
/// assert_eq!(settings.context_name(), "clinic");
/// assert!(settings.shutdown_after_rotation());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Explicit path of the runtime properties file.
    pub runtime_properties: Option<PathBuf>,

    /// Web application context name, used to derive the default path.
    pub context_name: Option<String>,

    /// Database client settings.
    #[serde(default)]
    pub database: DatabaseSettings,
}

/// Database client settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSettings {
    /// Seconds to wait for the connection before giving up on rotation.
    pub connect_timeout_secs: Option<u64>,

    /// Stop the server after a password change.
    pub shutdown_after_rotation: Option<bool>,
}

impl Settings {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(&mut self, other: &Self) {
        if other.runtime_properties.is_some() {
            self.runtime_properties.clone_from(&other.runtime_properties);
        }
        if other.context_name.is_some() {
            self.context_name.clone_from(&other.context_name);
        }
        if other.database.connect_timeout_secs.is_some() {
            self.database.connect_timeout_secs = other.database.connect_timeout_secs;
        }
        if other.database.shutdown_after_rotation.is_some() {
            self.database.shutdown_after_rotation = other.database.shutdown_after_rotation;
        }
    }

    /// The configured context name, or [`DEFAULT_CONTEXT_NAME`].
    #[must_use]
    pub fn context_name(&self) -> &str {
        self.context_name.as_deref().unwrap_or(DEFAULT_CONTEXT_NAME)
    }

    /// The connect timeout for credential rotation.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.database
            .connect_timeout_secs
            .map_or(DEFAULT_CONNECT_TIMEOUT, Duration::from_secs)
    }

    /// Whether rotation stops the database server afterwards.
    #[must_use]
    pub fn shutdown_after_rotation(&self) -> bool {
        self.database.shutdown_after_rotation.unwrap_or(true)
    }

    /// Where the runtime properties file lives.
    ///
    /// An explicit `runtime_properties` wins. Otherwise the file is
    /// `~/.OpenMRS/<context>-runtime.properties`.
    ///
    /// # Errors
    ///
    /// Returns an error if no explicit path is set and the home directory
    /// cannot be determined.
    pub fn runtime_properties_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.runtime_properties {
            return Ok(path.clone());
        }

        let home = home::home_dir().ok_or_else(|| Error::Validation {
            field: "runtime_properties".into(),
            message: "not set and the home directory cannot be determined".into(),
        })?;
        Ok(home
            .join(".OpenMRS")
            .join(format!("{}-runtime.properties", self.context_name())))
    }

    /// Check values that deserialize fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty context name or a zero
    /// connect timeout.
    pub fn validate(&self) -> Result<()> {
        if self.context_name.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(Error::Validation {
                field: "context_name".into(),
                message: "must not be empty".into(),
            });
        }
        if self.database.connect_timeout_secs == Some(0) {
            return Err(Error::Validation {
                field: "database.connect_timeout_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.context_name(), DEFAULT_CONTEXT_NAME);
        assert_eq!(settings.connect_timeout(), DEFAULT_CONNECT_TIMEOUT);
        assert!(settings.shutdown_after_rotation());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = "\
runtime_properties: /srv/openmrs/openmrs-runtime.properties
context_name: clinic
database:
  connect_timeout_secs: 5
  shutdown_after_rotation: false
";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            settings.runtime_properties_path().unwrap(),
            PathBuf::from("/srv/openmrs/openmrs-runtime.properties")
        );
        assert_eq!(settings.context_name(), "clinic");
        assert_eq!(settings.connect_timeout(), Duration::from_secs(5));
        assert!(!settings.shutdown_after_rotation());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(serde_yaml::from_str::<Settings>("colour: blue\n").is_err());
        assert!(serde_yaml::from_str::<Settings>("database:\n  pool: 3\n").is_err());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Settings {
            context_name: Some("base".into()),
            database: DatabaseSettings {
                connect_timeout_secs: Some(10),
                shutdown_after_rotation: Some(true),
            },
            ..Default::default()
        };
        let overlay = Settings {
            context_name: Some("overlay".into()),
            database: DatabaseSettings {
                connect_timeout_secs: None,
                shutdown_after_rotation: Some(false),
            },
            ..Default::default()
        };

        base.merge(&overlay);
        assert_eq!(base.context_name(), "overlay");
        assert_eq!(base.database.connect_timeout_secs, Some(10));
        assert_eq!(base.database.shutdown_after_rotation, Some(false));
        assert_eq!(base.runtime_properties, None);
    }

    #[test]
    fn test_default_path_uses_context_name() {
        let settings = Settings {
            context_name: Some("clinic".into()),
            ..Default::default()
        };
        if let Ok(path) = settings.runtime_properties_path() {
            assert!(path.ends_with(".OpenMRS/clinic-runtime.properties"));
        }
    }

    #[test]
    fn test_validate_rejects_nonsense() {
        let empty_context = Settings {
            context_name: Some("  ".into()),
            ..Default::default()
        };
        assert!(empty_context.validate().is_err());

        let zero_timeout = Settings {
            database: DatabaseSettings {
                connect_timeout_secs: Some(0),
                shutdown_after_rotation: None,
            },
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());
    }
}
