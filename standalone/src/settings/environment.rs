//! Environment variable overrides for settings.
//!
//! Recognised variables:
//!
//! - `STANDALONE_RUNTIME_PROPERTIES`: path of the runtime properties file
//! - `STANDALONE_CONTEXT_NAME`: web application context name
//! - `STANDALONE_CONNECT_TIMEOUT`: database connect timeout in seconds
//! - `STANDALONE_SHUTDOWN_AFTER_ROTATION`: boolean

use std::env;
use std::path::PathBuf;

use super::schema::Settings;
use crate::error::{Error, Result};

/// Applies `STANDALONE_*` environment variables to settings.
pub struct EnvironmentSettings;

impl EnvironmentSettings {
    /// Apply every recognised variable that is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a variable holds a value of the wrong
    /// type.
    pub fn apply_overrides(settings: &mut Settings) -> Result<()> {
        if let Ok(path) = env::var("STANDALONE_RUNTIME_PROPERTIES") {
            settings.runtime_properties = Some(PathBuf::from(path));
        }

        if let Ok(name) = env::var("STANDALONE_CONTEXT_NAME") {
            settings.context_name = Some(name);
        }

        if let Ok(secs) = env::var("STANDALONE_CONNECT_TIMEOUT") {
            settings.database.connect_timeout_secs =
                Some(secs.trim().parse().map_err(|_| Error::Validation {
                    field: "STANDALONE_CONNECT_TIMEOUT".into(),
                    message: "Must be a positive integer".into(),
                })?);
        }

        if let Ok(val) = env::var("STANDALONE_SHUTDOWN_AFTER_ROTATION") {
            settings.database.shutdown_after_rotation =
                Some(Self::parse_bool("STANDALONE_SHUTDOWN_AFTER_ROTATION", &val)?);
        }

        Ok(())
    }

    /// Accepts true/1/yes/on and false/0/no/off, case-insensitively.
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "STANDALONE_RUNTIME_PROPERTIES",
        "STANDALONE_CONTEXT_NAME",
        "STANDALONE_CONNECT_TIMEOUT",
        "STANDALONE_SHUTDOWN_AFTER_ROTATION",
    ];

    fn clear() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_no_variables_no_change() {
        clear();
        let mut settings = Settings::default();
        EnvironmentSettings::apply_overrides(&mut settings).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    #[serial]
    fn test_all_variables_applied() {
        clear();
        env::set_var("STANDALONE_RUNTIME_PROPERTIES", "/tmp/rt.properties");
        env::set_var("STANDALONE_CONTEXT_NAME", "clinic");
        env::set_var("STANDALONE_CONNECT_TIMEOUT", "7");
        env::set_var("STANDALONE_SHUTDOWN_AFTER_ROTATION", "off");

        let mut settings = Settings::default();
        EnvironmentSettings::apply_overrides(&mut settings).unwrap();
        clear();

        assert_eq!(
            settings.runtime_properties,
            Some(PathBuf::from("/tmp/rt.properties"))
        );
        assert_eq!(settings.context_name(), "clinic");
        assert_eq!(settings.database.connect_timeout_secs, Some(7));
        assert!(!settings.shutdown_after_rotation());
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_rejected() {
        clear();
        env::set_var("STANDALONE_CONNECT_TIMEOUT", "soon");
        let result = EnvironmentSettings::apply_overrides(&mut Settings::default());
        clear();
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_parse_bool() {
        assert!(EnvironmentSettings::parse_bool("X", "YES").unwrap());
        assert!(EnvironmentSettings::parse_bool("X", "1").unwrap());
        assert!(!EnvironmentSettings::parse_bool("X", "Off").unwrap());
        assert!(EnvironmentSettings::parse_bool("X", "maybe").is_err());
    }
}
