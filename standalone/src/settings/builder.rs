//! Layered settings construction.

use std::fs;
use std::path::{Path, PathBuf};

use super::environment::EnvironmentSettings;
use super::schema::Settings;
use crate::error::{Error, Result};

/// Builds [`Settings`] from defaults, an optional YAML file, the environment,
/// and programmatic overrides, in increasing order of precedence.
///
/// # Examples
///
/// ```
/// use standalone::settings::{Settings, SettingsBuilder};
///
/// let settings = SettingsBuilder::new()
///     .skip_env()
///     .with_settings(Settings {
///         context_name: Some("clinic".into()),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
/// assert_eq!(settings.context_name(), "clinic");
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    file: Option<PathBuf>,
    skip_env: bool,
    overrides: Vec<Settings>,
}

impl SettingsBuilder {
    /// Start from built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a YAML settings file. The file must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Ignore `STANDALONE_*` environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Layer explicit settings on top of everything else.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.overrides.push(settings);
        self
    }

    /// Point at a specific runtime properties file.
    #[must_use]
    pub fn with_runtime_properties(self, path: impl Into<PathBuf>) -> Self {
        self.with_settings(Settings {
            runtime_properties: Some(path.into()),
            ..Default::default()
        })
    }

    /// Resolve and validate the layered settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed, an
    /// environment variable is malformed, or the result fails validation.
    pub fn build(self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.file {
            settings.merge(&load_file(path)?);
        }

        if !self.skip_env {
            EnvironmentSettings::apply_overrides(&mut settings)?;
        }

        for layer in &self.overrides {
            settings.merge(layer);
        }

        settings.validate()?;
        Ok(settings)
    }
}

/// Load and parse one YAML settings file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Settings`]
/// if it is not valid settings YAML.
pub fn load_file(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&contents).map_err(Error::from)
}
