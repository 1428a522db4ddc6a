//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across CLI commands: settings
//! loading, port argument validation, and output formatting.

use crate::error::CliError;
use clap::ValueEnum;
use standalone::{Port, PortProbe, Settings, SettingsBuilder};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
///
/// Verbosity is consumed by the logger in `main` and is not carried here.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// YAML settings file.
    pub settings: Option<PathBuf>,

    /// Override the runtime properties file location.
    pub runtime_properties: Option<PathBuf>,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for people and shell scripts.
    #[default]
    Text,
    /// The full JSON report.
    Json,
}

/// Load layered settings.
///
/// Settings are merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. The settings file
/// 4. Built-in defaults (lowest priority)
pub fn load_settings(global: &GlobalOptions) -> Result<Settings, CliError> {
    let mut builder = SettingsBuilder::new();

    if let Some(path) = &global.settings {
        builder = builder.with_file(path);
    }
    if let Some(path) = &global.runtime_properties {
        builder = builder.with_runtime_properties(path);
    }

    builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Validate an optional port argument.
pub fn parse_port(value: Option<u16>) -> Result<Option<Port>, CliError> {
    value
        .map(Port::try_from)
        .transpose()
        .map_err(CliError::from)
}

/// The next available port after `port`, if any.
pub fn suggest_port(probe: &impl PortProbe, port: Port) -> Option<Port> {
    port.next().and_then(|start| probe.first_available(start))
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
