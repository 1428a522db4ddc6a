//! Settings for the reconciliation step.
//!
//! These are the knobs of the launcher-side routine, not the runtime
//! properties it reconciles. Sources are merged with the following
//! precedence (highest to lowest):
//!
//! 1. Programmatic overrides (via [`SettingsBuilder::with_settings`])
//! 2. Environment variables (`STANDALONE_*`)
//! 3. A YAML settings file (via [`SettingsBuilder::with_file`])
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use standalone::settings::SettingsBuilder;
//!
//! let settings = SettingsBuilder::new()
//!     .with_file("/opt/openmrs/standalone.yaml")
//!     .build()
//!     .unwrap();
//!
//! println!("runtime properties: {}", settings.runtime_properties_path().unwrap().display());
//! ```

pub mod builder;
pub mod environment;
pub mod schema;

pub use builder::SettingsBuilder;
pub use environment::EnvironmentSettings;
pub use schema::{DatabaseSettings, Settings, DEFAULT_CONTEXT_NAME};
