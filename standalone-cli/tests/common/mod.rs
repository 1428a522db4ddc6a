//! Common test utilities for CLI integration tests.
//!
//! Each [`TestEnv`] owns a temporary directory holding a runtime properties
//! file, and hands out commands isolated from the caller's environment.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The connection string the bundled database is configured with.
#[allow(dead_code)]
pub const DEFAULT_URL: &str = "jdbc:mysql:mxj://localhost:3306/openmrs?autoReconnect=true";

/// Test environment with an isolated runtime properties file.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the runtime properties file (not created yet)
    pub properties: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let properties = temp_path.join("openmrs-runtime.properties");

        Self {
            temp_dir,
            temp_path,
            properties,
        }
    }

    /// Create an environment whose properties file holds `password` and
    /// the default connection string.
    pub fn with_password(password: &str) -> Self {
        let env = Self::new();
        env.write_properties(&format!(
            "connection.username=openmrs\n\
             connection.password={password}\n\
             connection.url={DEFAULT_URL}\n\
             tomcatport=8081\n"
        ));
        env
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// `STANDALONE_*` variables from the caller's environment are removed.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("standalone").expect("Failed to find standalone binary");
        for var in [
            "STANDALONE_SETTINGS",
            "STANDALONE_RUNTIME_PROPERTIES",
            "STANDALONE_CONTEXT_NAME",
            "STANDALONE_CONNECT_TIMEOUT",
            "STANDALONE_SHUTDOWN_AFTER_ROTATION",
            "STANDALONE_LOG_MODE",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder pointed at this environment's properties file.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--runtime-properties").arg(&self.properties);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Overwrite the runtime properties file.
    pub fn write_properties(&self, contents: &str) {
        std::fs::write(&self.properties, contents).expect("Failed to write properties");
    }

    /// Read the runtime properties file.
    pub fn read_properties(&self) -> String {
        std::fs::read_to_string(&self.properties).expect("Failed to read properties")
    }

    /// Write a settings file and return its path.
    pub fn write_settings(&self, contents: &str) -> PathBuf {
        let path = self.temp_path.join("standalone.yaml");
        std::fs::write(&path, contents).expect("Failed to write settings");
        path
    }
}
