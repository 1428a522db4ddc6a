//! Common test utilities for integration tests.
//!
//! Fixtures write a runtime properties file into a temporary directory and
//! wire a [`ReconciliationService`] over it with a mock database backend.

use std::fs;
use std::path::PathBuf;

use standalone::rotation::{CredentialRotator, MockCredentialBackend};
use standalone::{ConfigStore, ReconciliationService};
use tempfile::TempDir;

/// The connection string the bundled database is configured with.
pub const DEFAULT_URL: &str = "jdbc:mysql:mxj://localhost:3306/openmrs?autoReconnect=true";

/// A runtime properties file in a temporary directory.
pub struct PropertiesFixture {
    dir: TempDir,
    path: PathBuf,
}

impl PropertiesFixture {
    /// Write `contents` verbatim to `openmrs-runtime.properties`.
    pub fn with_contents(contents: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openmrs-runtime.properties");
        fs::write(&path, contents).unwrap();
        Self { dir, path }
    }

    /// A file holding the given password, the default URL, and Tomcat on 8081.
    pub fn standard(password: &str) -> Self {
        Self::with_contents(&format!(
            "connection.username=openmrs\n\
             connection.password={password}\n\
             connection.url={DEFAULT_URL}\n\
             tomcatport=8081\n"
        ))
    }

    /// A fixture whose file was never created.
    #[allow(dead_code)]
    pub fn missing() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openmrs-runtime.properties");
        Self { dir, path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    #[allow(dead_code)]
    pub fn dir(&self) -> &TempDir {
        &self.dir
    }

    pub fn contents(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(&self.path)
    }

    /// A service over this file with the given mock backend.
    pub fn service(
        &self,
        backend: MockCredentialBackend,
    ) -> ReconciliationService<MockCredentialBackend> {
        ReconciliationService::new(self.store(), CredentialRotator::new(backend))
    }
}
