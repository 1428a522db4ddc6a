//! Reconciliation of the runtime properties with what the launcher wants.
//!
//! One call does one pass:
//!
//! 1. load the runtime properties (the only failure that aborts the call)
//! 2. rotate the default database password, if it is still `test`
//! 3. bring the MySQL and Tomcat ports in line with the requested values
//! 4. write the file back, only if something changed
//!
//! Everything after step 1 degrades instead of failing: a failed rotation
//! keeps the old password, a failed write keeps the in-memory result, and a
//! connection string without a `:<port>/` segment is left alone.
//!
//! When [`Reconciliation::server_stopped`] is set, the rotation shut the
//! database server down. The caller must start it again before anything
//! connects to it.

use serde::Serialize;

use crate::connection_url;
use crate::error::Result;
use crate::properties::{keys, ConfigRecord, ConfigStore};
use crate::rotation::{
    generate_password, CredentialBackend, CredentialRotator, MySqlBackend, ServerState,
    DEFAULT_PASSWORD,
};
use crate::settings::Settings;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// The MySQL port the application should use: the requested one if
    /// given, otherwise the one found in the connection string.
    pub mysql_port: Option<u16>,
    /// The default password was replaced.
    pub password_rotated: bool,
    /// The database server was stopped and needs restarting.
    pub server_stopped: bool,
    /// Keys whose values changed, in the order they changed.
    pub changed_keys: Vec<String>,
    /// The changes reached the file. `false` when nothing changed or the
    /// write failed.
    pub persisted: bool,
}

impl Reconciliation {
    /// Returns `true` if any key changed in memory.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.changed_keys.is_empty()
    }

    fn record_change(&mut self, key: &str) {
        if !self.changed_keys.iter().any(|k| k == key) {
            self.changed_keys.push(key.to_string());
        }
    }
}

/// Runs reconciliation passes against one runtime properties file.
///
/// # Examples
///
/// ```no_run
/// use standalone::properties::ConfigStore;
/// use standalone::rotation::{CredentialRotator, MySqlBackend};
/// use standalone::ReconciliationService;
///
/// let service = ReconciliationService::new(
///     ConfigStore::new("/opt/openmrs/openmrs-runtime.properties"),
///     CredentialRotator::new(MySqlBackend::default()),
/// );
///
/// let outcome = service.reconcile(None, Some(8081)).unwrap();
/// if outcome.server_stopped {
///     // restart the database before starting the web application
/// }
/// println!("MySQL port: {:?}", outcome.mysql_port);
/// ```
#[derive(Debug)]
pub struct ReconciliationService<B = MySqlBackend> {
    store: ConfigStore,
    rotator: CredentialRotator<B>,
}

impl ReconciliationService<MySqlBackend> {
    /// Build a service for the file and database behaviour in `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime properties path cannot be resolved.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let backend = MySqlBackend::new(settings.connect_timeout())
            .with_shutdown(settings.shutdown_after_rotation());
        Ok(Self::new(
            ConfigStore::new(settings.runtime_properties_path()?),
            CredentialRotator::new(backend),
        ))
    }
}

impl<B: CredentialBackend> ReconciliationService<B> {
    /// Create a service over `store` and `rotator`.
    pub const fn new(store: ConfigStore, rotator: CredentialRotator<B>) -> Self {
        Self { store, rotator }
    }

    /// The store this service reads and writes.
    pub const fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// The rotator used for the default password.
    pub const fn rotator(&self) -> &CredentialRotator<B> {
        &self.rotator
    }

    /// Run one reconciliation pass.
    ///
    /// `desired_mysql_port` and `desired_tomcat_port` are the ports the
    /// launcher wants; `None` means "keep whatever is configured".
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigLoad`](crate::Error::ConfigLoad) if the runtime
    /// properties cannot be read. No other failure is returned.
    pub fn reconcile(
        &self,
        desired_mysql_port: Option<u16>,
        desired_tomcat_port: Option<u16>,
    ) -> Result<Reconciliation> {
        let mut record = self.store.load()?;
        let mut outcome = Reconciliation::default();

        self.rotate_default_password(&mut record, &mut outcome);
        outcome.mysql_port = reconcile_mysql_port(&mut record, desired_mysql_port, &mut outcome);
        reconcile_tomcat_port(&mut record, desired_tomcat_port, &mut outcome);

        if outcome.is_dirty() {
            match self.store.save(&record) {
                Ok(()) => outcome.persisted = true,
                Err(e) => log::warn!("{e}; keeping the previous file until the next start"),
            }
        }

        Ok(outcome)
    }

    fn rotate_default_password(&self, record: &mut ConfigRecord, outcome: &mut Reconciliation) {
        if record.password() != Some(DEFAULT_PASSWORD) {
            return;
        }

        let (Some(url), Some(username)) = (record.connection_url(), record.username()) else {
            log::warn!(
                "default database password in use but {} or {} is missing; not rotating",
                keys::CONNECTION_URL,
                keys::CONNECTION_USERNAME
            );
            return;
        };

        let new_password = generate_password();
        match self
            .rotator
            .try_rotate(url, username, DEFAULT_PASSWORD, &new_password)
        {
            Ok(state) => {
                record.set(keys::CONNECTION_PASSWORD, new_password);
                outcome.record_change(keys::CONNECTION_PASSWORD);
                outcome.password_rotated = true;
                outcome.server_stopped = state == ServerState::Stopped;
            }
            Err(e) => log::warn!("{e}; keeping the default database password"),
        }
    }
}

/// Rewrite the connection string's port if a different one was requested,
/// and return the effective MySQL port.
fn reconcile_mysql_port(
    record: &mut ConfigRecord,
    desired: Option<u16>,
    outcome: &mut Reconciliation,
) -> Option<u16> {
    let url = record.connection_url().map(str::to_string);

    let Some(desired) = desired else {
        return url.as_deref().and_then(connection_url::extract_port);
    };

    match url {
        None => log::warn!("{} is not set; cannot apply MySQL port {desired}", keys::CONNECTION_URL),
        Some(url) if !connection_url::has_port_segment(&url) => log::warn!(
            "{} has no port segment; cannot apply MySQL port {desired}",
            keys::CONNECTION_URL
        ),
        Some(url) if connection_url::extract_port(&url) == Some(desired) => {}
        Some(url) => {
            record.set(keys::CONNECTION_URL, connection_url::with_port(&url, desired));
            outcome.record_change(keys::CONNECTION_URL);
        }
    }

    Some(desired)
}

fn reconcile_tomcat_port(
    record: &mut ConfigRecord,
    desired: Option<u16>,
    outcome: &mut Reconciliation,
) {
    if let Some(port) = desired {
        if record.set(keys::TOMCAT_PORT, port.to_string()) {
            outcome.record_change(keys::TOMCAT_PORT);
        }
    }
}
