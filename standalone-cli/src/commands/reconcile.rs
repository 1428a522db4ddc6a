//! Command to reconcile the runtime properties with the desired ports.

use crate::error::CliError;
use crate::utils::{
    load_settings, parse_port, shorten_path, suggest_port, GlobalOptions, OutputFormat,
};
use clap::Args;
use standalone::{Port, PortProbe, Reconciliation, ReconciliationService, SystemPortProbe};

/// Bring the runtime properties in line with the desired ports.
#[derive(Args)]
pub struct ReconcileCommand {
    /// MySQL port the launcher wants to use
    #[arg(long, value_name = "PORT")]
    pub mysql_port: Option<u16>,

    /// Tomcat port the launcher wants to use
    #[arg(long, value_name = "PORT")]
    pub tomcat_port: Option<u16>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ReconcileCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Validate ports
        let mysql_port = parse_port(self.mysql_port)?;
        let tomcat_port = parse_port(self.tomcat_port)?;

        // 2. Warn about ports something else already holds
        let probe = SystemPortProbe;
        warn_if_taken(&probe, "MySQL", mysql_port);
        warn_if_taken(&probe, "Tomcat", tomcat_port);

        // 3. Build the service from settings
        let settings = load_settings(global)?;
        let service = ReconciliationService::from_settings(&settings)
            .map_err(|e| CliError::Config(e.to_string()))?;
        log::info!("reconciling {}", shorten_path(service.store().path()));

        // 4. Reconcile
        let outcome =
            service.reconcile(mysql_port.map(Port::value), tomcat_port.map(Port::value))?;

        if outcome.server_stopped {
            log::warn!(
                "database password rotated; the database server was stopped and must be started again"
            );
        }

        // 5. Report
        print_outcome(&outcome, self.format)
    }
}

fn warn_if_taken(probe: &impl PortProbe, service: &str, port: Option<Port>) {
    let Some(port) = port else {
        return;
    };
    if probe.is_available(port.value()) {
        return;
    }
    match suggest_port(probe, port) {
        Some(free) => log::warn!("{service} port {port} is not available; port {free} is free"),
        None => log::warn!("{service} port {port} is not available"),
    }
}

fn print_outcome(outcome: &Reconciliation, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => {
            if let Some(port) = outcome.mysql_port {
                println!("{port}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(outcome).map_err(std::io::Error::from)?;
            println!("{json}");
        }
    }
    Ok(())
}
