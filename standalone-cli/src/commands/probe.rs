//! Command to check whether a port is free.

use crate::error::CliError;
use crate::utils::{suggest_port, GlobalOptions};
use clap::Args;
use standalone::{Port, PortProbe, SystemPortProbe};

/// Check whether a port is free for both TCP and UDP.
#[derive(Args)]
pub struct ProbeCommand {
    /// Port number to check
    #[arg(value_name = "PORT")]
    pub port: u16,

    /// Print the next free port when this one is taken
    #[arg(long)]
    pub suggest: bool,
}

impl ProbeCommand {
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let probe = SystemPortProbe;

        if probe.is_available(self.port) {
            println!("available");
            return Ok(());
        }

        println!("unavailable");
        if self.suggest {
            // Out-of-range ports have no neighbour to suggest.
            if let Some(free) = Port::try_from(self.port)
                .ok()
                .and_then(|port| suggest_port(&probe, port))
            {
                println!("next available: {free}");
            }
        }

        Err(CliError::SemanticFailure(format!(
            "port {} is not available",
            self.port
        )))
    }
}
