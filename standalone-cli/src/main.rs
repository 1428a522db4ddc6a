//! Main entry point for the standalone CLI.
//!
//! This is the command-line interface for the launcher's reconciliation
//! step. It provides:
//! - `reconcile`: Reconcile ports and rotate the default database password
//! - `probe`: Check whether a port is free

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = standalone::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        settings: cli.settings,
        runtime_properties: cli.runtime_properties,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Reconcile(cmd) => cmd.execute(&global),
        cli::Command::Probe(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
