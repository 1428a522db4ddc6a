//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{ProbeCommand, ReconcileCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reconcile the standalone launcher's ports and database credentials.
#[derive(Parser)]
#[command(name = "standalone")]
#[command(
    version,
    about = "Reconcile standalone launcher ports and credentials",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Read settings from this YAML file
    #[arg(long, value_name = "PATH", global = true, env = "STANDALONE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Override the runtime properties file location
    #[arg(
        long,
        value_name = "PATH",
        global = true,
        env = "STANDALONE_RUNTIME_PROPERTIES"
    )]
    pub runtime_properties: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Bring the runtime properties in line with the desired ports
    Reconcile(ReconcileCommand),

    /// Check whether a port is free for TCP and UDP
    Probe(ProbeCommand),
}
