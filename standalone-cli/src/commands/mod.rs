//! CLI command implementations.
//!
//! - `reconcile`: Reconcile the runtime properties with the desired ports
//! - `probe`: Check whether a port is free

pub mod probe;
pub mod reconcile;

pub use probe::ProbeCommand;
pub use reconcile::ReconcileCommand;
