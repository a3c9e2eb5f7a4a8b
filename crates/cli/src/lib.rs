//! Command-line front end for the cell ring.
//!
//! Plays the router's part around the ring: loads cell records from a JSON
//! registry file, builds rings and answers:
//! - Client routing decisions
//! - Ring distribution and position listings
//! - Cell listings
//! - What-if deactivation diffs
//! - Periodic registry refresh with reassignment logging

pub mod commands;
pub mod config;
pub mod registry;
pub mod telemetry;

pub use commands::{Cli, Command};
pub use config::CliConfig;
pub use registry::{JsonFileRegistry, RegistryError};
