//! Container runtime detection and compose invocation
//!
//! This module provides:
//! - Probing for the runtime binary and both compose variants
//! - Host OS detection and the elevation heuristic
//! - Assembly of compose command lines and the running-lab listing

pub mod command;
pub mod host;
pub mod runner;
pub mod tooling;

pub use command::CommandLine;
pub use host::HostOs;
pub use runner::{CommandRunner, SystemRunner, ToolStatus};
pub use tooling::{
    parse_active_environments, running_labs_notice, ComposeVariant, ElevationRule, Tooling,
    ELEVATION_TOKEN,
};
