//! Lab Core - Shared library for lab-management CLIs
//!
//! This library drives local "lab" environments described by compose files.
//! The product identity (package name, registry, runtime binary, labs
//! directory) is supplied by the binary through the `ProductConfig` trait.
//!
//! # Architecture
//!
//! - **Layer 1: Core Operations** - Runtime/compose detection, command line assembly,
//!   lab catalog lookup, registry version check
//! - **Layer 2: CLI/TUI Interface** - Optional cliclack-based flows (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI flows
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use lab_core::runtime::Tooling;
//!
//! let tooling = Tooling::detect("docker");
//! let line = tooling.build_invocation(["--file", "labs/intro.yaml", "up", "-d"])?;
//! tooling.run(&line)?;
//! ```

pub mod error;
pub mod labs;
pub mod product;
pub mod runtime;
pub mod update;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{CatalogError, ToolingError, UnavailableReason};
pub use labs::{Lab, LabAction, LabCatalog};
pub use product::ProductConfig;
pub use runtime::{CommandLine, HostOs, Tooling};
pub use update::{UpdateChecker, UpdateStatus};

#[cfg(feature = "tui")]
pub use tui::run;
