//! Container runtime and compose tooling resolution
//!
//! Detection is recomputed on every call: nothing is cached between
//! invocations, so the answer always reflects the machine as it is now.

use super::command::CommandLine;
use super::host::HostOs;
use super::runner::{CommandRunner, SystemRunner, ToolStatus};
use crate::error::{ToolingError, UnavailableReason};
use colored::Colorize;
use std::collections::BTreeSet;
use tracing::debug;

/// Token prepended to lines that need elevated privileges
pub const ELEVATION_TOKEN: &str = "sudo";

/// The two shapes compose tooling comes in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeVariant {
    /// `<runtime> compose`, the plugin subcommand (V2)
    Plugin,
    /// `<runtime>-compose`, the legacy standalone binary (V1)
    Standalone,
}

/// Compose variants in order of preference
const COMPOSE_PREFERENCE: &[ComposeVariant] = &[ComposeVariant::Plugin, ComposeVariant::Standalone];

impl ComposeVariant {
    pub fn label(&self) -> &'static str {
        match self {
            ComposeVariant::Plugin => "V2",
            ComposeVariant::Standalone => "V1",
        }
    }

    /// Tokens that invoke this variant
    pub fn prefix(&self, runtime: &str) -> Vec<String> {
        match self {
            ComposeVariant::Plugin => vec![runtime.to_string(), "compose".to_string()],
            ComposeVariant::Standalone => vec![format!("{}-compose", runtime)],
        }
    }

    /// Line that succeeds only when this variant is installed
    fn probe_line(&self, runtime: &str) -> CommandLine {
        match self {
            ComposeVariant::Plugin => CommandLine::new([runtime, "compose", "version"]),
            ComposeVariant::Standalone => {
                CommandLine::new([format!("{}-compose", runtime), "--version".to_string()])
            }
        }
    }
}

/// Conditions under which a line gets the elevation token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationRule {
    /// The host OS does not run the runtime daemon for unprivileged users
    HostRequiresPrivilege,
    /// Listing containers failed without elevation. This also fires when
    /// the daemon is simply not running; the two cases look the same.
    RuntimeRefusesUnprivileged,
}

/// Elevation rules, evaluated top to bottom; the first that holds wins
const ELEVATION_RULES: &[ElevationRule] = &[
    ElevationRule::HostRequiresPrivilege,
    ElevationRule::RuntimeRefusesUnprivileged,
];

/// Probes the local machine for a container runtime and its compose tooling
/// and assembles the command lines needed to drive it
pub struct Tooling<R: CommandRunner = SystemRunner> {
    runtime: String,
    host: HostOs,
    runner: R,
}

impl Tooling<SystemRunner> {
    /// Tooling for `runtime` on the current host, running real processes
    pub fn detect(runtime: impl Into<String>) -> Self {
        Self::with_runner(runtime, HostOs::detect(), SystemRunner)
    }
}

impl<R: CommandRunner> Tooling<R> {
    pub fn with_runner(runtime: impl Into<String>, host: HostOs, runner: R) -> Self {
        Self {
            runtime: runtime.into(),
            host,
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `tokens` with output discarded; true iff it exits zero
    pub fn probe<I, S>(&self, tokens: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.probe(&CommandLine::new(tokens)).is_available()
    }

    pub fn runtime_status(&self) -> ToolStatus {
        self.runner
            .probe(&CommandLine::new([self.runtime.as_str(), "--version"]))
    }

    pub fn runtime_is_available(&self) -> bool {
        self.runtime_status().is_available()
    }

    pub fn compose_status(&self, variant: ComposeVariant) -> ToolStatus {
        self.runner.probe(&variant.probe_line(&self.runtime))
    }

    pub fn compose_v2_is_available(&self) -> bool {
        self.compose_status(ComposeVariant::Plugin).is_available()
    }

    pub fn compose_v1_is_available(&self) -> bool {
        self.compose_status(ComposeVariant::Standalone).is_available()
    }

    /// True when `<runtime> ps` fails without elevation
    pub fn runtime_requires_elevation(&self) -> bool {
        !self.probe([self.runtime.as_str(), "ps"])
    }

    /// Pick the compose variant to use, or explain why none can be used
    pub fn resolve_compose(&self) -> Result<ComposeVariant, ToolingError> {
        if !self.runtime_is_available() {
            return Err(self.unavailable(UnavailableReason::RuntimeMissing));
        }

        COMPOSE_PREFERENCE
            .iter()
            .copied()
            .find(|variant| self.compose_status(*variant).is_available())
            .inspect(|variant| {
                debug!(runtime = %self.runtime, variant = variant.label(), "compose resolved")
            })
            .ok_or_else(|| self.unavailable(UnavailableReason::ComposeMissing))
    }

    fn rule_holds(&self, rule: ElevationRule) -> bool {
        match rule {
            ElevationRule::HostRequiresPrivilege => !self.host.runs_runtime_unprivileged(),
            ElevationRule::RuntimeRefusesUnprivileged => self.runtime_requires_elevation(),
        }
    }

    /// First elevation rule that holds, if any. Later rules are not
    /// evaluated once one holds, so `ps` is only probed on macOS.
    pub fn elevation_reason(&self) -> Option<ElevationRule> {
        ELEVATION_RULES
            .iter()
            .copied()
            .find(|rule| self.rule_holds(*rule))
    }

    /// Assemble the full compose command line for `tail`
    pub fn build_invocation<I, S>(&self, tail: I) -> Result<CommandLine, ToolingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let variant = self.resolve_compose()?;
        let mut line = CommandLine::new(tail).prepend(variant.prefix(&self.runtime));

        if let Some(rule) = self.elevation_reason() {
            debug!(?rule, host = %self.host, "elevating compose invocation");
            line = line.prepend([ELEVATION_TOKEN]);
        }

        Ok(line)
    }

    /// Names of the compose projects currently running
    pub fn list_active_environments(&self) -> Result<BTreeSet<String>, ToolingError> {
        let line = self.build_invocation(["ls"])?;
        let stdout = self.runner.capture(&line)?;
        Ok(parse_active_environments(&stdout))
    }

    /// Whether any lab is running; with `verbose`, tell the user which ones
    pub fn has_active_environment(&self, verbose: bool) -> Result<bool, ToolingError> {
        self.has_active_environment_with(verbose, |notice| println!("{}", notice))
    }

    /// Like `has_active_environment`, handing the notice to `report` instead of stdout
    pub fn has_active_environment_with<F>(
        &self,
        verbose: bool,
        report: F,
    ) -> Result<bool, ToolingError>
    where
        F: FnOnce(&str),
    {
        let running = self.list_active_environments()?;
        if running.is_empty() {
            return Ok(false);
        }

        if verbose {
            report(&running_labs_notice(&running));
        }
        Ok(true)
    }

    /// Build and run a compose invocation attached to the terminal
    pub fn run_compose<I, S>(&self, tail: I) -> Result<(), ToolingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let line = self.build_invocation(tail)?;
        self.run(&line)
    }

    /// Run an already assembled line attached to the terminal
    pub fn run(&self, line: &CommandLine) -> Result<(), ToolingError> {
        self.runner.run(line)
    }

    fn unavailable(&self, reason: UnavailableReason) -> ToolingError {
        debug!(runtime = %self.runtime, host = %self.host, %reason, "tooling unavailable");
        ToolingError::Unavailable {
            reason,
            runtime: self.runtime.clone(),
        }
    }
}

/// Parse `compose ls` output: skip the header, keep the first column
pub fn parse_active_environments(stdout: &str) -> BTreeSet<String> {
    stdout
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Notice printed when labs are already running
pub fn running_labs_notice(running: &BTreeSet<String>) -> String {
    let names = running.iter().cloned().collect::<Vec<_>>().join(", ");
    format!(
        "You already have the following running labs: {}. Please stop them before starting a new one.",
        names.bold()
    )
}
