//! Charm-style CLI flows using cliclack

use crate::error::{ToolingError, UnavailableReason};
use crate::labs::{self, Lab, LabAction, LabCatalog};
use crate::product::ProductConfig;
use crate::runtime::Tooling;
use crate::update::{self, UpdateStatus};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// What the user asked the CLI to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabCommand {
    /// Print the catalog of available labs
    List,
    /// Print the labs currently running
    Running,
    /// Apply a compose action to one lab
    Lab { action: LabAction, name: String },
}

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Labs directory overriding the product default
    pub labs_dir: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,

    /// Skip the registry version lookup
    pub skip_update_check: bool,
}

/// Run one command with interactive prompts
pub async fn run<C: ProductConfig>(
    config: &C,
    command: LabCommand,
    args: RunArgs,
    cli_version: &str,
) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Tell the user about newer releases
    if args.skip_update_check {
        cliclack::log::info("Skipping update check")?;
    } else {
        handle_update_check(config, cli_version).await?;
    }

    let labs_dir = labs::resolve_labs_dir(config, args.labs_dir.as_deref());

    // Step 2: Dispatch
    match command {
        LabCommand::List => list_labs(&labs_dir)?,
        LabCommand::Running => show_running(config)?,
        LabCommand::Lab { action, name } => {
            if !apply_action(config, &labs_dir, action, &name, args.yes)? {
                return Ok(());
            }
        }
    }

    cliclack::outro("Happy hacking!")?;

    Ok(())
}

async fn handle_update_check<C: ProductConfig>(config: &C, cli_version: &str) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking for updates...");

    let status = update::check_for_updates(config, cli_version).await;
    match &status {
        UpdateStatus::UpToDate => {
            spinner.stop(format!("{} {} is up to date", config.name(), cli_version));
        }
        UpdateStatus::Available { current, latest } => {
            spinner.stop("Update available");
            cliclack::log::warning(update::update_warning(
                config.package_name(),
                current,
                latest,
                config.upgrade_command(),
            ))?;
        }
        UpdateStatus::Unknown { reason } => {
            spinner.stop("Unable to check for updates.");
            cliclack::log::warning(reason)?;
        }
    }

    Ok(())
}

fn list_labs(labs_dir: &Path) -> Result<()> {
    let catalog = LabCatalog::load(labs_dir).context("Failed to load the lab catalog")?;

    if catalog.is_empty() {
        cliclack::log::warning(format!("No labs listed in {}", labs_dir.display()))?;
        return Ok(());
    }

    println!();
    println!("{}", lab_table(catalog.labs()));
    Ok(())
}

/// Render the catalog as an aligned text table
pub(crate) fn lab_table(labs: &[Lab]) -> String {
    const HEADERS: [&str; 3] = ["Name", "IP", "Description"];

    let name_w = column_width(HEADERS[0], labs.iter().map(|lab| lab.name.as_str()));
    let ip_w = column_width(HEADERS[1], labs.iter().map(|lab| lab.ip.as_str()));

    let mut out = Vec::with_capacity(labs.len() + 2);
    out.push(format!("  {}", "Available Labs".bold()));
    out.push(format!(
        "  {:<name_w$}  {:<ip_w$}  {}",
        HEADERS[0].bold(),
        HEADERS[1].bold(),
        HEADERS[2].bold(),
    ));
    for lab in labs {
        out.push(format!(
            "  {:<name_w$}  {:<ip_w$}  {}",
            lab.name.cyan(),
            lab.ip,
            lab.description.dimmed(),
        ));
    }
    out.join("\n")
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|cell| cell.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

fn show_running<C: ProductConfig>(config: &C) -> Result<()> {
    let tooling = Tooling::detect(config.runtime());
    let active = tooling
        .has_active_environment_with(true, warn_running)
        .map_err(|e| report_tooling_error(config, e))?;

    if !active {
        cliclack::log::info("No lab is currently running")?;
    }
    Ok(())
}

/// Returns false when the user declined a confirmation
fn apply_action<C: ProductConfig>(
    config: &C,
    labs_dir: &Path,
    action: LabAction,
    name: &str,
    yes: bool,
) -> Result<bool> {
    let catalog = LabCatalog::load(labs_dir).context("Failed to load the lab catalog")?;
    let compose_file = catalog.compose_file(name)?;

    if let Some(question) = action.confirmation() {
        let confirmed = yes || cliclack::confirm(question).initial_value(false).interact()?;
        if !confirmed {
            cliclack::outro_cancel("Aborting.")?;
            return Ok(false);
        }
    }

    let tooling = Tooling::detect(config.runtime());

    if action.requires_no_running_lab() {
        let running = tooling
            .has_active_environment_with(true, warn_running)
            .map_err(|e| report_tooling_error(config, e))?;
        if running {
            anyhow::bail!("Cannot start lab {} while other labs are running.", name);
        }
    }

    let line = tooling
        .build_invocation(action.compose_args(&compose_file))
        .map_err(|e| report_tooling_error(config, e))?;
    cliclack::log::info(format!("{} {}", "Running:".dimmed(), line.to_string().yellow()))?;

    match tooling.run(&line) {
        Ok(()) => {
            if let Some(message) = action.success_message(name) {
                cliclack::log::success(message)?;
            }
            Ok(true)
        }
        Err(e) => {
            cliclack::log::error(action.failure_message(name))?;
            Err(anyhow::Error::new(e))
        }
    }
}

fn warn_running(notice: &str) {
    let _ = cliclack::log::warning(notice);
}

/// Show installation guidance for missing tooling, then hand the error back
fn report_tooling_error<C: ProductConfig>(config: &C, err: ToolingError) -> anyhow::Error {
    if let ToolingError::Unavailable { reason, runtime } = &err {
        let url = match reason {
            UnavailableReason::RuntimeMissing => config.runtime_install_url(),
            UnavailableReason::ComposeMissing => config.compose_install_url(),
        };
        let _ = cliclack::log::error(reason.guidance(runtime, url));
    }
    anyhow::Error::new(err)
}
