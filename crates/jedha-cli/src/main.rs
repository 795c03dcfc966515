//! jedhacli - Manage the labs of the Jedha Cybersecurity Bootcamp

use anyhow::Result;
use clap::{Parser, Subcommand};
use lab_core::tui::{LabCommand, RunArgs};
use lab_core::{LabAction, ProductConfig, ToolingError};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Jedha product configuration
#[derive(Clone)]
pub struct JedhaConfig;

impl ProductConfig for JedhaConfig {
    fn name(&self) -> &'static str {
        "jedhacli"
    }

    fn display_name(&self) -> &'static str {
        "Jedha CLI"
    }

    fn package_name(&self) -> &'static str {
        "jedha-cli"
    }

    fn default_registry_url(&self) -> &'static str {
        "https://crates.io/api/v1/crates"
    }

    fn registry_url_env(&self) -> &'static str {
        "JEDHA_REGISTRY_URL"
    }

    fn labs_dir_env(&self) -> &'static str {
        "JEDHA_LABS_DIR"
    }

    fn skip_update_env(&self) -> &'static str {
        "JEDHA_NO_UPDATE_CHECK"
    }

    fn runtime_env(&self) -> &'static str {
        "JEDHA_CONTAINER_RUNTIME"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install jedha-cli --force"
    }

    fn runtime_install_url(&self) -> &'static str {
        "https://docs.docker.com/get-docker/"
    }

    fn compose_install_url(&self) -> &'static str {
        "https://docs.docker.com/compose/install/"
    }

    fn user_agent(&self) -> &'static str {
        concat!("jedha-cli/", env!("CARGO_PKG_VERSION"))
    }
}

#[derive(Parser, Debug)]
#[command(name = "jedhacli")]
#[command(about = "A CLI to manage the labs for Cybersecurity Bootcamp at Jedha (https://jedha.co).")]
#[command(after_help = "Made with love by the Jedha Bootcamp Team")]
#[command(version, arg_required_else_help = true)]
pub struct Args {
    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding labs.yaml and the lab compose files
    #[arg(long = "labs-dir", global = true)]
    pub labs_dir: Option<PathBuf>,

    /// Do not query the registry for a newer release
    #[arg(long = "no-update-check", global = true)]
    pub no_update_check: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all the labs available
    List,
    /// Show the labs currently running
    Running,
    /// Show the status of a lab
    Status(LabArgs),
    /// Start a specific lab environment
    Start(LabArgs),
    /// Restart a lab
    Restart(LabArgs),
    /// Stop and clean up a specific lab environment
    Stop(ConfirmedLabArgs),
    /// Remove definitively a specific lab environment. Do it to free your disk space
    Remove(ConfirmedLabArgs),
}

#[derive(Parser, Debug)]
pub struct LabArgs {
    /// Name of the lab
    pub labname: String,
}

#[derive(Parser, Debug)]
pub struct ConfirmedLabArgs {
    /// Name of the lab
    pub labname: String,

    /// Skip the confirmation prompt
    #[arg(short, long, alias = "force")]
    pub yes: bool,
}

impl Command {
    /// Split into the library command and the auto-confirm flag
    fn into_lab_command(self) -> (LabCommand, bool) {
        let lab = |action: LabAction, name: String| LabCommand::Lab { action, name };
        match self {
            Command::List => (LabCommand::List, false),
            Command::Running => (LabCommand::Running, false),
            Command::Status(a) => (lab(LabAction::Status, a.labname), false),
            Command::Start(a) => (lab(LabAction::Start, a.labname), false),
            Command::Restart(a) => (lab(LabAction::Restart, a.labname), false),
            Command::Stop(a) => (lab(LabAction::Stop, a.labname), a.yes),
            Command::Remove(a) => (lab(LabAction::Remove, a.labname), a.yes),
        }
    }
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let config = JedhaConfig;
    let (command, yes) = args.command.into_lab_command();
    debug!(?command, "dispatching");

    let run_args = RunArgs {
        labs_dir: args.labs_dir,
        yes,
        skip_update_check: args.no_update_check || config.update_check_disabled(),
    };

    let result = lab_core::run(&config, command, run_args, CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = &result {
        // Missing tooling already printed its guidance
        if let Some(tooling) = e.downcast_ref::<ToolingError>() {
            if tooling.unavailable_reason().is_some() {
                std::process::exit(tooling.exit_code());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_stop_accepts_force_alias() {
        let args = Args::try_parse_from(["jedhacli", "stop", "intro", "--force"]).unwrap();
        let (command, yes) = args.command.into_lab_command();
        assert!(yes);
        assert_eq!(
            command,
            LabCommand::Lab {
                action: LabAction::Stop,
                name: "intro".to_string()
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["jedhacli", "start", "intro", "--no-update-check", "-vv"]).unwrap();
        assert!(args.no_update_check);
        assert_eq!(args.verbose, 2);
        let (_, yes) = args.command.into_lab_command();
        assert!(!yes);
    }

    #[test]
    fn test_lab_name_required() {
        assert!(Args::try_parse_from(["jedhacli", "start"]).is_err());
    }
}
