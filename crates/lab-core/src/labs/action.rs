//! Compose operations that can be applied to a lab

use std::fmt;
use std::path::Path;

/// What to do with a lab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabAction {
    Status,
    Start,
    Restart,
    Stop,
    Remove,
}

impl LabAction {
    pub fn verb(&self) -> &'static str {
        match self {
            LabAction::Status => "show status of",
            LabAction::Start => "start",
            LabAction::Restart => "restart",
            LabAction::Stop => "take down",
            LabAction::Remove => "clean",
        }
    }

    /// Compose arguments for this action against `compose_file`
    pub fn compose_args(&self, compose_file: &Path) -> Vec<String> {
        let mut args = vec![
            "--file".to_string(),
            compose_file.to_string_lossy().into_owned(),
        ];
        let rest: &[&str] = match self {
            LabAction::Status => &["ps"],
            LabAction::Start => &["up", "-d"],
            LabAction::Restart => &["restart"],
            LabAction::Stop => &["down", "--remove-orphans", "--volumes"],
            LabAction::Remove => &["down", "--remove-orphans", "--volumes", "--rmi", "all"],
        };
        args.extend(rest.iter().map(|s| s.to_string()));
        args
    }

    /// Prompt shown before destructive actions
    pub fn confirmation(&self) -> Option<&'static str> {
        match self {
            LabAction::Stop => Some("Are you sure you want to stop the lab?"),
            LabAction::Remove => Some("Are you sure you want to remove the lab?"),
            _ => None,
        }
    }

    /// Whether other running labs must be stopped before this action
    pub fn requires_no_running_lab(&self) -> bool {
        matches!(self, LabAction::Start)
    }

    pub fn success_message(&self, lab: &str) -> Option<String> {
        match self {
            LabAction::Status => None,
            LabAction::Start => Some(format!("Lab {} started successfully.", lab)),
            LabAction::Restart => Some(format!("Lab {} restarted successfully.", lab)),
            LabAction::Stop => Some(format!("Lab {} taken down successfully.", lab)),
            LabAction::Remove => Some(format!("Lab {} definitively removed successfully.", lab)),
        }
    }

    pub fn failure_message(&self, lab: &str) -> String {
        match self {
            LabAction::Remove => format!("Failed to clean lab {}.", lab),
            _ => format!(
                "Failed to {} lab {}: Error with the docker compose file or Docker itself",
                self.verb(),
                lab
            ),
        }
    }
}

impl fmt::Display for LabAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LabAction::Status => "status",
            LabAction::Start => "start",
            LabAction::Restart => "restart",
            LabAction::Stop => "stop",
            LabAction::Remove => "remove",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(action: LabAction) -> Vec<String> {
        action.compose_args(Path::new("/labs/intro.yaml"))
    }

    #[test]
    fn test_compose_args() {
        assert_eq!(args(LabAction::Status), ["--file", "/labs/intro.yaml", "ps"]);
        assert_eq!(args(LabAction::Start), ["--file", "/labs/intro.yaml", "up", "-d"]);
        assert_eq!(args(LabAction::Restart), ["--file", "/labs/intro.yaml", "restart"]);
        assert_eq!(
            args(LabAction::Stop),
            ["--file", "/labs/intro.yaml", "down", "--remove-orphans", "--volumes"]
        );
        assert_eq!(
            args(LabAction::Remove),
            ["--file", "/labs/intro.yaml", "down", "--remove-orphans", "--volumes", "--rmi", "all"]
        );
    }

    #[test]
    fn test_only_destructive_actions_confirm() {
        assert!(LabAction::Stop.confirmation().is_some());
        assert!(LabAction::Remove.confirmation().is_some());
        assert!(LabAction::Start.confirmation().is_none());
        assert!(LabAction::Status.confirmation().is_none());
        assert!(LabAction::Restart.confirmation().is_none());
    }

    #[test]
    fn test_only_start_checks_running_labs() {
        assert!(LabAction::Start.requires_no_running_lab());
        assert!(!LabAction::Restart.requires_no_running_lab());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            LabAction::Start.success_message("intro").as_deref(),
            Some("Lab intro started successfully.")
        );
        assert!(LabAction::Status.success_message("intro").is_none());
        assert_eq!(
            LabAction::Stop.failure_message("intro"),
            "Failed to take down lab intro: Error with the docker compose file or Docker itself"
        );
        assert_eq!(LabAction::Remove.failure_message("intro"), "Failed to clean lab intro.");
    }
}
