//! Host operating system detection

use std::fmt;

/// Operating system the CLI is running on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl HostOs {
    pub fn detect() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value
    pub fn from_name(name: &str) -> Self {
        match name {
            "macos" => HostOs::MacOs,
            "linux" => HostOs::Linux,
            "windows" => HostOs::Windows,
            _ => HostOs::Other,
        }
    }

    /// Whether the desktop runtime on this OS is reachable without elevation.
    /// Only macOS qualifies; everywhere else elevation is assumed.
    pub fn runs_runtime_unprivileged(&self) -> bool {
        matches!(self, HostOs::MacOs)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            HostOs::MacOs => "macOS",
            HostOs::Linux => "Linux",
            HostOs::Windows => "Windows",
            HostOs::Other => "other",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(HostOs::from_name("macos"), HostOs::MacOs);
        assert_eq!(HostOs::from_name("linux"), HostOs::Linux);
        assert_eq!(HostOs::from_name("windows"), HostOs::Windows);
        assert_eq!(HostOs::from_name("freebsd"), HostOs::Other);
    }

    #[test]
    fn test_only_macos_runs_unprivileged() {
        assert!(HostOs::MacOs.runs_runtime_unprivileged());
        assert!(!HostOs::Linux.runs_runtime_unprivileged());
        assert!(!HostOs::Windows.runs_runtime_unprivileged());
        assert!(!HostOs::Other.runs_runtime_unprivileged());
    }

    #[test]
    fn test_display() {
        assert_eq!(HostOs::MacOs.to_string(), "macOS");
        assert_eq!(HostOs::from_name("linux").to_string(), "Linux");
    }
}
