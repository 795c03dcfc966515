//! Typed errors for tooling resolution and the lab catalog
//!
//! Orchestration code wraps these in `anyhow` with context; the binary
//! downcasts to `ToolingError` to pick the process exit code.

use std::fmt;
use std::path::PathBuf;

/// Why the container tooling could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The runtime binary itself did not answer `--version`
    RuntimeMissing,
    /// The runtime is present but neither compose variant is
    ComposeMissing,
}

impl UnavailableReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnavailableReason::RuntimeMissing => "runtime missing",
            UnavailableReason::ComposeMissing => "compose missing",
        }
    }

    /// Installation guidance shown to the user before exiting
    pub fn guidance(&self, runtime: &str, install_url: &str) -> String {
        match self {
            UnavailableReason::RuntimeMissing => format!(
                "{} not found. Please install it: {}",
                capitalize(runtime),
                install_url
            ),
            UnavailableReason::ComposeMissing => format!(
                "{} Compose (either V1 or V2) not found. Please install {} Desktop or {}-compose: {}",
                capitalize(runtime),
                capitalize(runtime),
                runtime,
                install_url
            ),
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Errors raised while resolving or running the container tooling
#[derive(Debug, thiserror::Error)]
pub enum ToolingError {
    // Unavailable is returned when the runtime or its compose tooling is absent.
    #[error("container tooling unavailable: {reason}")]
    Unavailable {
        reason: UnavailableReason,
        runtime: String,
    },

    // Spawn is returned when a command that must run could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Execution is returned when a command ran but did not succeed.
    #[error("`{command}` failed with {}", describe_code(.code))]
    Execution {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl ToolingError {
    /// Process exit status callers should terminate with
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// The reason, when the tooling is missing rather than broken
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        match self {
            ToolingError::Unavailable { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Errors raised while reading lab definitions
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Labs directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid lab name '{0}'")]
    InvalidName(String),

    #[error("Lab '{0}' is not listed in the catalog. Run `list` to see the available labs.")]
    UnknownLab(String),

    #[error("Docker Compose file not found for the specified lab '{lab}'.")]
    ComposeFileNotFound { lab: String, path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(UnavailableReason::RuntimeMissing.to_string(), "runtime missing");
        assert_eq!(UnavailableReason::ComposeMissing.to_string(), "compose missing");
    }

    #[test]
    fn test_guidance_names_runtime() {
        let msg = UnavailableReason::RuntimeMissing.guidance("docker", "https://example.invalid");
        assert!(msg.starts_with("Docker not found"));

        let msg = UnavailableReason::ComposeMissing.guidance("docker", "https://example.invalid");
        assert!(msg.contains("docker-compose"));
        assert!(msg.contains("either V1 or V2"));
    }

    #[test]
    fn test_execution_error_message() {
        let err = ToolingError::Execution {
            command: "docker compose ls".to_string(),
            code: Some(1),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "`docker compose ls` failed with exit code 1");
        assert_eq!(err.exit_code(), 1);
        assert!(err.unavailable_reason().is_none());
    }
}
