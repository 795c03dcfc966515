//! Subprocess execution behind a trait so resolution logic can be scripted in tests

use super::command::CommandLine;
use crate::error::ToolingError;
use std::process::Stdio;
use tracing::debug;

/// Outcome of probing an external binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    /// The binary ran and exited with status zero
    Available,
    /// The binary is missing from PATH or exited non-zero
    Absent,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ToolStatus::Available)
    }
}

impl From<ToolStatus> for bool {
    fn from(status: ToolStatus) -> bool {
        status.is_available()
    }
}

/// Runs external commands on behalf of the tooling resolver
pub trait CommandRunner {
    /// Run with all output discarded. Never fails: any problem is `Absent`.
    fn probe(&self, line: &CommandLine) -> ToolStatus;

    /// Run and return stdout as text; non-zero exit is an error
    fn capture(&self, line: &CommandLine) -> Result<String, ToolingError>;

    /// Run attached to the user's terminal; non-zero exit is an error
    fn run(&self, line: &CommandLine) -> Result<(), ToolingError>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn probe(&self, line: &CommandLine) -> ToolStatus {
        let status = line
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => {
                debug!(command = %line, "probe succeeded");
                ToolStatus::Available
            }
            Ok(status) => {
                debug!(command = %line, code = ?status.code(), "probe exited non-zero");
                ToolStatus::Absent
            }
            Err(e) => {
                debug!(command = %line, error = %e, "probe could not start");
                ToolStatus::Absent
            }
        }
    }

    fn capture(&self, line: &CommandLine) -> Result<String, ToolingError> {
        debug!(command = %line, "capturing output");
        let output = line
            .to_command()
            .stdin(Stdio::inherit())
            .output()
            .map_err(|source| ToolingError::Spawn {
                command: line.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolingError::Execution {
                command: line.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run(&self, line: &CommandLine) -> Result<(), ToolingError> {
        debug!(command = %line, "running");
        let status = line
            .to_command()
            .status()
            .map_err(|source| ToolingError::Spawn {
                command: line.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolingError::Execution {
                command: line.to_string(),
                code: status.code(),
                stderr: String::new(),
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_missing_binary_is_absent() {
        let line = CommandLine::new(["definitely-not-a-real-binary-9f2c1", "--version"]);
        assert_eq!(SystemRunner.probe(&line), ToolStatus::Absent);
    }

    #[test]
    fn test_probe_empty_line_is_absent() {
        assert_eq!(SystemRunner.probe(&CommandLine::default()), ToolStatus::Absent);
    }

    #[test]
    fn test_capture_missing_binary_is_spawn_error() {
        let line = CommandLine::new(["definitely-not-a-real-binary-9f2c1", "ls"]);
        let err = SystemRunner.capture(&line).unwrap_err();
        assert!(matches!(err, ToolingError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_exit_status() {
        assert!(SystemRunner.probe(&CommandLine::new(["true"])).is_available());
        assert!(!SystemRunner.probe(&CommandLine::new(["false"])).is_available());
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_non_zero_exit_is_execution_error() {
        let err = SystemRunner
            .capture(&CommandLine::new(["sh", "-c", "exit 3"]))
            .unwrap_err();
        match err {
            ToolingError::Execution { code, .. } => assert_eq!(code, Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tool_status_into_bool() {
        let available: bool = ToolStatus::Available.into();
        let absent: bool = ToolStatus::Absent.into();
        assert!(available);
        assert!(!absent);
    }
}
