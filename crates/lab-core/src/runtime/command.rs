//! Command lines assembled for the container tooling

use std::fmt;
use std::process::Command;

/// An ordered list of tokens: program first, then its arguments
///
/// Lines are built from a caller-supplied argument tail by prepending the
/// tool prefix and, when needed, the elevation token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Insert `prefix` in front of the current tokens, preserving its order
    pub fn prepend<I, S>(mut self, prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: Vec<String> = prefix.into_iter().map(Into::into).collect();
        tokens.append(&mut self.tokens);
        self.tokens = tokens;
        self
    }

    /// First token, or an empty string for an empty line
    pub fn program(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.tokens.len() >= prefix.len()
            && self.tokens.iter().zip(prefix).all(|(t, p)| t == p)
    }

    /// Build a `std::process::Command` for this line
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.args());
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_keeps_prefix_order() {
        let line = CommandLine::new(["--file", "lab.yaml", "ps"])
            .prepend(["docker", "compose"])
            .prepend(["sudo"]);
        assert_eq!(
            line.tokens(),
            ["sudo", "docker", "compose", "--file", "lab.yaml", "ps"]
        );
        assert_eq!(line.program(), "sudo");
        assert_eq!(line.args().len(), 5);
    }

    #[test]
    fn test_starts_with() {
        let line = CommandLine::new(["docker", "compose", "ls"]);
        assert!(line.starts_with(&["docker", "compose"]));
        assert!(!line.starts_with(&["docker-compose"]));
        assert!(!line.starts_with(&["docker", "compose", "ls", "-a"]));
    }

    #[test]
    fn test_empty_line() {
        let line = CommandLine::default();
        assert!(line.is_empty());
        assert_eq!(line.program(), "");
        assert!(line.args().is_empty());
        assert_eq!(line.to_string(), "");
    }
}
