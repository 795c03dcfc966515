//! Version comparison for the self-update notice

use anyhow::Result;
use semver::Version;

/// Result of comparing the running CLI against the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The running version is the latest one (or newer)
    UpToDate,
    /// The registry has a newer release
    Available { current: String, latest: String },
    /// The registry could not be queried
    Unknown { reason: String },
}

impl UpdateStatus {
    /// Classify a (current, latest) pair
    pub fn from_versions(current: &str, latest: &str) -> Self {
        if is_newer(current, latest) {
            UpdateStatus::Available {
                current: current.to_string(),
                latest: latest.to_string(),
            }
        } else {
            UpdateStatus::UpToDate
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, UpdateStatus::Available { .. })
    }
}

/// Whether `latest` should be offered as an upgrade over `current`
///
/// Semver ordering when both parse; otherwise any difference counts.
pub fn is_newer(current: &str, latest: &str) -> bool {
    match (parse_version(current), parse_version(latest)) {
        (Ok(current), Ok(latest)) => latest > current,
        _ => current.trim() != latest.trim(),
    }
}

/// Parse version string, handling various formats
pub fn parse_version(version_str: &str) -> Result<Version> {
    // Remove leading 'v' if present
    let trimmed = version_str.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Warning shown when a newer release exists
pub fn update_warning(package: &str, current: &str, latest: &str, upgrade_command: &str) -> String {
    format!(
        "Warning! New version of {} available: {}. You are using {}. Please upgrade.\n\
         Upgrade with: {}",
        package, latest, current, upgrade_command
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_older_than_registry() {
        let status = UpdateStatus::from_versions("0.1.0", "0.2.0");
        assert_eq!(
            status,
            UpdateStatus::Available {
                current: "0.1.0".to_string(),
                latest: "0.2.0".to_string()
            }
        );
    }

    #[test]
    fn test_cli_same_as_registry() {
        assert_eq!(UpdateStatus::from_versions("0.1.0", "0.1.0"), UpdateStatus::UpToDate);
    }

    #[test]
    fn test_cli_newer_than_registry() {
        assert!(!UpdateStatus::from_versions("0.3.0", "0.2.9").is_available());
    }

    #[test]
    fn test_leading_v_is_ignored() {
        assert!(!is_newer("v1.2.3", "1.2.3"));
        assert!(is_newer("1.2.3", "v1.10.0"));
    }

    #[test]
    fn test_unparseable_versions_fall_back_to_inequality() {
        assert!(is_newer("dev", "0.1.0"));
        assert!(!is_newer("nightly", "nightly"));
    }

    #[test]
    fn test_update_warning_mentions_both_versions() {
        let warning = update_warning("jedha-cli", "0.1.0", "0.2.0", "cargo install jedha-cli --force");
        assert!(warning.contains("available: 0.2.0"));
        assert!(warning.contains("You are using 0.1.0"));
        assert!(warning.contains("cargo install jedha-cli --force"));
    }
}
