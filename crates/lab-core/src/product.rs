//! Product configuration trait for CLI binaries
//!
//! The library never hardcodes a package name, registry or runtime. Each
//! binary implements this trait and hands it to the library at startup.

/// Configuration trait for a lab-management CLI
///
/// Implementors define:
/// - Product identity (name, display name, published package name)
/// - Where to look for newer releases
/// - Which container runtime to drive
/// - Where lab definitions live
/// - Installation guidance shown when tooling is missing
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Package name as published on the registry
    fn package_name(&self) -> &'static str;

    /// Base URL of the registry metadata API (the package name is appended)
    fn default_registry_url(&self) -> &'static str;

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// Environment variable name for overriding the labs directory
    fn labs_dir_env(&self) -> &'static str;

    /// Environment variable that disables the update check when set
    fn skip_update_env(&self) -> &'static str;

    /// Environment variable name for overriding the container runtime binary
    fn runtime_env(&self) -> &'static str;

    /// Container runtime binary used when no override is set
    fn default_runtime(&self) -> &'static str {
        "docker"
    }

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Where to send users whose machine has no container runtime
    fn runtime_install_url(&self) -> &'static str;

    /// Where to send users whose runtime has no compose tooling
    fn compose_install_url(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }

    /// Container runtime binary, honouring the environment override
    fn runtime(&self) -> String {
        std::env::var(self.runtime_env())
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.default_runtime().to_string())
    }

    /// Whether the update check was disabled through the environment
    fn update_check_disabled(&self) -> bool {
        std::env::var(self.skip_update_env()).is_ok_and(|v| !v.is_empty() && v != "0")
    }
}
