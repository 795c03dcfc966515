//! Latest-release lookup against the package registry

use super::version::UpdateStatus;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Timeout for the registry request (5 seconds)
const REGISTRY_TIMEOUT: Duration = Duration::from_secs(5);

/// Subset of the registry's crate metadata response
#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    #[serde(default)]
    max_stable_version: Option<String>,
    #[serde(default)]
    max_version: Option<String>,
}

impl CrateInfo {
    fn latest(self) -> Option<String> {
        self.max_stable_version
            .or(self.max_version)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Checks whether a newer release of the running package exists
pub struct UpdateChecker {
    client: reqwest::Client,
    registry: Url,
    package: String,
    current_version: String,
}

impl UpdateChecker {
    /// Create a checker with a user agent and the registry timeout applied
    pub fn new(
        registry: Url,
        package: &str,
        current_version: &str,
        user_agent: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REGISTRY_TIMEOUT)
            .build()
            .context("Failed to build the registry HTTP client")?;
        Ok(Self::with_client(client, registry, package, current_version))
    }

    pub fn with_client(
        client: reqwest::Client,
        registry: Url,
        package: &str,
        current_version: &str,
    ) -> Self {
        Self {
            client,
            registry,
            package: package.to_string(),
            current_version: current_version.to_string(),
        }
    }

    /// Create a checker from a product config, honouring the registry URL override
    pub fn from_config<C: ProductConfig>(config: &C, current_version: &str) -> Result<Self> {
        let url_str = std::env::var(config.registry_url_env())
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| config.default_registry_url().to_string());
        let registry =
            Url::parse(&url_str).with_context(|| format!("Invalid registry URL: {}", url_str))?;
        Self::new(
            registry,
            config.package_name(),
            current_version,
            config.user_agent(),
        )
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    /// Fetch the latest published version of the package
    pub async fn fetch_latest_version(&self) -> Result<String> {
        let url = Self::build_url(&self.registry, &self.package)?;
        debug!(%url, "querying registry");

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                anyhow::bail!(
                    "Timeout when trying to connect to the package registry ({})",
                    url
                )
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to reach the package registry at {}", url));
            }
        };

        if !response.status().is_success() {
            anyhow::bail!(
                "Unable to connect to the package registry at {}: HTTP {}",
                url,
                response.status()
            );
        }

        let body: CrateResponse = response
            .json()
            .await
            .context("Failed to parse registry response")?;

        body.krate.latest().ok_or_else(|| {
            anyhow::anyhow!("Registry response for '{}' has no version", self.package)
        })
    }

    /// Compare the running version against the registry.
    /// Failures are reported as `UpdateStatus::Unknown`, never as errors.
    pub async fn check(&self) -> UpdateStatus {
        match self.fetch_latest_version().await {
            Ok(latest) => UpdateStatus::from_versions(&self.current_version, &latest),
            Err(e) => {
                warn!(error = %e, "update check failed");
                UpdateStatus::Unknown {
                    reason: e.to_string(),
                }
            }
        }
    }
}
