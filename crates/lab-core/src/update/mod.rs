//! Self-update notification
//!
//! This module provides:
//! - The registry lookup for the latest published version
//! - Version comparison between the running CLI and that release
//! - The upgrade warning text

pub mod registry;
pub mod version;

use crate::product::ProductConfig;

pub use registry::UpdateChecker;
pub use version::{is_newer, update_warning, UpdateStatus};

/// Run the update check unless the product disables it through the environment
pub async fn check_for_updates<C: ProductConfig>(config: &C, current_version: &str) -> UpdateStatus {
    if config.update_check_disabled() {
        return UpdateStatus::UpToDate;
    }

    match UpdateChecker::from_config(config, current_version) {
        Ok(checker) => checker.check().await,
        Err(e) => UpdateStatus::Unknown {
            reason: e.to_string(),
        },
    }
}
