//! CLI configuration loading.

use anyhow::{Context, Result};
use aquarium_training::LaunchConfig;
use std::path::Path;

/// Load the launch configuration.
///
/// Only an explicitly passed file is read; without one the job keeps its
/// fixed settings.
pub fn load_config(path: Option<&Path>) -> Result<LaunchConfig> {
    match path {
        Some(path) => LaunchConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(LaunchConfig::default()),
    }
}
