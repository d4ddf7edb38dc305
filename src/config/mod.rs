//! Configuration module for ddg-search
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit settings file
pub const CONFIG_ENV: &str = "DDG_SEARCH_CONFIG";

/// Load settings, then apply environment overrides.
///
/// An explicit path must exist. Without one, the first file found in
/// [`default_paths`] is used, falling back to built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("settings file {} does not exist", path.display());
            }
            debug!("Loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => match default_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                debug!("Loading settings from: {}", path.display());
                Settings::from_file(&path)?
            }
            None => {
                debug!("No settings file found, using defaults");
                Settings::default()
            }
        },
    };

    settings.merge_env()?;
    Ok(settings)
}

/// Settings files probed when none is given explicitly
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("ddg-search.yml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("ddg-search").join("settings.yml"));
    }
    paths
}
