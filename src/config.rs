//! Settings loading and management

use crate::types::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Loads setup settings from a TOML file.
///
/// If the settings file doesn't exist, returns the default settings and logs
/// a warning to stderr. Fields missing from the file keep their defaults.
///
/// # Arguments
/// * `settings_path` - Path to the settings TOML file
///
/// # Returns
/// * `Ok(Settings)` - Loaded settings or defaults if file not found
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_settings(settings_path: &Path) -> Result<Settings> {
    if !settings_path.exists() {
        eprintln!(
            "Warning: Settings file '{}' not found. Using default settings.",
            settings_path.display()
        );
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(settings_path)
        .with_context(|| format!("Failed to read settings file: {}", settings_path.display()))?;

    let settings: Settings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", settings_path.display()))?;

    tracing::debug!(?settings, "loaded settings");
    Ok(settings)
}
