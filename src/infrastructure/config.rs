//! Configuration file management.
//!
//! Handles loading and creating TOML configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# Fathom to Linear Configuration
# Auto-generated - edit as needed

[loader]
# Interval between document readiness checks in milliseconds
poll_interval_ms = 100

# Stop waiting after this many milliseconds and extract anyway
timeout_ms = 5000

[linear]
# Base URL for prefilled new-issue links
base_url = "https://linear.app/"

# Priority used when none was chosen before (urgent, high, medium, low)
default_priority = "high"

[[teams]]
id = "ENG"
name = "Engineering (ENG)"

[[teams]]
id = "PROD"
name = "Product (PROD)"

[[teams]]
id = "CUSTOM"
name = "Custom Team"

[paths]
# Custom data directory (optional, defaults to ~/.fathom-linear)
# data_dir = "/custom/path"
"#;

/// Load configuration from file or create default.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let config_path = config_file_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Create the default configuration file at `path` if it is missing.
///
/// Returns true when a new file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

/// Create default configuration file if it doesn't exist.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists() -> Result<bool> {
    ensure_config_at(&config_file_path())
}

/// Get the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    AppConfig::default_data_dir().join("config.toml")
}
