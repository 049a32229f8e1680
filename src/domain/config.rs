//! Application configuration model.
//!
//! Contains the document loader timings, Linear URL settings, the team
//! list offered when drafting issues, and path overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::models::{Priority, Team};

/// Timings for the document readiness wait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Interval between readiness checks in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Give up waiting after this many milliseconds and extract anyway.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            timeout_ms: default_timeout(),
        }
    }
}

const fn default_poll_interval() -> u64 {
    100
}

const fn default_timeout() -> u64 {
    5000
}

/// Linear issue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearConfig {
    /// Base URL for prefilled "new issue" links.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Priority used when neither the flag nor a saved value is set.
    #[serde(default)]
    pub default_priority: Priority,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_priority: Priority::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://linear.app/".to_string()
}

/// Path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub linear: LinearConfig,

    /// Teams offered when drafting an issue.
    #[serde(default = "default_teams")]
    pub teams: Vec<Team>,

    #[serde(default)]
    pub paths: PathConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            linear: LinearConfig::default(),
            teams: default_teams(),
            paths: PathConfig::default(),
        }
    }
}

fn default_teams() -> Vec<Team> {
    vec![
        Team::new("ENG", "Engineering (ENG)"),
        Team::new("PROD", "Product (PROD)"),
        Team::new("CUSTOM", "Custom Team"),
    ]
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fathom-linear")
    }

    /// Get the preference database path.
    #[must_use]
    pub fn preferences_db_path(&self) -> PathBuf {
        self.data_dir().join("preferences.db")
    }

    /// Resolves a team argument against the configured list by id or name.
    ///
    /// Unknown values are passed through as a custom team id.
    #[must_use]
    pub fn resolve_team(&self, value: &str) -> String {
        let value = value.trim();
        self.teams
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(value) || t.name.eq_ignore_ascii_case(value))
            .map_or_else(|| value.to_string(), |t| t.id.clone())
    }
}
