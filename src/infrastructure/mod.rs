//! Infrastructure layer - external adapters (filesystem, preference database).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod loader;
pub mod preferences;

pub use config::{config_file_path, ensure_config_exists, load_config};
pub use loader::load_document;
pub use preferences::{PreferenceStore, SqlitePreferences};
