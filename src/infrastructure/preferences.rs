//! Persisted user preferences.
//!
//! The last chosen team, assignee and priority are remembered between
//! issue drafts. Values are stored as plain strings keyed by name.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{AppError, Result};

/// Last selected team id.
pub const TEAM_KEY: &str = "linearTeam";
/// Last used assignee.
pub const ASSIGNEE_KEY: &str = "lastAssignee";
/// Last selected priority.
pub const PRIORITY_KEY: &str = "linearPriority";

/// Key/value preference persistence.
pub trait PreferenceStore {
    /// Stored value for `key`, or `default` when nothing is stored.
    ///
    /// # Errors
    /// Returns error if the backing store cannot be read.
    fn get(&self, key: &str, default: &str) -> Result<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns error if the backing store cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// A stored preference with its last update time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceEntry {
    pub key: String,
    pub value: String,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Preference store backed by SQLite.
pub struct SqlitePreferences {
    conn: Connection,
}

impl SqlitePreferences {
    /// Opens or creates the preference database.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or schema creation fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create preference directory", e))?;
        }

        let conn = Connection::open(path).map_err(AppError::storage)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(AppError::storage)?;

        let store = Self { conn };
        store.init_schema()?;
        tracing::debug!(path = %path.display(), "Opened preference store");
        Ok(store)
    }

    /// In-memory store, used by tests and one-shot runs.
    ///
    /// # Errors
    /// Returns error if schema creation fails.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(AppError::storage)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
            )
            .map_err(AppError::storage)
    }

    /// All stored preferences ordered by key.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn entries(&self) -> Result<Vec<PreferenceEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value, updated_at FROM preferences ORDER BY key")
            .map_err(AppError::storage)?;

        let rows = stmt
            .query_map([], |row| {
                let updated_at: String = row.get(2)?;
                Ok(PreferenceEntry {
                    key: row.get(0)?,
                    value: row.get(1)?,
                    updated_at: DateTime::parse_from_rfc3339(&updated_at)
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc)),
                })
            })
            .map_err(AppError::storage)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AppError::storage)
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get(&self, key: &str, default: &str) -> Result<String> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(AppError::storage)?;

        Ok(value.unwrap_or_else(|| default.to_string()))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .map_err(AppError::storage)?;

        tracing::debug!(key, "Saved preference");
        Ok(())
    }
}
