//! Domain-level error types for fathom-linear.
//!
//! All errors are typed with `thiserror` and carry a short, user-facing
//! message. Extraction itself never surfaces these: it reports failure
//! through `ExtractionResult::failed` instead.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input document not found at the given location.
    #[error("No active document found: {path}")]
    DocumentNotFound { path: PathBuf },

    /// Failed to open or query the preference store.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid data supplied by the user or a collaborator.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Nothing usable came out of an extraction request.
    #[error("{message}")]
    Extraction { message: String },

    /// A required issue field is missing.
    #[error("{message}")]
    Validation { message: String },

    /// JSON serialization failed.
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a storage error from a rusqlite error.
    pub fn storage(err: rusqlite::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a JSON error.
    pub fn json(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_bare() {
        let err = AppError::validation("Please select a team");
        assert_eq!(err.to_string(), "Please select a team");
    }

    #[test]
    fn test_document_not_found_message() {
        let err = AppError::DocumentNotFound {
            path: PathBuf::from("/tmp/missing.html"),
        };
        assert!(err.to_string().starts_with("No active document found"));
    }
}
