//! Domain-level error types for ios-backup-extract.
//!
//! All errors are typed with `thiserror`. Most of them are fatal for a run;
//! per-message media failures are recovered by the transcript builder and
//! never surface as an `AppError`.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Backup directory for the requested identifier does not exist.
    #[error("Backup not found at: {path}")]
    BackupNotFound { path: PathBuf },

    /// No manifest record matched a lookup that requires one.
    #[error("No manifest entry matches {pattern}")]
    MissingManifestEntry { pattern: String },

    /// More than one manifest record matched a lookup that requires exactly one.
    #[error("{count} manifest entries match {pattern}, expected exactly one")]
    AmbiguousManifestEntry { pattern: String, count: usize },

    /// A manifest record points at a blob that is absent from the store.
    #[error("Content blob {file_id} missing at: {path}")]
    MissingBlob { file_id: String, path: PathBuf },

    /// A backup's Info.plist could not be read or lacks required fields.
    #[error("Malformed backup metadata at {path}: {message}")]
    MalformedMetadata { path: PathBuf, message: String },

    /// The external document converter failed or could not be started.
    #[error("Document converter '{program}' failed: {message}")]
    Converter { program: String, message: String },

    /// Failed to open or query a database.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

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
    /// Create a database error from rusqlite error.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
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
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
