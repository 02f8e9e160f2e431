//! Error types for table dump and edit operations.
//!
//! Provides a unified error type covering database access, file I/O,
//! JSON decoding and identifier validation failures.

use std::path::PathBuf;

use table_json_core::IdentifierError;
use thiserror::Error;

/// Errors that can occur while dumping or editing a table.
#[derive(Debug, Error)]
pub enum TableJsonError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Reading, writing or copying a file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON file could not be parsed or written.
    #[error("JSON error in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Input JSON is well-formed but not an array of row-objects.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A table or column name can never be a valid identifier.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    /// The table does not exist in the database.
    #[error("no such table: {0}")]
    UnknownTable(String),

    /// The database file sits inside the staging directory, which is
    /// wiped before every copy.
    #[error("database '{}' lives inside the staging directory '{}'", .database.display(), .staging_dir.display())]
    StagingConflict {
        database: PathBuf,
        staging_dir: PathBuf,
    },

    /// A row-object names a column the table does not have.
    #[error("table '{table}' has no column named '{column}'")]
    UnknownColumn { table: String, column: String },
}

impl TableJsonError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for results with [`TableJsonError`].
pub type Result<T> = std::result::Result<T, TableJsonError>;
