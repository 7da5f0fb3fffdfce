// src/error.rs

//! Error types for primary metadata generation

use thiserror::Error;

/// Errors that can occur while generating repository metadata
#[derive(Error, Debug)]
pub enum Error {
    /// Writer used out of order (begin/add/end state machine violated)
    #[error("Invalid writer state: {0}")]
    InvalidState(String),

    /// The XML sink failed; the document in progress must be discarded
    #[error("Failed to write primary metadata: {0}")]
    WriteFailed(String),

    /// Database error from a SQLite-backed source
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database or workspace could not be prepared
    #[error("Initialization error: {0}")]
    InitError(String),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::WriteFailed(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::WriteFailed(err.to_string())
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
