// src/error.rs

//! Error types shared across the crate

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can fail a run
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Download error: {0}")]
    DownloadError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Initialization error: {0}")]
    InitError(String),

    /// A version string the comparator cannot tokenize numerically
    #[error("Malformed version '{version}': {reason}")]
    MalformedVersion { version: String, reason: String },

    #[error("Invalid lock group pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// The file transfer collaborator could not deliver an artifact
    #[error("Failed to copy {artifact} to {destination}: {reason}")]
    TransferFailed {
        artifact: String,
        destination: String,
        reason: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}
