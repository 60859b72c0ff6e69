//! Error types for commit message linting

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur before a message can be linted
#[derive(Debug, Error)]
pub enum LintError {
    /// Commit message file not found at the specified path
    #[error("Commit message file not found: {path}")]
    FileNotFound {
        path: PathBuf,
    },

    /// IO error occurred while reading the message file
    #[error("IO error reading file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Message file is not valid UTF-8
    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding {
        path: PathBuf,
    },
}

impl LintError {
    /// Creates a file not found error
    pub fn file_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::FileNotFound {
            path: path.into(),
        }
    }

    /// Creates an IO error with context about the file path
    pub fn io_error<P: Into<PathBuf>>(path: P, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: error,
        }
    }

    /// Creates an invalid encoding error
    pub fn invalid_encoding<P: Into<PathBuf>>(path: P) -> Self {
        Self::InvalidEncoding {
            path: path.into(),
        }
    }

    /// Returns true when the message file is simply absent
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}

/// Result type alias for lint operations
pub type LintResult<T> = Result<T, LintError>;
