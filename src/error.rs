//! Fatal setup errors
//!
//! Anything in here aborts the run with a non-zero exit. Provisioning problems
//! are not errors; they are reported as warnings in the setup summary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    /// Nothing (or only whitespace) was entered at the prompt
    #[error("No directory given. Enter the folder that should hold commitlint.config.js and .githooks")]
    EmptyInput,

    /// The path could not be created or canonicalized
    #[error("Cannot resolve directory '{input}': {source}")]
    UnresolvablePath {
        input: String,
        #[source]
        source: std::io::Error,
    },

    /// The path exists but is a file
    #[error("'{}' exists but is not a directory", path.display())]
    NotADirectory {
        path: PathBuf,
    },

    /// A required external program is missing from the search path
    #[error("'{program}' was not found on PATH. Install it and run setup again")]
    MissingTool {
        program: String,
    },

    /// A generated file could not be written
    #[error("Failed to write '{}': {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SetupError {
    pub fn unresolvable<S: Into<String>>(input: S, source: std::io::Error) -> Self {
        Self::UnresolvablePath {
            input: input.into(),
            source,
        }
    }

    pub fn missing_tool<S: Into<String>>(program: S) -> Self {
        Self::MissingTool {
            program: program.into(),
        }
    }

    pub fn artifact_write<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::ArtifactWrite {
            path: path.into(),
            source,
        }
    }
}
