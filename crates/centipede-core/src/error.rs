//! Error taxonomy for index construction.
//!
//! Only a missing root is fatal. Everything else is raised by a single
//! unit of work (one directory, one project, one solution) and gets
//! caught at that unit's boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    /// The root directory to scan does not exist.
    #[error("path not found: '{path}'")]
    NotFound { path: PathBuf },

    /// A project or solution file could not be understood.
    #[error("failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// Permission or IO failure on a file or subtree.
    #[error("failed to access '{path}': {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an access error with the path for context.
    pub fn access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Access {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts the whole build rather than one unit.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The path the error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path } | Self::Parse { path, .. } | Self::Access { path, .. } => path,
        }
    }
}
