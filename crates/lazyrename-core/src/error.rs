//! Rename engine error types.

use std::io;
use std::path::PathBuf;

/// Errors that stop a rename run before any file is touched.
#[derive(Debug, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum RenameError {
    /// The trim count is not a non-negative integer. Holds the raw input.
    InvalidParameter(String),
    /// No folder survived mode-dependent resolution.
    NoValidFolders,
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter(raw) => {
                write!(f, "digits to trim must be a number (got {raw:?})")
            }
            Self::NoValidFolders => write!(f, "no valid folders selected"),
        }
    }
}

impl std::error::Error for RenameError {}

/// A single failed rename. Aborts the rest of its folder only.
#[derive(Debug)]
pub struct RenameFailure {
    /// Folder the file lives in.
    pub folder: PathBuf,
    /// Original file name.
    pub file: String,
    /// Name the file was going to receive.
    pub new_name: String,
    /// Underlying I/O error.
    pub reason: io::Error,
}

impl std::fmt::Display for RenameFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "could not rename {}: {}", self.file, self.reason)
    }
}

impl std::error::Error for RenameFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}
