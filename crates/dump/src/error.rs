//! Error types for JSON import and export.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for dump operations.
pub type Result<T> = std::result::Result<T, DumpError>;

/// Error types for reading and writing dumps.
#[derive(Debug)]
pub enum DumpError {
    /// The file to import does not exist.
    NotFound { path: PathBuf },
    /// Reading or writing the file failed.
    Io(io::Error),
    /// The text is not valid JSON for the dump format.
    Json(serde_json::Error),
    /// The dump describes an invalid tree.
    Tree(leafchain_core::Error),
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpError::NotFound { path } => write!(f, "Dump file not found: {}", path.display()),
            DumpError::Io(err) => write!(f, "I/O error: {}", err),
            DumpError::Json(err) => write!(f, "JSON error: {}", err),
            DumpError::Tree(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DumpError::NotFound { .. } | DumpError::Tree(_) => None,
            DumpError::Io(err) => Some(err),
            DumpError::Json(err) => Some(err),
        }
    }
}

impl From<io::Error> for DumpError {
    fn from(err: io::Error) -> Self {
        DumpError::Io(err)
    }
}

impl From<serde_json::Error> for DumpError {
    fn from(err: serde_json::Error) -> Self {
        DumpError::Json(err)
    }
}

impl From<leafchain_core::Error> for DumpError {
    fn from(err: leafchain_core::Error) -> Self {
        DumpError::Tree(err)
    }
}
