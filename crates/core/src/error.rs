//! Error types for leafchain.

use alloc::string::String;
use core::fmt;

/// Result type alias for leafchain operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for tree construction, loading and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Degree too small to build a valid tree.
    InvalidDegree {
        degree: usize,
    },
    /// Structurally invalid bulk-load input.
    MalformedInput {
        message: String,
    },
    /// A structural invariant does not hold.
    InvariantViolation {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDegree { degree } => {
                write!(f, "Invalid degree {}: must be at least {}", degree, crate::MIN_DEGREE)
            }
            Error::MalformedInput { message } => {
                write!(f, "Malformed input: {}", message)
            }
            Error::InvariantViolation { message } => {
                write!(f, "Invariant violation: {}", message)
            }
        }
    }
}

impl Error {
    /// Creates an invalid degree error.
    pub fn invalid_degree(degree: usize) -> Self {
        Error::InvalidDegree { degree }
    }

    /// Creates a malformed input error.
    pub fn malformed_input(message: impl Into<String>) -> Self {
        Error::MalformedInput {
            message: message.into(),
        }
    }

    /// Creates an invariant violation error.
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Error::InvariantViolation {
            message: message.into(),
        }
    }
}
