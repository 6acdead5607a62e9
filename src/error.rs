//! # Error Types
//!
//! This module defines the error taxonomy used throughout the labelsheet library.
//!
//! | Kind | Raised when | Side effects |
//! |------|-------------|--------------|
//! | Validation | bad prefix, count out of range, empty code list, bad layout | none |
//! | Exhaustion | a block would overflow the configured code width | transaction rolled back |
//! | Persistence | the ledger cannot be opened, read or written | transaction rolled back |
//! | Render | QR encoding or PDF assembly failed | no document returned |

use thiserror::Error;

/// Coarse error category, used by the CLI and HTTP layers to pick an exit
/// code or status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Exhaustion,
    Persistence,
    Render,
}

impl ErrorKind {
    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Exhaustion => "exhaustion",
            ErrorKind::Persistence => "persistence",
            ErrorKind::Render => "render",
        }
    }
}

/// Main error type for labelsheet operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Input rejected before any side effect
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The numeric suffix space for a prefix is used up
    #[error("Code space exhausted for prefix '{prefix}': {requested} more codes after {last} would exceed {max}")]
    Exhaustion {
        prefix: String,
        last: u64,
        requested: u32,
        max: u64,
    },

    /// Ledger storage or transaction failure
    #[error("Ledger error: {0}")]
    Persistence(String),

    /// QR encoding or document assembly failure
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LabelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LabelError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LabelError::Validation(_) => ErrorKind::Validation,
            LabelError::Exhaustion { .. } => ErrorKind::Exhaustion,
            LabelError::Persistence(_) => ErrorKind::Persistence,
            LabelError::Render(_) => ErrorKind::Render,
            // File output only happens after a document was assembled.
            LabelError::Io(_) => ErrorKind::Render,
        }
    }
}

impl From<rusqlite::Error> for LabelError {
    fn from(err: rusqlite::Error) -> Self {
        LabelError::Persistence(err.to_string())
    }
}
