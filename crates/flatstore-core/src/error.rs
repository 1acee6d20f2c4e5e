//! Error types for store operations

use std::path::{Path, PathBuf};

use crate::parser::ParseError;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Main error type for store operations
///
/// `ReadFailed` and `TargetNotFound` are recoverable: upstream callers turn
/// them into empty results or "not found" answers. `Corrupt` and
/// `WriteFailed` are fatal for the call that produced them and are never
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store file is missing or a raw read failed
    #[error("Failed to read store {}: {source}", path.display())]
    ReadFailed {
        /// Store file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Stored text is not a well-formed JSON array of objects
    #[error("Corrupt store {}: {reason}", path.display())]
    Corrupt {
        /// Store file path
        path: PathBuf,
        /// What the parser rejected
        reason: String,
    },

    /// Replace or remove addressed an id that is not in the store
    #[error("No document with id {id} in {}", path.display())]
    TargetNotFound {
        /// Store file path
        path: PathBuf,
        /// Requested id
        id: String,
    },

    /// Temp file write, flush or rename failed
    #[error("Failed to write store {}: {source}", path.display())]
    WriteFailed {
        /// Store file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Document could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a read failure for `path`
    pub fn read_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a corruption error for `path`
    pub fn corrupt(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a target-not-found outcome for `path`
    pub fn target_not_found(path: impl AsRef<Path>, id: impl Into<String>) -> Self {
        Self::TargetNotFound {
            path: path.as_ref().to_path_buf(),
            id: id.into(),
        }
    }

    /// Create a write failure for `path`
    pub fn write_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Attach a store path to a parser error
    pub fn from_parse(path: impl AsRef<Path>, err: ParseError) -> Self {
        match err {
            ParseError::Io(source) => Self::read_failed(path, source),
            syntax @ ParseError::Syntax { .. } => Self::corrupt(path, syntax.to_string()),
        }
    }

    /// Whether callers may map this error to an empty or "not found" answer
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReadFailed { .. } | Self::TargetNotFound { .. })
    }

    /// Whether this is a read failure caused by the store file not existing
    pub fn is_missing_store(&self) -> bool {
        matches!(
            self,
            Self::ReadFailed { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
