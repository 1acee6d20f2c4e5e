//! Incremental parser for JSON-array stores
//!
//! The store format is a single JSON array of objects. Instead of parsing the
//! whole array, the scanner walks the bytes once, buffers one top-level
//! object at a time and hands each completed object to the caller. Consumers
//! can stop after any object without reading the remainder of the file.
//!
//! [`ObjectScanner`] is the synchronous state machine; [`ObjectStream`]
//! drives it from any `AsyncBufRead` source.

pub mod scanner;
pub mod stream;

pub use scanner::{Feed, ObjectScanner, ScanSummary, ScannedObject};
pub use stream::{ObjectStream, ParseEvent};

/// Errors produced while scanning a store
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Reading from the source failed
    #[error("I/O error while scanning: {0}")]
    Io(#[from] std::io::Error),

    /// Source is not a well-formed JSON array of objects
    #[error("Invalid store syntax at byte {position}: {message}")]
    Syntax {
        /// Byte offset where the problem was detected
        position: u64,
        /// Error description
        message: String,
    },
}

impl ParseError {
    /// Create a syntax error
    pub fn syntax(position: u64, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Byte offset for syntax errors
    pub fn position(&self) -> Option<u64> {
        match self {
            Self::Syntax { position, .. } => Some(*position),
            Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = ParseError::syntax(7, "expected ',' or ']'");
        assert_eq!(
            err.to_string(),
            "Invalid store syntax at byte 7: expected ',' or ']'"
        );
        assert_eq!(err.position(), Some(7));
    }

    #[test]
    fn test_io_error_has_no_position() {
        let err = ParseError::from(std::io::Error::other("boom"));
        assert!(err.position().is_none());
    }
}
