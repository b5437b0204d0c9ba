//! Error types for TLK codec operations.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// TLK codec error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Input is not a TLK string table at all.
    #[error("not a TLK string table: magic {found} (expected {expected})")]
    BadMagic { found: i32, expected: i32 },

    /// A TLK table whose magic reads correctly with reversed endianness:
    /// the file was written for a big-endian platform.
    #[error("byte-swapped TLK data: file comes from a big-endian platform")]
    ByteSwapped,

    /// Input data is corrupted or internally inconsistent.
    #[error("corrupted data: {message}")]
    CorruptedData { message: String },

    /// Unexpected end of input during a fixed-size read.
    #[error("unexpected EOF at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// Caller-provided input that cannot be encoded as given.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Input the file format has no representation for.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::CorruptedData {
            message: message.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(offset: usize) -> Self {
        Error::UnexpectedEof { offset }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Create an unsupported input error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::Unsupported(message.into())
    }

    /// Whether this error describes malformed file bytes (as opposed to
    /// caller input the encoder rejected).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::BadMagic { .. }
                | Error::ByteSwapped
                | Error::CorruptedData { .. }
                | Error::UnexpectedEof { .. }
        )
    }
}
