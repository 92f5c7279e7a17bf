//! Error types for byte stream operations.

use std::fmt;

/// Result type for byte stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur while reading or writing a byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Attempted to write past the end of the pre-sized buffer.
    WriteOverflow {
        /// Number of bytes attempted to write.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Seek target lies outside the buffer.
    SeekOutOfBounds {
        /// The requested absolute position.
        position: usize,
        /// Buffer length.
        len: usize,
    },

    /// A UTF-16 string ran to the end of the buffer without a NUL terminator.
    UnterminatedString {
        /// Position at which the string started.
        start: usize,
    },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "unexpected EOF: requested {requested} bytes, {available} available"
                )
            }
            Self::WriteOverflow {
                requested,
                available,
            } => {
                write!(
                    f,
                    "write overflow: attempted {requested} bytes, {available} available"
                )
            }
            Self::SeekOutOfBounds { position, len } => {
                write!(f, "seek to {position} out of bounds for length {len}")
            }
            Self::UnterminatedString { start } => {
                write!(f, "unterminated UTF-16 string starting at offset {start}")
            }
        }
    }
}

impl std::error::Error for StreamError {}
