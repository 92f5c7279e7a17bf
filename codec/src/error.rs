//! Error types for codec operations.

use std::fmt;

use bytestream::StreamError;
use schema::ResolveError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a message.
///
/// Field-level failures carry the dotted path of the field being processed.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Identifier could not be resolved to a schema.
    Resolve(ResolveError),

    /// Underlying byte stream failure.
    Stream(StreamError),

    /// Encoding needs an opcode but the message has no mapping.
    MissingOpcode {
        /// The message name.
        name: String,
    },

    /// A field type the codec cannot serialize.
    UnknownType {
        /// Dotted field path.
        path: String,
        /// The unrecognized type name.
        type_name: String,
    },

    /// A record value of the wrong kind for the field's type.
    WrongValueKind {
        /// Dotted field path.
        path: String,
        /// The field's wire type.
        type_name: String,
        /// The value kind actually supplied.
        found: &'static str,
    },

    /// An integer that fits neither the signed nor the unsigned
    /// interpretation of the field's width.
    ValueOutOfRange {
        /// Dotted field path.
        path: String,
        /// The field's wire type.
        type_name: String,
        /// The offending value.
        value: i128,
    },

    /// Buffer is smaller than the 4-byte frame header.
    FrameTooShort {
        /// Actual buffer length.
        len: usize,
    },

    /// Frame exceeds the 16-bit length field or the configured limit.
    FrameTooLarge {
        /// Computed or received frame length.
        len: usize,
        /// The limit that was exceeded.
        max: usize,
    },

    /// A variable-length payload count does not fit in 16 bits.
    CountOverflow {
        /// Dotted field path.
        path: String,
        /// The element/byte count.
        count: usize,
    },

    /// A payload position to record in an `offset` word does not fit in
    /// 16 bits.
    OffsetOverflow {
        /// Dotted field path.
        path: String,
        /// The absolute position that overflowed.
        position: usize,
    },

    /// An array element's self-pointer disagrees with its position.
    HereMismatch {
        /// Dotted field path of the array.
        path: String,
        /// The element's actual start offset.
        expected: u16,
        /// The self-pointer read from the wire.
        found: u16,
    },

    /// An array chain ran past the configured element limit.
    ChainOverrun {
        /// Dotted field path of the array.
        path: String,
        /// The element limit.
        limit: usize,
    },

    /// Encoded output did not land exactly on the estimated length.
    LengthMismatch {
        /// Length the estimator predicted.
        expected: usize,
        /// Position the encoder actually finished at.
        actual: usize,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve(e) => write!(f, "resolve error: {e}"),
            Self::Stream(e) => write!(f, "stream error: {e}"),
            Self::MissingOpcode { name } => {
                write!(f, "message {name:?} has no opcode; cannot encode a frame")
            }
            Self::UnknownType { path, type_name } => {
                write!(f, "field {path}: unknown type {type_name:?}")
            }
            Self::WrongValueKind {
                path,
                type_name,
                found,
            } => {
                write!(f, "field {path}: {type_name} field given a {found} value")
            }
            Self::ValueOutOfRange {
                path,
                type_name,
                value,
            } => {
                write!(f, "field {path}: value {value} out of range for {type_name}")
            }
            Self::FrameTooShort { len } => {
                write!(f, "buffer of {len} bytes is smaller than a frame header")
            }
            Self::FrameTooLarge { len, max } => {
                write!(f, "frame of {len} bytes exceeds maximum {max}")
            }
            Self::CountOverflow { path, count } => {
                write!(f, "field {path}: count {count} does not fit in 16 bits")
            }
            Self::OffsetOverflow { path, position } => {
                write!(f, "field {path}: offset {position} does not fit in 16 bits")
            }
            Self::HereMismatch {
                path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "array {path}: element self-pointer {found} but element starts at {expected}"
                )
            }
            Self::ChainOverrun { path, limit } => {
                write!(f, "array {path}: element chain exceeds limit of {limit}")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "encoder finished at {actual} but the estimator promised {expected}"
                )
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Resolve(e) => Some(e),
            Self::Stream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResolveError> for CodecError {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

impl From<StreamError> for CodecError {
    fn from(err: StreamError) -> Self {
        Self::Stream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_missing_opcode() {
        let err = CodecError::MissingOpcode {
            name: "S_TEST".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("S_TEST"), "should mention the message");
        assert!(msg.contains("opcode"));
    }

    #[test]
    fn error_display_unknown_type() {
        let err = CodecError::UnknownType {
            path: "obj.pos".into(),
            type_name: "vec3".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("obj.pos"), "should carry the dotted path");
        assert!(msg.contains("vec3"));
    }

    #[test]
    fn error_display_value_out_of_range() {
        let err = CodecError::ValueOutOfRange {
            path: "hp".into(),
            type_name: "int16".into(),
            value: 70000,
        };
        let msg = err.to_string();
        assert!(msg.contains("hp"));
        assert!(msg.contains("70000"));
        assert!(msg.contains("int16"));
    }

    #[test]
    fn error_display_offset_overflow() {
        let err = CodecError::OffsetOverflow {
            path: "blob".into(),
            position: 70000,
        };
        let msg = err.to_string();
        assert!(msg.contains("blob"));
        assert!(msg.contains("70000"));
    }

    #[test]
    fn error_display_here_mismatch() {
        let err = CodecError::HereMismatch {
            path: "items".into(),
            expected: 20,
            found: 33,
        };
        let msg = err.to_string();
        assert!(msg.contains("items"));
        assert!(msg.contains("20"));
        assert!(msg.contains("33"));
    }

    #[test]
    fn error_display_length_mismatch() {
        let err = CodecError::LengthMismatch {
            expected: 58,
            actual: 56,
        };
        let msg = err.to_string();
        assert!(msg.contains("58"));
        assert!(msg.contains("56"));
    }

    #[test]
    fn error_from_resolve_error() {
        let err: CodecError = ResolveError::UnknownCode { code: 9 }.into();
        assert!(matches!(err, CodecError::Resolve(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_from_stream_error() {
        let err: CodecError = StreamError::UnexpectedEof {
            requested: 2,
            available: 0,
        }
        .into();
        assert!(matches!(err, CodecError::Stream(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_source_none_for_flat_variants() {
        let err = CodecError::FrameTooShort { len: 2 };
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<CodecError>();
    }
}
