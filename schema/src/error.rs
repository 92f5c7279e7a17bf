//! Error types for definition parsing and registry resolution.

use std::fmt;

/// Result type for definition parsing.
pub type DefResult<T> = Result<T, DefError>;

/// Errors that make a single definition file unusable.
///
/// The loader treats these as warnings at load time: the offending file is
/// skipped and loading continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefError {
    /// File name does not match `<Name>.<Version>.def`.
    InvalidFileName {
        /// The offending file name.
        file: String,
    },

    /// A line is not `TYPE FIELD` with optional `-` depth prefixes.
    MalformedLine {
        /// Source file name.
        file: String,
        /// 1-based line number.
        line: usize,
        /// The offending line content.
        content: String,
    },

    /// A nested line follows a field that is neither `array` nor `object`.
    DescendIntoScalar {
        /// Source file name.
        file: String,
        /// 1-based line number.
        line: usize,
        /// Name of the field that cannot hold subfields.
        field: String,
    },

    /// A nested line appears before any composite field exists to hold it.
    NothingToDescend {
        /// Source file name.
        file: String,
        /// 1-based line number.
        line: usize,
    },
}

impl fmt::Display for DefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileName { file } => {
                write!(f, "{file}: file name does not match <Name>.<Version>.def")
            }
            Self::MalformedLine {
                file,
                line,
                content,
            } => {
                write!(f, "{file}:{line}: malformed definition line {content:?}")
            }
            Self::DescendIntoScalar { file, line, field } => {
                write!(
                    f,
                    "{file}:{line}: field {field:?} is not an array or object and cannot hold subfields"
                )
            }
            Self::NothingToDescend { file, line } => {
                write!(f, "{file}:{line}: nested line with no enclosing field")
            }
        }
    }
}

impl std::error::Error for DefError {}

/// Errors resolving a caller identifier to a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// An opcode with no name mapping.
    UnknownCode {
        /// The unmapped opcode.
        code: u16,
    },

    /// A message name with no loaded schema at all.
    UnknownMessage {
        /// The unresolved name.
        name: String,
    },

    /// A message exists but not at the requested version.
    VersionNotFound {
        /// The message name.
        name: String,
        /// The requested version.
        version: u32,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCode { code } => {
                write!(f, "no message name mapped to opcode {code}")
            }
            Self::UnknownMessage { name } => {
                write!(f, "no schema loaded for message {name:?}")
            }
            Self::VersionNotFound { name, version } => {
                write!(f, "message {name:?} has no version {version}")
            }
        }
    }
}

impl std::error::Error for ResolveError {}
