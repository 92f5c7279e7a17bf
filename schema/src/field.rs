//! Field, group, and schema tree definitions.

use std::fmt;

/// Fixed-size scalar wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// One byte, nonzero = true.
    Bool,
    /// Unsigned 8-bit.
    Byte,
    /// Signed 16-bit.
    Int16,
    /// Unsigned 16-bit.
    UInt16,
    /// Signed 32-bit.
    Int32,
    /// Unsigned 32-bit.
    UInt32,
    /// Signed 64-bit.
    Int64,
    /// Unsigned 64-bit.
    UInt64,
    /// IEEE-754 binary32.
    Float,
    /// IEEE-754 binary64.
    Double,
}

impl ScalarType {
    /// Parses a scalar type name as written in definition files.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "byte" => Some(Self::Byte),
            "int16" => Some(Self::Int16),
            "uint16" => Some(Self::UInt16),
            "int32" => Some(Self::Int32),
            "uint32" => Some(Self::UInt32),
            "int64" => Some(Self::Int64),
            "uint64" => Some(Self::UInt64),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }

    /// Returns the serialized size in bytes.
    #[must_use]
    pub const fn wire_size(self) -> usize {
        match self {
            Self::Bool | Self::Byte => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float => 4,
            Self::Int64 | Self::UInt64 | Self::Double => 8,
        }
    }

    /// Returns the definition-file spelling of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// The kind of one schema entry.
///
/// `Count` and `Offset` are the 16-bit meta placeholders referencing a later
/// variable-length field; for implicit metas the entry's *name* is the dotted
/// path of the field it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A fixed-size scalar.
    Scalar(ScalarType),
    /// Element/byte count of a referenced variable-length field.
    Count,
    /// Absolute byte offset (from frame start) of a referenced field.
    Offset,
    /// UTF-16LE string terminated by a 16-bit NUL.
    Str,
    /// Raw opaque bytes.
    Bytes,
    /// A nested fixed-layout group written in-line.
    Object(Group),
    /// A chained sequence of object elements stored out-of-line.
    Array(Group),
    /// A type name the parser did not recognize.
    ///
    /// Kept so loading can continue; fatal once the codec reaches it.
    Unknown(String),
}

impl FieldKind {
    /// Returns the definition-file spelling of this kind.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(scalar) => scalar.name(),
            Self::Count => "count",
            Self::Offset => "offset",
            Self::Str => "string",
            Self::Bytes => "bytes",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Unknown(name) => name,
        }
    }

    /// Returns `true` for `count`/`offset` meta entries.
    #[must_use]
    pub const fn is_meta(&self) -> bool {
        matches!(self, Self::Count | Self::Offset)
    }
}

/// One named schema entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name; for implicit meta entries, the dotted target path.
    pub name: String,
    /// What the field holds.
    pub kind: FieldKind,
}

impl Field {
    /// Creates a field.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// An ordered group of fields: the root of a message, an `object` body, or an
/// `array` element layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    /// Fields in wire order.
    pub fields: Vec<Field>,
}

impl Group {
    /// Creates an empty group.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Creates a group from fields.
    #[must_use]
    pub fn with_fields(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

/// A complete augmented schema for one `(name, version)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    /// Message name as taken from the definition file name.
    pub name: String,
    /// Definition version.
    pub version: u32,
    /// The augmented field tree.
    pub root: Group,
    /// `true` if the definition declared `count`/`offset` lines itself, which
    /// disables implicit meta insertion for this schema.
    pub explicit_meta: bool,
}

impl fmt::Display for MessageSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}.{}", self.name, self.version)?;
        write_group(f, &self.root, 1)
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, group: &Group, indent: usize) -> fmt::Result {
    for field in &group.fields {
        for _ in 0..indent {
            write!(f, "  ")?;
        }
        writeln!(f, "{} {}", field.kind.type_name(), field.name)?;
        match &field.kind {
            FieldKind::Object(sub) | FieldKind::Array(sub) => {
                write_group(f, sub, indent + 1)?;
            }
            _ => {}
        }
    }
    Ok(())
}
