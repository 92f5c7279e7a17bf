//! Exact serialized-length computation.
//!
//! The encoder allocates its output buffer from this estimate and treats any
//! disagreement with the actual write position as a bug, so every rule here
//! must mirror the encoder byte for byte. In particular a missing or empty
//! string still costs 2 bytes: the encoder always emits the NUL terminator.

use schema::{FieldKind, Group, MessageSchema};

use crate::error::{CodecError, CodecResult};
use crate::join_path;
use crate::value::{Record, Value, EMPTY_RECORD};

/// Two 16-bit words lead every array element: the here/next pointers.
const ELEMENT_HEADER_SIZE: usize = 4;

/// Computes the exact body length (excluding the 4-byte frame header) of
/// `record` serialized under `schema`.
///
/// # Errors
///
/// Returns [`CodecError::UnknownType`] if the schema contains a type the
/// codec cannot serialize.
pub fn message_length(schema: &MessageSchema, record: &Record) -> CodecResult<usize> {
    group_length(&schema.root, record, "")
}

fn group_length(group: &Group, record: &Record, prefix: &str) -> CodecResult<usize> {
    let mut total = 0;
    for field in &group.fields {
        total += match &field.kind {
            FieldKind::Count | FieldKind::Offset => 2,
            FieldKind::Scalar(scalar) => scalar.wire_size(),
            FieldKind::Str => match record.get(&field.name) {
                Some(Value::Str(text)) => (text.encode_utf16().count() + 1) * 2,
                _ => 2,
            },
            FieldKind::Bytes => match record.get(&field.name) {
                Some(Value::Bytes(bytes)) => bytes.len(),
                _ => 0,
            },
            FieldKind::Object(sub) => {
                let sub_record = match record.get(&field.name) {
                    Some(Value::Record(sub_record)) => sub_record,
                    _ => &EMPTY_RECORD,
                };
                group_length(sub, sub_record, &join_path(prefix, &field.name))?
            }
            FieldKind::Array(sub) => {
                let elements: &[Record] = match record.get(&field.name) {
                    Some(Value::List(elements)) => elements,
                    _ => &[],
                };
                let mut sum = 0;
                for element in elements {
                    sum += ELEMENT_HEADER_SIZE + group_length(sub, element, "")?;
                }
                sum
            }
            FieldKind::Unknown(type_name) => {
                return Err(CodecError::UnknownType {
                    path: join_path(prefix, &field.name),
                    type_name: type_name.clone(),
                });
            }
        };
    }
    Ok(total)
}
