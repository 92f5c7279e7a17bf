//! The two-pass pointer-patched encoder.
//!
//! The encoder walks the augmented schema in order over a single pre-sized
//! writer. Meta entries write 16-bit zero placeholders and remember their
//! positions; when the referenced payload is reached, the placeholders are
//! back-patched with the payload's count and absolute offset. Array elements
//! additionally carry a here/next pointer chain: each element's `next`
//! placeholder (or the array's `offset` placeholder, for the first element)
//! is patched with the following element's start.
//!
//! Object recursion shares the position maps, prefixing the dotted path;
//! array elements are fresh nested encodes over the same writer.

use std::collections::HashMap;

use bytestream::ByteWriter;
use schema::{FieldKind, Group, Resolved, ScalarType};

use crate::error::{CodecError, CodecResult};
use crate::frame::{FrameHeader, FRAME_HEADER_SIZE};
use crate::join_path;
use crate::length::message_length;
use crate::limits::CodecLimits;
use crate::value::{Record, Value, EMPTY_RECORD};

/// Placeholder positions recorded while walking one record group.
#[derive(Debug, Default)]
struct PatchMaps {
    count_pos: HashMap<String, usize>,
    offset_pos: HashMap<String, usize>,
}

/// Encodes a resolved message into a freshly allocated frame.
pub(crate) fn encode_message(
    resolved: &Resolved<'_>,
    record: &Record,
    limits: &CodecLimits,
) -> CodecResult<Vec<u8>> {
    let opcode = resolved.code.ok_or_else(|| CodecError::MissingOpcode {
        name: resolved.name.to_string(),
    })?;

    let body_len = message_length(resolved.schema, record)?;
    let total = FRAME_HEADER_SIZE + body_len;
    let max = limits.max_frame_bytes.min(usize::from(u16::MAX));
    if total > max {
        return Err(CodecError::FrameTooLarge { len: total, max });
    }

    let mut writer = ByteWriter::with_len(total);
    FrameHeader {
        length: total as u16,
        opcode,
    }
    .write(&mut writer)?;

    let mut maps = PatchMaps::default();
    encode_group(&resolved.schema.root, record, "", &mut writer, &mut maps)?;

    if writer.position() != total {
        return Err(CodecError::LengthMismatch {
            expected: total,
            actual: writer.position(),
        });
    }
    Ok(writer.into_inner())
}

fn encode_group(
    group: &Group,
    record: &Record,
    prefix: &str,
    writer: &mut ByteWriter,
    maps: &mut PatchMaps,
) -> CodecResult<()> {
    for field in &group.fields {
        let path = join_path(prefix, &field.name);
        match &field.kind {
            FieldKind::Count => {
                maps.count_pos.insert(path, writer.position());
                writer.write_u16(0)?;
            }
            FieldKind::Offset => {
                maps.offset_pos.insert(path, writer.position());
                writer.write_u16(0)?;
            }
            FieldKind::Scalar(scalar) => {
                encode_scalar(*scalar, record.get(&field.name), &path, writer)?;
            }
            FieldKind::Str => {
                let text = match record.get(&field.name) {
                    None => "",
                    Some(Value::Str(text)) => text.as_str(),
                    Some(other) => return Err(wrong_kind(&path, "string", other)),
                };
                patch_count(writer, maps, &path, text.encode_utf16().count())?;
                patch_offset(writer, maps, &path)?;
                writer.write_utf16_string(text)?;
            }
            FieldKind::Bytes => {
                let bytes: &[u8] = match record.get(&field.name) {
                    None => &[],
                    Some(Value::Bytes(bytes)) => bytes,
                    Some(other) => return Err(wrong_kind(&path, "bytes", other)),
                };
                patch_count(writer, maps, &path, bytes.len())?;
                patch_offset(writer, maps, &path)?;
                writer.write_bytes(bytes)?;
            }
            FieldKind::Object(sub) => {
                let sub_record = match record.get(&field.name) {
                    None => &EMPTY_RECORD,
                    Some(Value::Record(sub_record)) => sub_record,
                    Some(other) => return Err(wrong_kind(&path, "object", other)),
                };
                encode_group(sub, sub_record, &path, writer, maps)?;
            }
            FieldKind::Array(sub) => {
                let elements: &[Record] = match record.get(&field.name) {
                    None => &[],
                    Some(Value::List(elements)) => elements,
                    Some(other) => return Err(wrong_kind(&path, "array", other)),
                };
                encode_array(sub, elements, &path, writer, maps)?;
            }
            FieldKind::Unknown(type_name) => {
                return Err(CodecError::UnknownType {
                    path,
                    type_name: type_name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Writes an array's element chain.
///
/// An empty array leaves both placeholders zero and emits nothing. Otherwise
/// the chain is threaded through the array's `offset` placeholder: each
/// element's start position patches the previous link, and its own `next`
/// placeholder becomes the link for the following element. The final `next`
/// stays zero.
fn encode_array(
    element_schema: &Group,
    elements: &[Record],
    path: &str,
    writer: &mut ByteWriter,
    maps: &mut PatchMaps,
) -> CodecResult<()> {
    if elements.is_empty() {
        return Ok(());
    }

    patch_count(writer, maps, path, elements.len())?;
    let mut link = maps.offset_pos.get(path).copied();

    for element in elements {
        let here = position_u16(writer, path)?;
        if let Some(pos) = link {
            patch_u16(writer, pos, here)?;
        }
        writer.write_u16(here)?;
        link = Some(writer.position());
        writer.write_u16(0)?;

        let mut element_maps = PatchMaps::default();
        encode_group(element_schema, element, "", writer, &mut element_maps)?;
    }
    Ok(())
}

fn encode_scalar(
    scalar: ScalarType,
    value: Option<&Value>,
    path: &str,
    writer: &mut ByteWriter,
) -> CodecResult<()> {
    match scalar {
        ScalarType::Bool => {
            let flag = match value {
                None => false,
                Some(Value::Bool(flag)) => *flag,
                Some(Value::Int(raw)) => *raw != 0,
                Some(Value::UInt(raw)) => *raw != 0,
                Some(other) => return Err(wrong_kind(path, scalar.name(), other)),
            };
            writer.write_bool(flag)?;
        }
        ScalarType::Byte => {
            let bits = int_bits(path, scalar, value, 8)?;
            writer.write_u8(bits as u8)?;
        }
        ScalarType::Int16 | ScalarType::UInt16 => {
            let bits = int_bits(path, scalar, value, 16)?;
            writer.write_u16(bits as u16)?;
        }
        ScalarType::Int32 | ScalarType::UInt32 => {
            let bits = int_bits(path, scalar, value, 32)?;
            writer.write_u32(bits as u32)?;
        }
        ScalarType::Int64 | ScalarType::UInt64 => {
            let bits = int_bits(path, scalar, value, 64)?;
            writer.write_u64(bits)?;
        }
        ScalarType::Float => {
            let raw = float_value(path, scalar, value)?;
            writer.write_f32(raw as f32)?;
        }
        ScalarType::Double => {
            let raw = float_value(path, scalar, value)?;
            writer.write_f64(raw)?;
        }
    }
    Ok(())
}

/// Extracts an integer and reinterprets it within `bits` of width.
///
/// Any value representable as either the signed or the unsigned variant of
/// the width is accepted and written by bit pattern; callers routinely pass
/// negative opcodes or uninterpreted words.
fn int_bits(
    path: &str,
    scalar: ScalarType,
    value: Option<&Value>,
    bits: u32,
) -> CodecResult<u64> {
    let raw: i128 = match value {
        None => 0,
        Some(Value::Int(raw)) => i128::from(*raw),
        Some(Value::UInt(raw)) => i128::from(*raw),
        Some(other) => return Err(wrong_kind(path, scalar.name(), other)),
    };

    let min = -(1i128 << (bits - 1));
    let max = (1i128 << bits) - 1;
    if raw < min || raw > max {
        return Err(CodecError::ValueOutOfRange {
            path: path.to_string(),
            type_name: scalar.name().to_string(),
            value: raw,
        });
    }
    let mask = (1u128 << bits) - 1;
    Ok((raw as u128 & mask) as u64)
}

fn float_value(path: &str, scalar: ScalarType, value: Option<&Value>) -> CodecResult<f64> {
    match value {
        None => Ok(0.0),
        Some(Value::Float(raw)) => Ok(*raw),
        Some(Value::Int(raw)) => Ok(*raw as f64),
        Some(Value::UInt(raw)) => Ok(*raw as f64),
        Some(other) => Err(wrong_kind(path, scalar.name(), other)),
    }
}

fn wrong_kind(path: &str, type_name: &str, found: &Value) -> CodecError {
    CodecError::WrongValueKind {
        path: path.to_string(),
        type_name: type_name.to_string(),
        found: found.kind_name(),
    }
}

/// Patches the field's `count` placeholder, if one was recorded.
fn patch_count(
    writer: &mut ByteWriter,
    maps: &PatchMaps,
    path: &str,
    count: usize,
) -> CodecResult<()> {
    let Some(&pos) = maps.count_pos.get(path) else {
        return Ok(());
    };
    let count = u16::try_from(count).map_err(|_| CodecError::CountOverflow {
        path: path.to_string(),
        count,
    })?;
    patch_u16(writer, pos, count)
}

/// Patches the field's `offset` placeholder with the current position.
fn patch_offset(writer: &mut ByteWriter, maps: &PatchMaps, path: &str) -> CodecResult<()> {
    let Some(&pos) = maps.offset_pos.get(path) else {
        return Ok(());
    };
    let here = position_u16(writer, path)?;
    patch_u16(writer, pos, here)
}

/// Returns the current position as an `offset`-word value.
fn position_u16(writer: &ByteWriter, path: &str) -> CodecResult<u16> {
    u16::try_from(writer.position()).map_err(|_| CodecError::OffsetOverflow {
        path: path.to_string(),
        position: writer.position(),
    })
}

fn patch_u16(writer: &mut ByteWriter, pos: usize, value: u16) -> CodecResult<()> {
    let saved = writer.position();
    writer.seek(pos)?;
    writer.write_u16(value)?;
    writer.seek(saved)?;
    Ok(())
}
