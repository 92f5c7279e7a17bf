//! The tolerant schema-driven decoder.
//!
//! The decoder walks the augmented schema in the same order as the encoder,
//! collecting `count`/`offset` values read from the wire. Variable-length
//! reads trust the recorded offsets over the running cursor: a disagreement
//! is logged and resolved by seeking to the recorded position, since
//! imperfect producers exist in this ecosystem. Array element self-pointers
//! are the exception: a `here` word that does not match the element's actual
//! start means the chain cannot be trusted, and decoding fails.

use std::collections::HashMap;

use bytestream::ByteReader;
use log::warn;
use schema::{FieldKind, Group, Resolved, ScalarType};

use crate::error::{CodecError, CodecResult};
use crate::frame::{FrameHeader, FRAME_HEADER_SIZE};
use crate::join_path;
use crate::limits::CodecLimits;
use crate::value::{Record, Value};

/// Count/offset values read from the wire for one record group.
#[derive(Debug, Default)]
struct WireMaps {
    count: HashMap<String, u16>,
    offset: HashMap<String, u16>,
}

/// Decodes a full frame (header included) into a record.
pub(crate) fn decode_message(
    resolved: &Resolved<'_>,
    frame: &[u8],
    limits: &CodecLimits,
) -> CodecResult<Record> {
    if frame.len() > limits.max_frame_bytes {
        return Err(CodecError::FrameTooLarge {
            len: frame.len(),
            max: limits.max_frame_bytes,
        });
    }
    let header = FrameHeader::parse(frame)?;
    if usize::from(header.length) != frame.len() {
        warn!(
            "message {}: frame header claims {} bytes, buffer has {}",
            resolved.name,
            header.length,
            frame.len()
        );
    }

    let mut reader = ByteReader::new(frame);
    reader.seek(FRAME_HEADER_SIZE)?;
    let mut maps = WireMaps::default();
    decode_group(&resolved.schema.root, "", &mut reader, &mut maps, limits)
}

fn decode_group(
    group: &Group,
    prefix: &str,
    reader: &mut ByteReader<'_>,
    maps: &mut WireMaps,
    limits: &CodecLimits,
) -> CodecResult<Record> {
    let mut record = Record::new();
    for field in &group.fields {
        let path = join_path(prefix, &field.name);
        match &field.kind {
            FieldKind::Count => {
                let count = reader.read_u16()?;
                maps.count.insert(path, count);
            }
            FieldKind::Offset => {
                let offset = reader.read_u16()?;
                maps.offset.insert(path, offset);
            }
            FieldKind::Scalar(scalar) => {
                reconcile_offset(&path, maps, reader)?;
                record.set(&field.name, read_scalar(*scalar, reader)?);
            }
            FieldKind::Str => {
                reconcile_offset(&path, maps, reader)?;
                record.set(&field.name, Value::Str(reader.read_utf16_string()?));
            }
            FieldKind::Bytes => {
                reconcile_offset(&path, maps, reader)?;
                let count = maps.count.get(&path).copied().unwrap_or(0);
                let bytes = reader.read_bytes(usize::from(count))?;
                record.set(&field.name, Value::Bytes(bytes.to_vec()));
            }
            FieldKind::Object(sub) => {
                let sub_record = decode_group(sub, &path, reader, maps, limits)?;
                record.set(&field.name, Value::Record(sub_record));
            }
            FieldKind::Array(sub) => {
                let elements = decode_array(sub, &path, reader, maps, limits)?;
                record.set(&field.name, Value::List(elements));
            }
            FieldKind::Unknown(type_name) => {
                return Err(CodecError::UnknownType {
                    path,
                    type_name: type_name.clone(),
                });
            }
        }
    }
    Ok(record)
}

/// Walks an array's here/next chain.
///
/// The chain, not the declared count, drives iteration: a chain longer than
/// the count is consumed with a warning, a shorter one simply ends. The
/// element limit bounds corrupt chains whose pointers loop.
fn decode_array(
    element_schema: &Group,
    path: &str,
    reader: &mut ByteReader<'_>,
    maps: &WireMaps,
    limits: &CodecLimits,
) -> CodecResult<Vec<Record>> {
    let declared = usize::from(maps.count.get(path).copied().unwrap_or(0));
    let mut next = maps.offset.get(path).copied().unwrap_or(0);

    let mut elements = Vec::with_capacity(declared.min(limits.max_array_elements));
    while next != 0 {
        if elements.len() == limits.max_array_elements {
            return Err(CodecError::ChainOverrun {
                path: path.to_string(),
                limit: limits.max_array_elements,
            });
        }

        let target = usize::from(next);
        if reader.position() != target {
            warn!(
                "array {path}: cursor at {}, element recorded at {target}; seeking",
                reader.position()
            );
            reader.seek(target)?;
        }

        let start = reader.position();
        let here = reader.read_u16()?;
        if usize::from(here) != start {
            return Err(CodecError::HereMismatch {
                path: path.to_string(),
                expected: start as u16,
                found: here,
            });
        }
        next = reader.read_u16()?;

        let mut element_maps = WireMaps::default();
        elements.push(decode_group(
            element_schema,
            "",
            reader,
            &mut element_maps,
            limits,
        )?);

        if elements.len() == declared && next != 0 {
            warn!("array {path}: chain continues past declared count {declared}");
        }
    }
    Ok(elements)
}

/// Seeks to the field's recorded offset when the cursor disagrees.
fn reconcile_offset(
    path: &str,
    maps: &WireMaps,
    reader: &mut ByteReader<'_>,
) -> CodecResult<()> {
    let Some(&offset) = maps.offset.get(path) else {
        return Ok(());
    };
    let target = usize::from(offset);
    if reader.position() != target {
        warn!(
            "field {path}: cursor at {}, payload recorded at {target}; seeking",
            reader.position()
        );
        reader.seek(target)?;
    }
    Ok(())
}

fn read_scalar(scalar: ScalarType, reader: &mut ByteReader<'_>) -> CodecResult<Value> {
    let value = match scalar {
        ScalarType::Bool => Value::Bool(reader.read_bool()?),
        ScalarType::Byte => Value::Int(i64::from(reader.read_u8()?)),
        ScalarType::Int16 => Value::Int(i64::from(reader.read_i16()?)),
        ScalarType::UInt16 => Value::Int(i64::from(reader.read_u16()?)),
        ScalarType::Int32 => Value::Int(i64::from(reader.read_i32()?)),
        ScalarType::UInt32 => Value::Int(i64::from(reader.read_u32()?)),
        ScalarType::Int64 => Value::Int(reader.read_i64()?),
        ScalarType::UInt64 => Value::UInt(reader.read_u64()?),
        ScalarType::Float => Value::Float(f64::from(reader.read_f32()?)),
        ScalarType::Double => Value::Float(reader.read_f64()?),
    };
    Ok(value)
}
