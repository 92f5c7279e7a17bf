//! Implicit meta insertion.
//!
//! The wire layout keeps every variable-length field's `count`/`offset`
//! header at the top of the enclosing record group - the message root or an
//! array element - even when the field itself sits inside nested `object`
//! groups. Definition authors rarely write these headers; this pass inserts
//! them, keyed by the dotted path of the field they reference:
//!
//! - `array`  -> `count` then `offset`
//! - `bytes`  -> `offset` then `count`
//! - `string` -> `offset` only
//!
//! Metas are appended in the order targets are discovered by a depth-first
//! walk that descends through `object` fields only; each array element group
//! is a fresh record group and is augmented independently with paths relative
//! to itself.

use crate::field::{Field, FieldKind, Group, MessageSchema};

/// Inserts implicit metas throughout a schema.
///
/// No-op when the definition declared explicit `count`/`offset` fields.
pub(crate) fn augment_schema(schema: &mut MessageSchema) {
    if schema.explicit_meta {
        return;
    }
    augment_record_group(&mut schema.root);
}

fn augment_record_group(group: &mut Group) {
    let mut metas = Vec::new();
    collect_metas(&group.fields, "", &mut metas);
    for field in &mut group.fields {
        augment_nested(field);
    }
    group.fields.splice(0..0, metas);
}

fn augment_nested(field: &mut Field) {
    match &mut field.kind {
        FieldKind::Object(sub) => {
            for child in &mut sub.fields {
                augment_nested(child);
            }
        }
        FieldKind::Array(sub) => augment_record_group(sub),
        _ => {}
    }
}

fn collect_metas(fields: &[Field], prefix: &str, out: &mut Vec<Field>) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match &field.kind {
            FieldKind::Array(_) => {
                out.push(Field::new(path.clone(), FieldKind::Count));
                out.push(Field::new(path, FieldKind::Offset));
            }
            FieldKind::Bytes => {
                out.push(Field::new(path.clone(), FieldKind::Offset));
                out.push(Field::new(path, FieldKind::Count));
            }
            FieldKind::Str => {
                out.push(Field::new(path, FieldKind::Offset));
            }
            FieldKind::Object(sub) => collect_metas(&sub.fields, &path, out),
            _ => {}
        }
    }
}
