//! Definition file parsing.
//!
//! A definition file `<Name>.<Version>.def` declares one message layout, one
//! field per line: `TYPE FIELD`, with a leading run of `-` tokens adding one
//! nesting level each. `#` starts a comment; blank lines are ignored.

use log::{debug, warn};

use crate::augment::augment_schema;
use crate::error::{DefError, DefResult};
use crate::field::{Field, FieldKind, Group, MessageSchema, ScalarType};

/// Nesting depth beyond which a warning is emitted.
///
/// Real definitions rarely exceed 4-5 levels; anything deeper is accepted but
/// almost certainly an authoring mistake.
pub const MAX_NESTING_DEPTH: usize = 8;

/// Parses a definition file name into `(name, version)`.
///
/// # Errors
///
/// Returns [`DefError::InvalidFileName`] unless the name matches
/// `<Name>.<Version>.def` with `Name` a word and `Version` a decimal integer.
pub fn parse_def_file_name(file: &str) -> DefResult<(String, u32)> {
    let invalid = || DefError::InvalidFileName { file: file.into() };

    let parts: Vec<&str> = file.split('.').collect();
    let &[name, version, ext] = parts.as_slice() else {
        return Err(invalid());
    };
    if ext != "def" || name.is_empty() {
        return Err(invalid());
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid());
    }
    if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let version = version.parse::<u32>().map_err(|_| invalid())?;
    Ok((name.to_string(), version))
}

/// Parses one definition file into its augmented schema.
///
/// In the default implicit-meta mode, `count`/`offset` placeholders are
/// inserted for every variable-length field per the wire layout rules. A
/// definition that declares `count` or `offset` lines itself opts out of
/// implicit insertion for the whole schema (a notice is logged once).
///
/// # Errors
///
/// Returns [`DefError`] for an invalid file name, a malformed line, or a
/// nested line under a non-composite field. The loader treats these as
/// warnings and skips the file.
pub fn parse_definition(file: &str, text: &str) -> DefResult<MessageSchema> {
    let (name, version) = parse_def_file_name(file)?;

    // group_stack[d] collects the fields of the group open at depth d;
    // open_stack holds the name and kind of each composite being filled.
    let mut group_stack: Vec<Vec<Field>> = vec![Vec::new()];
    let mut open_stack: Vec<(String, bool)> = Vec::new();
    let mut explicit_meta = false;
    let mut warned_excessive = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let (depth, type_name, field_name) =
            split_line(line).ok_or_else(|| DefError::MalformedLine {
                file: file.into(),
                line: line_no,
                content: line.into(),
            })?;

        if depth > MAX_NESTING_DEPTH && !warned_excessive {
            warn!("{file}:{line_no}: nesting depth {depth} exceeds {MAX_NESTING_DEPTH}");
            warned_excessive = true;
        }

        let current = group_stack.len() - 1;
        let target = if depth > current + 1 {
            warn!(
                "{file}:{line_no}: depth jumps from {current} to {depth}; \
                 treating as a single descent"
            );
            current + 1
        } else {
            depth
        };

        if target == current + 1 {
            descend(&mut group_stack, &mut open_stack, file, line_no)?;
        } else {
            while group_stack.len() - 1 > target {
                close_level(&mut group_stack, &mut open_stack);
            }
        }

        let kind = parse_kind(type_name);
        if kind.is_meta() && !explicit_meta {
            warn!(
                "{file}:{line_no}: explicit count/offset fields present; \
                 implicit meta insertion disabled for {name}.{version}"
            );
            explicit_meta = true;
        }
        group_stack
            .last_mut()
            .expect("root group always open")
            .push(Field::new(field_name, kind));
    }

    while group_stack.len() > 1 {
        close_level(&mut group_stack, &mut open_stack);
    }
    let root = Group::with_fields(group_stack.pop().expect("root group always open"));

    let mut schema = MessageSchema {
        name,
        version,
        root,
        explicit_meta,
    };
    augment_schema(&mut schema);
    Ok(schema)
}

/// Splits a non-blank line into `(depth, type, field)`.
fn split_line(line: &str) -> Option<(usize, &str, &str)> {
    let mut rest = line;
    let mut depth = 0;
    while let Some(stripped) = rest.strip_prefix('-') {
        depth += 1;
        rest = stripped.trim_start();
    }

    let mut tokens = rest.split_whitespace();
    let type_name = tokens.next()?;
    let field_name = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((depth, type_name, field_name))
}

fn parse_kind(type_name: &str) -> FieldKind {
    match type_name {
        "object" => FieldKind::Object(Group::new()),
        "array" => FieldKind::Array(Group::new()),
        "count" => FieldKind::Count,
        "offset" => FieldKind::Offset,
        "string" => FieldKind::Str,
        "bytes" => FieldKind::Bytes,
        other => match ScalarType::parse(other) {
            Some(scalar) => FieldKind::Scalar(scalar),
            None => {
                debug!("unrecognized field type {other:?}; kept as unknown");
                FieldKind::Unknown(other.to_string())
            }
        },
    }
}

/// Re-opens the most recently appended composite field one level down.
fn descend(
    group_stack: &mut Vec<Vec<Field>>,
    open_stack: &mut Vec<(String, bool)>,
    file: &str,
    line_no: usize,
) -> DefResult<()> {
    let parent = group_stack.last_mut().expect("root group always open");
    let last = parent.pop().ok_or(DefError::NothingToDescend {
        file: file.into(),
        line: line_no,
    })?;

    let (name, is_array, fields) = match last.kind {
        FieldKind::Array(group) => (last.name, true, group.fields),
        FieldKind::Object(group) => (last.name, false, group.fields),
        _ => {
            return Err(DefError::DescendIntoScalar {
                file: file.into(),
                line: line_no,
                field: last.name,
            });
        }
    };
    open_stack.push((name, is_array));
    group_stack.push(fields);
    Ok(())
}

/// Seals the deepest open composite and reattaches it to its parent.
fn close_level(group_stack: &mut Vec<Vec<Field>>, open_stack: &mut Vec<(String, bool)>) {
    let fields = group_stack.pop().expect("caller keeps root open");
    let (name, is_array) = open_stack.pop().expect("one open composite per level");
    let group = Group::with_fields(fields);
    let kind = if is_array {
        FieldKind::Array(group)
    } else {
        FieldKind::Object(group)
    };
    group_stack
        .last_mut()
        .expect("root group always open")
        .push(Field::new(name, kind));
}
