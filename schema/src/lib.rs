//! Message definitions and the opcode registry for the TERA wire protocol.
//!
//! This crate turns the two textual inputs of the protocol - the opcode map
//! and the per-message `<Name>.<Version>.def` files - into the canonical
//! *augmented schema* the codec runs on:
//!
//! - Definition parsing with `-` depth prefixes and nested `array`/`object`
//!   groups
//! - Implicit `count`/`offset` meta insertion, hoisted to the top of the
//!   enclosing record group and keyed by dotted field path
//! - A [`Registry`] holding the `name <-> code` map and every
//!   `(name, version)` schema side by side
//!
//! # Design Principles
//!
//! - **Warnings don't abort** - malformed map lines, unmapped messages, and
//!   nesting oddities are logged and skipped; loading continues.
//! - **Pure downward trees** - exported schemas have no parent pointers.
//! - **Frozen after load** - the registry is built once and read-only
//!   afterwards; reloads rebuild it from scratch.

mod augment;
mod def;
mod error;
mod field;
mod map;
mod registry;

pub use def::{parse_def_file_name, parse_definition, MAX_NESTING_DEPTH};
pub use error::{DefError, DefResult, ResolveError};
pub use field::{Field, FieldKind, Group, MessageSchema, ScalarType};
pub use map::OpcodeMap;
pub use registry::{MessageTarget, Registry, Resolved, VersionSelect};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = Registry::new();
        let _ = OpcodeMap::default();
        let _ = VersionSelect::Latest;
        let _ = ScalarType::Int32;
        let _: DefResult<()> = Ok(());
    }

    #[test]
    fn end_to_end_definition_into_registry() {
        let schema = parse_definition("C_MOVE.1.def", "int32 x\nint32 y\n").unwrap();
        let mut registry = Registry::new();
        registry.set_map(OpcodeMap::parse("protocol.map", "C_MOVE 2048\n"));
        registry.insert_schema(schema);

        let resolved = registry
            .resolve(MessageTarget::Name("C_MOVE"), VersionSelect::Latest)
            .unwrap();
        assert_eq!(resolved.code, Some(2048));
        assert_eq!(resolved.version, Some(1));
        assert_eq!(resolved.schema.root.fields.len(), 2);
    }
}
