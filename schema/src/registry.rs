//! The message registry: name/code map plus versioned schemas.

use std::collections::{BTreeMap, HashMap};

use log::warn;

use crate::error::ResolveError;
use crate::field::MessageSchema;
use crate::map::OpcodeMap;

/// Which schema version a caller wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionSelect {
    /// The numerically greatest loaded version (the reference's `*`).
    #[default]
    Latest,
    /// Exactly this version.
    Exact(u32),
}

impl From<u32> for VersionSelect {
    fn from(version: u32) -> Self {
        Self::Exact(version)
    }
}

/// A caller-supplied message identifier.
#[derive(Debug, Clone, Copy)]
pub enum MessageTarget<'a> {
    /// A message name to look up in the registry.
    Name(&'a str),
    /// An opcode to reverse-map to a name.
    Code(u16),
    /// A schema supplied directly, bypassing the registry; `name` is only
    /// used in diagnostics.
    Schema {
        /// The caller-held schema.
        schema: &'a MessageSchema,
        /// Display name for error messages.
        name: &'a str,
    },
}

impl<'a> From<&'a str> for MessageTarget<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl From<u16> for MessageTarget<'_> {
    fn from(code: u16) -> Self {
        Self::Code(code)
    }
}

impl<'a> From<&'a MessageSchema> for MessageTarget<'a> {
    fn from(schema: &'a MessageSchema) -> Self {
        Self::Schema {
            schema,
            name: "<direct schema>",
        }
    }
}

/// The result of resolving a [`MessageTarget`].
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// Message name (or the caller's display name for direct schemas).
    pub name: &'a str,
    /// Opcode, when one is known.
    pub code: Option<u16>,
    /// Schema version, when resolution went through the registry.
    pub version: Option<u32>,
    /// The schema to encode or decode with.
    pub schema: &'a MessageSchema,
}

/// Holds the opcode map and every `(name, version)` schema.
///
/// Built once at load; read-only afterwards. Reloading clears and fully
/// rebuilds, and must be externally serialized with in-flight codec calls.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    map: OpcodeMap,
    schemas: HashMap<String, BTreeMap<u32, MessageSchema>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all schemas and the opcode map.
    pub fn clear(&mut self) {
        self.map = OpcodeMap::new();
        self.schemas.clear();
    }

    /// Replaces the opcode map.
    pub fn set_map(&mut self, map: OpcodeMap) {
        self.map = map;
    }

    /// Returns the opcode map.
    #[must_use]
    pub fn map(&self) -> &OpcodeMap {
        &self.map
    }

    /// Inserts a schema under its `(name, version)` key.
    ///
    /// A duplicate key replaces the previous schema with a warning; a schema
    /// whose name has no opcode mapping is kept but warned about.
    pub fn insert_schema(&mut self, schema: MessageSchema) {
        if self.map.code(&schema.name).is_none() {
            warn!("message {} has no opcode mapping", schema.name);
        }
        let versions = self.schemas.entry(schema.name.clone()).or_default();
        if versions.insert(schema.version, schema.clone()).is_some() {
            warn!(
                "duplicate definition for {}.{}; later one wins",
                schema.name, schema.version
            );
        }
    }

    /// Returns the loaded versions of a message, ascending.
    pub fn versions(&self, name: &str) -> impl Iterator<Item = u32> + '_ {
        self.schemas
            .get(name)
            .into_iter()
            .flat_map(|versions| versions.keys().copied())
    }

    /// Iterates over message names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Number of distinct message names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if no schemas are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Looks up one schema without opcode resolution.
    #[must_use]
    pub fn schema(&self, name: &str, select: VersionSelect) -> Option<&MessageSchema> {
        let versions = self.schemas.get(name)?;
        match select {
            VersionSelect::Latest => versions.values().next_back(),
            VersionSelect::Exact(version) => versions.get(&version),
        }
    }

    /// Resolves a caller identifier to `{name, code, version, schema}`.
    ///
    /// - A direct schema passes through with no code and no version.
    /// - A name missing from the opcode map resolves with `code: None` and a
    ///   warning (encoding will fail later if a code is required).
    /// - An unmapped code is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the code is unknown, the name has no
    /// schemas, or the requested version is absent.
    pub fn resolve<'a>(
        &'a self,
        target: MessageTarget<'a>,
        select: VersionSelect,
    ) -> Result<Resolved<'a>, ResolveError> {
        let (name, code): (&str, Option<u16>) = match target {
            MessageTarget::Schema { schema, name } => {
                return Ok(Resolved {
                    name,
                    code: None,
                    version: None,
                    schema,
                });
            }
            MessageTarget::Name(name) => {
                let code = self.map.code(name);
                if code.is_none() {
                    warn!("no opcode mapping for message {name}");
                }
                (name, code)
            }
            MessageTarget::Code(code) => {
                let name = self
                    .map
                    .name(code)
                    .ok_or(ResolveError::UnknownCode { code })?;
                (name, Some(code))
            }
        };

        let versions = self
            .schemas
            .get(name)
            .ok_or_else(|| ResolveError::UnknownMessage { name: name.into() })?;
        let (version, schema) = match select {
            VersionSelect::Latest => versions
                .iter()
                .next_back()
                .map(|(version, schema)| (*version, schema))
                .ok_or_else(|| ResolveError::UnknownMessage { name: name.into() })?,
            VersionSelect::Exact(version) => versions
                .get(&version)
                .map(|schema| (version, schema))
                .ok_or_else(|| ResolveError::VersionNotFound {
                    name: name.into(),
                    version,
                })?,
        };

        Ok(Resolved {
            name,
            code,
            version: Some(version),
            schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::parse_definition;

    fn registry_with(defs: &[(&str, &str)], map: &str) -> Registry {
        let mut registry = Registry::new();
        registry.set_map(OpcodeMap::parse("protocol.map", map));
        for (file, text) in defs {
            registry.insert_schema(parse_definition(file, text).unwrap());
        }
        registry
    }

    #[test]
    fn resolve_by_name_picks_latest() {
        let registry = registry_with(
            &[
                ("S_A.1.def", "byte b\n"),
                ("S_A.3.def", "int32 x\n"),
                ("S_A.2.def", "int16 h\n"),
            ],
            "S_A 100\n",
        );
        let resolved = registry
            .resolve(MessageTarget::Name("S_A"), VersionSelect::Latest)
            .unwrap();
        assert_eq!(resolved.name, "S_A");
        assert_eq!(resolved.code, Some(100));
        assert_eq!(resolved.version, Some(3));
        assert_eq!(resolved.schema.root.fields[0].name, "x");
    }

    #[test]
    fn resolve_by_name_exact_version() {
        let registry = registry_with(
            &[("S_A.1.def", "byte b\n"), ("S_A.2.def", "int16 h\n")],
            "S_A 100\n",
        );
        let resolved = registry
            .resolve(MessageTarget::Name("S_A"), VersionSelect::Exact(1))
            .unwrap();
        assert_eq!(resolved.version, Some(1));
        assert_eq!(resolved.schema.root.fields[0].name, "b");
    }

    #[test]
    fn resolve_missing_version_fails() {
        let registry = registry_with(&[("S_A.1.def", "byte b\n")], "S_A 100\n");
        let err = registry
            .resolve(MessageTarget::Name("S_A"), VersionSelect::Exact(9))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::VersionNotFound { version: 9, .. }
        ));
    }

    #[test]
    fn resolve_by_code() {
        let registry = registry_with(&[("S_A.1.def", "byte b\n")], "S_A 100\n");
        let resolved = registry
            .resolve(MessageTarget::Code(100), VersionSelect::Latest)
            .unwrap();
        assert_eq!(resolved.name, "S_A");
        assert_eq!(resolved.code, Some(100));
    }

    #[test]
    fn resolve_unknown_code_fails() {
        let registry = registry_with(&[("S_A.1.def", "byte b\n")], "S_A 100\n");
        let err = registry
            .resolve(MessageTarget::Code(7), VersionSelect::Latest)
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownCode { code: 7 }));
    }

    #[test]
    fn resolve_unmapped_name_keeps_code_none() {
        let registry = registry_with(&[("S_A.1.def", "byte b\n")], "");
        let resolved = registry
            .resolve(MessageTarget::Name("S_A"), VersionSelect::Latest)
            .unwrap();
        assert_eq!(resolved.code, None);
    }

    #[test]
    fn resolve_unknown_message_fails() {
        let registry = registry_with(&[], "");
        let err = registry
            .resolve(MessageTarget::Name("S_GONE"), VersionSelect::Latest)
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownMessage { .. }));
    }

    #[test]
    fn resolve_direct_schema_passes_through() {
        let registry = registry_with(&[], "");
        let schema = parse_definition("S_X.1.def", "byte b\n").unwrap();
        let resolved = registry
            .resolve(
                MessageTarget::Schema {
                    schema: &schema,
                    name: "S_X",
                },
                VersionSelect::Latest,
            )
            .unwrap();
        assert_eq!(resolved.name, "S_X");
        assert_eq!(resolved.code, None);
        assert_eq!(resolved.version, None);
    }

    #[test]
    fn duplicate_definition_last_wins() {
        let registry = registry_with(
            &[("S_A.1.def", "byte old\n"), ("S_A.1.def", "byte new\n")],
            "S_A 1\n",
        );
        let resolved = registry
            .resolve(MessageTarget::Name("S_A"), VersionSelect::Exact(1))
            .unwrap();
        assert_eq!(resolved.schema.root.fields[0].name, "new");
    }

    #[test]
    fn versions_iterates_ascending() {
        let registry = registry_with(
            &[
                ("S_A.5.def", "byte b\n"),
                ("S_A.1.def", "byte b\n"),
                ("S_A.3.def", "byte b\n"),
            ],
            "S_A 1\n",
        );
        let versions: Vec<u32> = registry.versions("S_A").collect();
        assert_eq!(versions, vec![1, 3, 5]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut registry = registry_with(&[("S_A.1.def", "byte b\n")], "S_A 1\n");
        assert!(!registry.is_empty());
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.map().is_empty());
    }

    #[test]
    fn target_conversions() {
        assert!(matches!(MessageTarget::from("S_A"), MessageTarget::Name(_)));
        assert!(matches!(MessageTarget::from(5u16), MessageTarget::Code(5)));
        let schema = parse_definition("S_X.1.def", "byte b\n").unwrap();
        assert!(matches!(
            MessageTarget::from(&schema),
            MessageTarget::Schema { .. }
        ));
    }
}
