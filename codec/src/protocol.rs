//! The top-level protocol surface: load, parse, write.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use schema::{parse_definition, MessageTarget, OpcodeMap, Registry, VersionSelect};

use crate::decode::decode_message;
use crate::encode::encode_message;
use crate::error::CodecResult;
use crate::limits::CodecLimits;
use crate::value::Record;

/// Errors that abort [`Protocol::load`] entirely.
///
/// Individual unreadable or malformed files are warnings; only a base
/// directory that cannot be listed fails the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The base directory could not be read.
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error, rendered.
        message: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "cannot load protocol data from {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// A loaded protocol: the registry plus codec limits.
///
/// Built once via [`load`](Self::load) (or the text entry points) and
/// read-only afterwards; encode and decode never touch the filesystem.
/// Reloading rebuilds the registry from scratch and must be externally
/// serialized with in-flight codec calls.
#[derive(Debug, Clone, Default)]
pub struct Protocol {
    registry: Registry,
    limits: CodecLimits,
}

impl Protocol {
    /// Creates an empty protocol with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty protocol with the given limits.
    #[must_use]
    pub fn with_limits(limits: CodecLimits) -> Self {
        Self {
            registry: Registry::new(),
            limits,
        }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the codec limits.
    #[must_use]
    pub fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// Clears the registry and rebuilds it from `<base>/protocol.map` and
    /// every `*.def` file in `<base>`.
    ///
    /// Definition files load in sorted name order so repeated loads of the
    /// same directory produce identical registries. A missing map file and
    /// individually malformed files are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] only when the base directory itself cannot
    /// be listed.
    pub fn load(&mut self, base: &Path) -> Result<(), LoadError> {
        self.registry.clear();

        let map_path = base.join("protocol.map");
        match fs::read_to_string(&map_path) {
            Ok(text) => self.load_map_text("protocol.map", &text),
            Err(err) => {
                warn!(
                    "cannot read {}: {err}; continuing with an empty opcode map",
                    map_path.display()
                );
            }
        }

        let entries = fs::read_dir(base).map_err(|err| LoadError::Io {
            path: base.to_path_buf(),
            message: err.to_string(),
        })?;
        let mut def_paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "def"))
            .collect();
        def_paths.sort();

        let mut loaded = 0usize;
        for path in &def_paths {
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                warn!("skipping non-UTF-8 file name {}", path.display());
                continue;
            };
            match fs::read_to_string(path) {
                Ok(text) => {
                    if self.load_def_text(file_name, &text) {
                        loaded += 1;
                    }
                }
                Err(err) => warn!("cannot read {}: {err}; definition skipped", path.display()),
            }
        }
        info!(
            "loaded {loaded} of {} definitions and {} opcode mappings from {}",
            def_paths.len(),
            self.registry.map().len(),
            base.display()
        );
        Ok(())
    }

    /// Replaces the opcode map from map-file text. `source` is used in
    /// diagnostics as the file name.
    pub fn load_map_text(&mut self, source: &str, text: &str) {
        self.registry.set_map(OpcodeMap::parse(source, text));
    }

    /// Parses one definition file's text and registers its schema.
    ///
    /// Returns `false` (after logging a warning) if the definition was
    /// rejected; the protocol is unchanged in that case.
    pub fn load_def_text(&mut self, file: &str, text: &str) -> bool {
        match parse_definition(file, text) {
            Ok(parsed) => {
                self.registry.insert_schema(parsed);
                true
            }
            Err(err) => {
                warn!("{err}; definition skipped");
                false
            }
        }
    }

    /// Decodes a full frame (4-byte header included) into a record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CodecError`] on resolution failure or malformed data.
    pub fn parse<'a>(
        &'a self,
        target: impl Into<MessageTarget<'a>>,
        select: VersionSelect,
        frame: &[u8],
    ) -> CodecResult<Record> {
        let resolved = self.registry.resolve(target.into(), select)?;
        decode_message(&resolved, frame, &self.limits)
    }

    /// [`parse`](Self::parse) against the latest loaded version.
    pub fn parse_latest<'a>(
        &'a self,
        target: impl Into<MessageTarget<'a>>,
        frame: &[u8],
    ) -> CodecResult<Record> {
        self.parse(target, VersionSelect::Latest, frame)
    }

    /// Encodes a record into a freshly allocated frame, 4-byte header
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CodecError`] on resolution failure, a missing
    /// opcode, or an invalid field value.
    pub fn write<'a>(
        &'a self,
        target: impl Into<MessageTarget<'a>>,
        select: VersionSelect,
        record: &Record,
    ) -> CodecResult<Vec<u8>> {
        let resolved = self.registry.resolve(target.into(), select)?;
        encode_message(&resolved, record, &self.limits)
    }

    /// [`write`](Self::write) against the latest loaded version.
    pub fn write_latest<'a>(
        &'a self,
        target: impl Into<MessageTarget<'a>>,
        record: &Record,
    ) -> CodecResult<Vec<u8>> {
        self.write(target, VersionSelect::Latest, record)
    }
}
