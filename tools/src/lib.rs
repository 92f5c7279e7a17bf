//! Introspection helpers for the TERA message codec.
//!
//! This crate backs the `tera-tools` binary: hex frame parsing, registry
//! coverage reports, and schema dumps for debugging protocol data sets.

use std::fmt::Write as _;

use anyhow::{bail, Result};
use codec::{Protocol, VersionSelect};

/// Parses a hex dump into bytes.
///
/// Accepts pairs of hex digits separated by arbitrary whitespace, e.g.
/// `"1c 00 03 00"` or a continuous `"1c000300"`.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        bail!("hex input has an odd number of digits");
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks(2) {
        let hi = pair[0]
            .to_digit(16)
            .ok_or_else(|| anyhow::anyhow!("invalid hex digit {:?}", pair[0]))?;
        let lo = pair[1]
            .to_digit(16)
            .ok_or_else(|| anyhow::anyhow!("invalid hex digit {:?}", pair[1]))?;
        bytes.push((hi * 16 + lo) as u8);
    }
    Ok(bytes)
}

/// Renders a coverage report for a loaded protocol: every message name with
/// its versions and opcode mapping, plus the messages lacking one.
#[must_use]
pub fn coverage_report(protocol: &Protocol) -> String {
    let registry = protocol.registry();
    let mut names: Vec<&str> = registry.names().collect();
    names.sort_unstable();

    let mut out = String::new();
    let mut unmapped = 0usize;
    for name in &names {
        let versions: Vec<String> = registry
            .versions(name)
            .map(|version| version.to_string())
            .collect();
        match registry.map().code(name) {
            Some(code) => {
                let _ = writeln!(out, "{name} (opcode {code}): v{}", versions.join(", v"));
            }
            None => {
                unmapped += 1;
                let _ = writeln!(out, "{name} (no opcode): v{}", versions.join(", v"));
            }
        }
    }
    let _ = writeln!(
        out,
        "{} messages, {} opcode mappings, {} unmapped",
        names.len(),
        registry.map().len(),
        unmapped
    );
    out
}

/// Renders the augmented schema for one message, or all of them.
pub fn dump_schemas(protocol: &Protocol, message: Option<&str>) -> Result<String> {
    let registry = protocol.registry();
    let mut names: Vec<&str> = match message {
        Some(name) => {
            if registry.schema(name, VersionSelect::Latest).is_none() {
                bail!("no schema loaded for message {name:?}");
            }
            vec![name]
        }
        None => registry.names().collect(),
    };
    names.sort_unstable();

    let mut out = String::new();
    for name in names {
        for version in registry.versions(name) {
            if let Some(loaded) = registry.schema(name, VersionSelect::Exact(version)) {
                let _ = write!(out, "{loaded}");
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_protocol() -> Protocol {
        let mut protocol = Protocol::new();
        protocol.load_map_text("protocol.map", "S_A 1\n");
        protocol.load_def_text("S_A.1.def", "int32 x\nstring s\n");
        protocol.load_def_text("S_A.2.def", "int64 x\nstring s\n");
        protocol.load_def_text("S_LONE.1.def", "byte b\n");
        protocol
    }

    #[test]
    fn parse_hex_with_and_without_spaces() {
        assert_eq!(parse_hex("1c 00 03 00").unwrap(), vec![0x1C, 0, 3, 0]);
        assert_eq!(parse_hex("1c000300").unwrap(), vec![0x1C, 0, 3, 0]);
        assert_eq!(parse_hex("FF\nfe").unwrap(), vec![0xFF, 0xFE]);
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn coverage_report_lists_versions_and_unmapped() {
        let report = coverage_report(&sample_protocol());
        assert!(report.contains("S_A (opcode 1): v1, v2"));
        assert!(report.contains("S_LONE (no opcode): v1"));
        assert!(report.contains("2 messages, 1 opcode mappings, 1 unmapped"));
    }

    #[test]
    fn dump_renders_augmented_metas() {
        let dump = dump_schemas(&sample_protocol(), Some("S_A")).unwrap();
        assert!(dump.contains("S_A.1"));
        assert!(dump.contains("offset s"), "implicit meta should be visible");
        assert!(dump.contains("string s"));
    }

    #[test]
    fn dump_unknown_message_fails() {
        assert!(dump_schemas(&sample_protocol(), Some("S_NOPE")).is_err());
    }
}
