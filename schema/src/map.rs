//! Opcode map parsing and the bidirectional name/code table.

use std::collections::HashMap;

use log::warn;

/// Bidirectional `name <-> opcode` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpcodeMap {
    by_name: HashMap<String, u16>,
    by_code: HashMap<u16, String>,
}

impl OpcodeMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses map text: one `NAME CODE` pair per non-blank line, `#` comments.
    ///
    /// Malformed or non-numeric lines are logged with `source` and the line
    /// number and skipped; parsing never fails.
    #[must_use]
    pub fn parse(source: &str, text: &str) -> Self {
        let mut map = Self::new();
        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(name), Some(code), None) => match code.parse::<u16>() {
                    Ok(code) => map.insert(name, code),
                    Err(_) => {
                        warn!(
                            "{source}:{line_no}: opcode {code:?} for {name} is not a \
                             16-bit decimal; line skipped"
                        );
                    }
                },
                _ => {
                    warn!(
                        "{source}:{line_no}: malformed map line {line:?}; \
                         expected NAME CODE"
                    );
                }
            }
        }
        map
    }

    /// Inserts a mapping, replacing (with a warning) any previous use of the
    /// name or the code.
    pub fn insert(&mut self, name: &str, code: u16) {
        if let Some(old) = self.by_name.get(name) {
            if *old != code {
                warn!("message {name} remapped from opcode {old} to {code}");
                self.by_code.remove(old);
            }
        }
        if let Some(old) = self.by_code.get(&code) {
            if old != name {
                warn!("opcode {code} remapped from {old} to {name}");
                self.by_name.remove(old);
            }
        }
        self.by_name.insert(name.to_string(), code);
        self.by_code.insert(code, name.to_string());
    }

    /// Looks up the opcode for a name.
    #[must_use]
    pub fn code(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    /// Looks up the name for an opcode.
    #[must_use]
    pub fn name(&self, code: u16) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    /// Number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no mappings are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterates over `(name, code)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.by_name.iter().map(|(name, code)| (name.as_str(), *code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_pairs() {
        let map = OpcodeMap::parse("protocol.map", "S_LOGIN 1024\nC_MOVE  2048\n");
        assert_eq!(map.len(), 2);
        assert_eq!(map.code("S_LOGIN"), Some(1024));
        assert_eq!(map.code("C_MOVE"), Some(2048));
        assert_eq!(map.name(1024), Some("S_LOGIN"));
        assert_eq!(map.name(2048), Some("C_MOVE"));
    }

    #[test]
    fn parse_skips_comments_and_blanks() {
        let text = "# comment\n\nS_LOGIN 1 # trailing\n   \n";
        let map = OpcodeMap::parse("protocol.map", text);
        assert_eq!(map.len(), 1);
        assert_eq!(map.code("S_LOGIN"), Some(1));
    }

    #[test]
    fn parse_skips_malformed_lines() {
        let text = "JUSTANAME\nS_OK 5\nTOO MANY 7\n";
        let map = OpcodeMap::parse("protocol.map", text);
        assert_eq!(map.len(), 1);
        assert_eq!(map.code("S_OK"), Some(5));
    }

    #[test]
    fn parse_skips_non_numeric_codes() {
        let text = "S_BAD abc\nS_HUGE 70000\nS_NEG -1\nS_OK 9\n";
        let map = OpcodeMap::parse("protocol.map", text);
        assert_eq!(map.len(), 1);
        assert_eq!(map.code("S_OK"), Some(9));
    }

    #[test]
    fn zero_is_a_valid_opcode() {
        let map = OpcodeMap::parse("protocol.map", "TEST_VERSIONS 0\n");
        assert_eq!(map.code("TEST_VERSIONS"), Some(0));
        assert_eq!(map.name(0), Some("TEST_VERSIONS"));
    }

    #[test]
    fn remapping_name_drops_stale_code() {
        let mut map = OpcodeMap::new();
        map.insert("A", 1);
        map.insert("A", 2);
        assert_eq!(map.code("A"), Some(2));
        assert_eq!(map.name(1), None);
        assert_eq!(map.name(2), Some("A"));
    }

    #[test]
    fn remapping_code_drops_stale_name() {
        let mut map = OpcodeMap::new();
        map.insert("A", 1);
        map.insert("B", 1);
        assert_eq!(map.name(1), Some("B"));
        assert_eq!(map.code("A"), None);
    }

    #[test]
    fn lookups_miss_cleanly() {
        let map = OpcodeMap::new();
        assert!(map.is_empty());
        assert_eq!(map.code("NOPE"), None);
        assert_eq!(map.name(42), None);
    }

    #[test]
    fn iter_covers_all_pairs() {
        let map = OpcodeMap::parse("m", "A 1\nB 2\n");
        let mut pairs: Vec<(String, u16)> =
            map.iter().map(|(n, c)| (n.to_string(), c)).collect();
        pairs.sort();
        assert_eq!(pairs, vec![("A".to_string(), 1), ("B".to_string(), 2)]);
    }
}
